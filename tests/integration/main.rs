//! End-to-end tests: real tracking sessions against a live presence API.

mod helpers;
mod presence_api_test;
mod tracker_test;
