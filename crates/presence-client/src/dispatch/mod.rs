//! Presence write dispatch with primary and fallback paths.

pub mod dispatcher;

pub use dispatcher::{DeliveryPath, DispatchOutcome, UpdateDispatcher};
