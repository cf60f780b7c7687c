//! # presence-api
//!
//! HTTP API layer for Presence Hub built on Axum.
//!
//! Serves the presence-update endpoint the client writes through, the
//! beacon sink used on page teardown, read endpoints for operators, and a
//! health check.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
