//! # presence-core
//!
//! Core crate for Presence Hub. Contains the configuration schemas and the
//! unified error system shared by the client, the store, and the API.
//!
//! This crate has **no** internal dependencies on other Presence Hub crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
