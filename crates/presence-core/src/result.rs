//! Convenience result type alias for Presence Hub.

use crate::error::AppError;

/// A specialized `Result` type for Presence Hub operations.
pub type AppResult<T> = Result<T, AppError>;
