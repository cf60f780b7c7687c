//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use presence_core::config::AppConfig;
use presence_database::PresenceStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Presence store (PostgreSQL or in-memory)
    pub store: Arc<dyn PresenceStore>,
    /// Process start, for the health endpoint
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn PresenceStore>) -> Self {
        Self {
            config,
            store,
            started_at: Instant::now(),
        }
    }
}
