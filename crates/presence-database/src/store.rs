//! Presence store trait shared by the API, the CLI, and the client fallback path.

use async_trait::async_trait;

use presence_core::result::AppResult;
use presence_entity::{PresenceRecord, PresenceUpdate};

/// Backend holding one presence row per user.
///
/// Writes are upserts keyed by `user_id`; a conflicting row is overwritten,
/// never merged.
#[async_trait]
pub trait PresenceStore: Send + Sync + std::fmt::Debug + 'static {
    /// Upsert the four core fields. `location` is left untouched.
    async fn upsert(&self, update: &PresenceUpdate) -> AppResult<()>;

    /// Upsert the four core fields plus caller location, returning the row.
    async fn upsert_with_location(
        &self,
        update: &PresenceUpdate,
        location: Option<&str>,
    ) -> AppResult<PresenceRecord>;

    /// Fetch the row for a user.
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<PresenceRecord>>;

    /// List rows, most recently updated first.
    async fn list(&self, online_only: bool) -> AppResult<Vec<PresenceRecord>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
