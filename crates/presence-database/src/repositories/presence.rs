//! Presence repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use presence_core::error::{AppError, ErrorKind};
use presence_core::result::AppResult;
use presence_entity::{PresenceRecord, PresenceUpdate};

use crate::store::PresenceStore;

const SELECT_COLUMNS: &str = "user_id, is_online, last_seen, updated_at, location";

/// Repository for the `user_presence` table.
#[derive(Debug, Clone)]
pub struct PresenceRepository {
    pool: PgPool,
}

impl PresenceRepository {
    /// Create a new presence repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresenceStore for PresenceRepository {
    async fn upsert(&self, update: &PresenceUpdate) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_presence (user_id, is_online, last_seen, updated_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET \
                is_online = EXCLUDED.is_online, \
                last_seen = EXCLUDED.last_seen, \
                updated_at = EXCLUDED.updated_at",
        )
        .bind(&update.user_id)
        .bind(update.is_online)
        .bind(update.last_seen)
        .bind(update.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert presence", e))?;
        Ok(())
    }

    async fn upsert_with_location(
        &self,
        update: &PresenceUpdate,
        location: Option<&str>,
    ) -> AppResult<PresenceRecord> {
        sqlx::query_as::<_, PresenceRecord>(&format!(
            "INSERT INTO user_presence (user_id, is_online, last_seen, updated_at, location) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
                is_online = EXCLUDED.is_online, \
                last_seen = EXCLUDED.last_seen, \
                updated_at = EXCLUDED.updated_at, \
                location = COALESCE(EXCLUDED.location, user_presence.location) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&update.user_id)
        .bind(update.is_online)
        .bind(update.last_seen)
        .bind(update.updated_at)
        .bind(location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to upsert presence with location",
                e,
            )
        })
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<PresenceRecord>> {
        sqlx::query_as::<_, PresenceRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM user_presence WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find presence", e))
    }

    async fn list(&self, online_only: bool) -> AppResult<Vec<PresenceRecord>> {
        sqlx::query_as::<_, PresenceRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM user_presence \
             WHERE ($1 = FALSE OR is_online) \
             ORDER BY updated_at DESC"
        ))
        .bind(online_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list presence", e))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
