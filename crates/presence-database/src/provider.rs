//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use presence_core::config::AppConfig;
use presence_core::error::AppError;
use presence_core::result::AppResult;
use presence_entity::{PresenceRecord, PresenceUpdate};

use crate::connection::DatabasePool;
use crate::memory::MemoryPresenceStore;
use crate::migration::run_migrations;
use crate::repositories::presence::PresenceRepository;
use crate::store::PresenceStore;

/// Wraps the presence store selected by `store.provider`.
#[derive(Debug, Clone)]
pub struct PresenceStoreManager {
    inner: Arc<dyn PresenceStore>,
}

impl PresenceStoreManager {
    /// Build the configured store. The postgres provider connects and
    /// applies migrations before returning.
    pub async fn new(config: &AppConfig) -> AppResult<Self> {
        let inner: Arc<dyn PresenceStore> = match config.store.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL presence store");
                let pool = DatabasePool::connect(&config.database).await?;
                run_migrations(pool.pool()).await?;
                Arc::new(PresenceRepository::new(pool.into_pool()))
            }
            "memory" => {
                info!("Initializing in-memory presence store");
                Arc::new(MemoryPresenceStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: postgres, memory"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Shared handle to the inner store.
    pub fn store(&self) -> Arc<dyn PresenceStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl PresenceStore for PresenceStoreManager {
    async fn upsert(&self, update: &PresenceUpdate) -> AppResult<()> {
        self.inner.upsert(update).await
    }

    async fn upsert_with_location(
        &self,
        update: &PresenceUpdate,
        location: Option<&str>,
    ) -> AppResult<PresenceRecord> {
        self.inner.upsert_with_location(update, location).await
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<PresenceRecord>> {
        self.inner.find_by_user(user_id).await
    }

    async fn list(&self, online_only: bool) -> AppResult<Vec<PresenceRecord>> {
        self.inner.list(online_only).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider() {
        let mut config = AppConfig::default();
        config.store.provider = "memory".to_string();
        let manager = PresenceStoreManager::new(&config).await.unwrap();
        manager.upsert(&PresenceUpdate::now("u-1", true)).await.unwrap();
        assert!(manager.find_by_user("u-1").await.unwrap().unwrap().is_online);
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let mut config = AppConfig::default();
        config.store.provider = "redis".to_string();
        let err = PresenceStoreManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, presence_core::error::ErrorKind::Configuration);
    }
}
