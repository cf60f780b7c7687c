//! In-memory presence store using `DashMap`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use presence_core::result::AppResult;
use presence_entity::{PresenceRecord, PresenceUpdate};

use crate::store::PresenceStore;

/// Presence store kept in process memory.
///
/// Clones share the same map, so a test can hand one clone to the code under
/// test and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryPresenceStore {
    records: Arc<DashMap<String, PresenceRecord>>,
}

impl MemoryPresenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-modify-write under the shard lock of the user's entry.
    fn write(&self, update: &PresenceUpdate, location: Option<&str>) -> PresenceRecord {
        let location = location.map(str::to_string);
        let record = match self.records.entry(update.user_id.clone()) {
            Entry::Occupied(mut slot) => {
                let record = PresenceRecord::apply(Some(slot.get()), update, location);
                slot.insert(record.clone());
                record
            }
            Entry::Vacant(slot) => {
                let record = PresenceRecord::apply(None, update, location);
                slot.insert(record.clone());
                record
            }
        };
        debug!(user_id = %update.user_id, is_online = update.is_online, "Presence row written");
        record
    }
}

#[async_trait]
impl PresenceStore for MemoryPresenceStore {
    async fn upsert(&self, update: &PresenceUpdate) -> AppResult<()> {
        self.write(update, None);
        Ok(())
    }

    async fn upsert_with_location(
        &self,
        update: &PresenceUpdate,
        location: Option<&str>,
    ) -> AppResult<PresenceRecord> {
        Ok(self.write(update, location))
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<PresenceRecord>> {
        Ok(self.records.get(user_id).map(|r| r.value().clone()))
    }

    async fn list(&self, online_only: bool) -> AppResult<Vec<PresenceRecord>> {
        let mut rows: Vec<PresenceRecord> = self
            .records
            .iter()
            .filter(|r| !online_only || r.value().is_online)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
