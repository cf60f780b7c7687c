//! Recording fakes for the gateway, fallback store, and beacon.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use presence_core::error::AppError;
use presence_core::result::AppResult;
use presence_database::{MemoryPresenceStore, PresenceStore};
use presence_entity::{PresenceRecord, PresenceUpdate};

use crate::transport::{BeaconTransport, PresenceGateway};

/// One observed write.
#[derive(Debug, Clone)]
pub struct Call {
    pub at: Instant,
    pub update: PresenceUpdate,
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Gateway that records calls and can be told to fail or to be slow.
#[derive(Debug, Clone, Default)]
pub struct RecordingGateway {
    calls: Arc<Mutex<Vec<Call>>>,
    failing: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, is_online: bool) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.update.is_online == is_online)
            .count()
    }

    pub fn offline_calls_since(&self, since: Instant) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| !c.update.is_online && c.at >= since)
            .count()
    }
}

#[async_trait]
impl PresenceGateway for RecordingGateway {
    async fn update_presence(&self, update: &PresenceUpdate) -> AppResult<()> {
        lock(&self.calls).push(Call {
            at: Instant::now(),
            update: update.clone(),
        });

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("Presence update rejected with status 503"));
        }
        Ok(())
    }
}

/// Memory store that records plain upserts and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: MemoryPresenceStore,
    upserts: Arc<Mutex<Vec<PresenceUpdate>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn upserts(&self) -> Vec<PresenceUpdate> {
        lock(&self.upserts).clone()
    }
}

#[async_trait]
impl PresenceStore for RecordingStore {
    async fn upsert(&self, update: &PresenceUpdate) -> AppResult<()> {
        lock(&self.upserts).push(update.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::database("Failed to upsert presence"));
        }
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
        Ok(!self.failing.load(Ordering::SeqCst))
    }
}

/// Beacon that records what it was handed.
#[derive(Debug, Clone, Default)]
pub struct RecordingBeacon {
    sent: Arc<Mutex<Vec<PresenceUpdate>>>,
}

impl RecordingBeacon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<PresenceUpdate> {
        lock(&self.sent).clone()
    }
}

impl BeaconTransport for RecordingBeacon {
    fn send_beacon(&self, update: &PresenceUpdate) -> bool {
        lock(&self.sent).push(update.clone());
        true
    }
}
