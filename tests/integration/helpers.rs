//! Shared test helpers for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use presence_api::{AppState, build_router};
use presence_client::{HttpBeacon, HttpPresenceGateway, PresenceHandle, PresenceTracker};
use presence_core::config::{AppConfig, TrackerConfig};
use presence_database::{MemoryPresenceStore, PresenceStore};
use presence_entity::PresenceRecord;

/// A presence API served on an ephemeral port, backed by a memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: MemoryPresenceStore,
    server: JoinHandle<()>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut config = AppConfig::default();
        config.store.provider = "memory".to_string();

        let store = MemoryPresenceStore::new();
        let state = AppState::new(Arc::new(config), Arc::new(store.clone()));
        let app = build_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            addr,
            store,
            server,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn record(&self, user_id: &str) -> Option<PresenceRecord> {
        self.store
            .find_by_user(user_id)
            .await
            .expect("Memory store lookup failed")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Tracker settings scaled down so tests finish in well under a second.
pub fn fast_tracker(user_id: &str, base_url: &str) -> TrackerConfig {
    let mut config = TrackerConfig::new(user_id);
    config.base_url = base_url.to_string();
    config.heartbeat_interval_ms = 100;
    config.activity_quiet_ms = 50;
    config.debounce_gap_ms = 200;
    config.inactivity_threshold_ms = 10_000;
    config.hidden_grace_ms = 200;
    config.request_timeout_ms = 500;
    config
}

/// Spawn a tracker that talks HTTP to `base_url` and falls back to `fallback`.
pub fn spawn_tracker(
    config: TrackerConfig,
    fallback: Arc<dyn PresenceStore>,
) -> (PresenceHandle, JoinHandle<()>) {
    let gateway = Arc::new(HttpPresenceGateway::new(&config).expect("gateway"));
    let beacon = Arc::new(HttpBeacon::new(&config).expect("beacon"));
    PresenceTracker::spawn(config, gateway, fallback, beacon)
}

/// Poll `check` until it returns true or `timeout` passes.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// An address nothing is listening on.
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}
