//! Tracking sessions end to end.

use std::sync::Arc;
use std::time::Duration;

use presence_client::{DeliveryPath, DispatchOutcome, InteractionKind, Visibility};
use presence_database::{MemoryPresenceStore, PresenceStore};

use crate::helpers::{TestApp, dead_base_url, eventually, fast_tracker, spawn_tracker};

const WAIT: Duration = Duration::from_secs(3);

#[tokio::test]
async fn test_session_comes_online_through_api() {
    let app = TestApp::spawn().await;
    let fallback = MemoryPresenceStore::new();
    let (handle, _task) = spawn_tracker(
        fast_tracker("user-online", &app.base_url()),
        Arc::new(fallback.clone()),
    );
    let (app, handle) = (&app, &handle);

    let online = eventually(WAIT, || async move {
        app.record("user-online").await.is_some_and(|r| r.is_online)
    })
    .await;
    assert!(online);
    assert!(eventually(WAIT, || async move { handle.is_online() }).await);
    assert!(fallback.is_empty());
}

#[tokio::test]
async fn test_unreachable_api_uses_fallback_store() {
    let fallback = MemoryPresenceStore::new();
    let (handle, _task) = spawn_tracker(
        fast_tracker("user-fallback", &dead_base_url().await),
        Arc::new(fallback.clone()),
    );
    let fallback = &fallback;

    let online = eventually(WAIT, || async move {
        fallback
            .find_by_user("user-fallback")
            .await
            .unwrap()
            .is_some_and(|r| r.is_online && r.location.is_none())
    })
    .await;
    assert!(online);

    assert_eq!(
        handle.mark_offline().await,
        DispatchOutcome::Delivered(DeliveryPath::Fallback)
    );
}

#[tokio::test]
async fn test_offline_then_activity_comes_back() {
    let app = TestApp::spawn().await;
    let mut config = fast_tracker("user-return", &app.base_url());
    // only the activity pulse may bring the session back
    config.heartbeat_interval_ms = 60_000;
    let (handle, _task) = spawn_tracker(config, Arc::new(MemoryPresenceStore::new()));
    let (app, handle) = (&app, &handle);
    assert!(eventually(WAIT, || async move { handle.is_online() }).await);

    assert_eq!(
        handle.mark_offline().await,
        DispatchOutcome::Delivered(DeliveryPath::Primary)
    );
    assert!(!app.record("user-return").await.unwrap().is_online);

    handle.interaction(InteractionKind::KeyPress);
    let back = eventually(WAIT, || async move {
        app.record("user-return").await.is_some_and(|r| r.is_online)
    })
    .await;
    assert!(back);
}

#[tokio::test]
async fn test_hidden_page_goes_offline_after_grace() {
    let app = TestApp::spawn().await;
    let mut config = fast_tracker("user-hidden", &app.base_url());
    // keep the heartbeat out of the way
    config.heartbeat_interval_ms = 60_000;
    let (handle, _task) = spawn_tracker(config, Arc::new(MemoryPresenceStore::new()));
    let (app, handle) = (&app, &handle);
    assert!(eventually(WAIT, || async move { handle.is_online() }).await);

    handle.set_visibility(Visibility::Hidden);
    let offline = eventually(WAIT, || async move {
        app.record("user-hidden").await.is_some_and(|r| !r.is_online)
    })
    .await;
    assert!(offline);
    assert!(!handle.is_online());

    handle.set_visibility(Visibility::Visible);
    assert!(eventually(WAIT, || async move { handle.is_online() }).await);
}

#[tokio::test]
async fn test_unload_beacon_reaches_api() {
    let app = TestApp::spawn().await;
    let (handle, task) = spawn_tracker(
        fast_tracker("user-unload", &app.base_url()),
        Arc::new(MemoryPresenceStore::new()),
    );
    let app = &app;
    assert!(
        eventually(WAIT, || async move {
            app.record("user-unload").await.is_some_and(|r| r.is_online)
        })
        .await
    );

    assert!(handle.unload());
    task.await.unwrap();

    let offline = eventually(WAIT, || async move {
        app.record("user-unload").await.is_some_and(|r| !r.is_online)
    })
    .await;
    assert!(offline);
}
