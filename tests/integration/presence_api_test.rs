//! Presence API over a real socket.

use std::time::Duration;

use presence_client::{BeaconTransport, HttpBeacon, HttpPresenceGateway, PresenceGateway};
use presence_core::config::TrackerConfig;
use presence_database::PresenceStore;
use presence_entity::PresenceUpdate;

use crate::helpers::{TestApp, eventually};

fn client_config(app: &TestApp) -> TrackerConfig {
    let mut config = TrackerConfig::new("api-user");
    config.base_url = app.base_url();
    config
}

#[tokio::test]
async fn test_gateway_upserts_through_api() {
    let app = TestApp::spawn().await;
    let gateway = HttpPresenceGateway::new(&client_config(&app)).unwrap();

    let update = PresenceUpdate::now("api-user", true);
    gateway.update_presence(&update).await.unwrap();

    let record = app.record("api-user").await.unwrap();
    assert!(record.is_online);
    assert_eq!(record.last_seen, update.last_seen);
    assert_eq!(record.updated_at, update.updated_at);
}

#[tokio::test]
async fn test_gateway_reports_rejection() {
    let app = TestApp::spawn().await;
    let gateway = HttpPresenceGateway::new(&client_config(&app)).unwrap();

    let result = gateway.update_presence(&PresenceUpdate::now("", true)).await;
    assert!(result.is_err());
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_beacon_marks_offline() {
    let app = TestApp::spawn().await;
    app.store
        .upsert(&PresenceUpdate::now("api-user", true))
        .await
        .unwrap();

    let beacon = HttpBeacon::new(&client_config(&app)).unwrap();
    assert!(beacon.send_beacon(&PresenceUpdate::now("api-user", false)));
    let app = &app;

    let offline = eventually(Duration::from_secs(2), || async move {
        app.record("api-user")
            .await
            .is_some_and(|r| !r.is_online)
    })
    .await;
    assert!(offline);
}
