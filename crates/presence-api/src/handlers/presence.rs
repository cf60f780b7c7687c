//! Presence handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use tracing::{debug, info};
use validator::Validate;

use presence_core::error::AppError;

use crate::dto::request::{ListPresenceQuery, PresenceUpdateRequest};
use crate::dto::response::{ApiResponse, PresenceListResponse, PresenceResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Caller location: first `X-Forwarded-For` hop, else `X-Real-IP`.
pub fn client_location(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}

/// POST /api/presence/update-with-location
pub async fn update_with_location(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PresenceUpdateRequest>,
) -> Result<Json<ApiResponse<PresenceResponse>>, ApiError> {
    req.validate()?;
    let update = req.into_update();
    update.validate()?;

    let location = client_location(&headers);
    let record = state
        .store
        .upsert_with_location(&update, location.as_deref())
        .await?;

    info!(
        user_id = %record.user_id,
        status = %record.status(),
        location = record.location.as_deref().unwrap_or("-"),
        "Presence upserted"
    );
    Ok(Json(ApiResponse::ok(record.into())))
}

/// POST /api/presence/offline
///
/// Beacon sink. Browsers send beacons as `text/plain`, so the body is read
/// raw and parsed as JSON regardless of content type. The write is always
/// an offline one.
pub async fn offline_beacon(
    State(state): State<AppState>,
    body: String,
) -> Result<StatusCode, ApiError> {
    let req: PresenceUpdateRequest = serde_json::from_str(&body).map_err(AppError::from)?;
    req.validate()?;

    let mut update = req.into_update();
    update.is_online = false;
    update.validate()?;

    state.store.upsert(&update).await?;
    debug!(user_id = %update.user_id, "Offline beacon stored");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/presence/{user_id}
pub async fn get_presence(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<PresenceResponse>>, ApiError> {
    let record = state
        .store
        .find_by_user(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No presence for user {user_id}")))?;
    Ok(Json(ApiResponse::ok(record.into())))
}

/// GET /api/presence
pub async fn list_presence(
    State(state): State<AppState>,
    Query(query): Query<ListPresenceQuery>,
) -> Result<Json<ApiResponse<PresenceListResponse>>, ApiError> {
    let records = state.store.list(query.online).await?;
    let items: Vec<PresenceResponse> = records.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::ok(PresenceListResponse {
        total: items.len(),
        items,
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use presence_core::config::AppConfig;
    use presence_database::{MemoryPresenceStore, PresenceStore};
    use presence_entity::PresenceUpdate;

    use super::*;
    use crate::router::build_router;

    fn app() -> (Router, MemoryPresenceStore) {
        let store = MemoryPresenceStore::new();
        let state = AppState::new(Arc::new(AppConfig::default()), Arc::new(store.clone()));
        (build_router(state), store)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_location_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "198.51.100.2".parse().unwrap());
        assert_eq!(client_location(&headers).as_deref(), Some("198.51.100.2"));

        headers.insert("x-forwarded-for", " 203.0.113.7 , 10.0.0.1".parse().unwrap());
        assert_eq!(client_location(&headers).as_deref(), Some("203.0.113.7"));

        assert_eq!(client_location(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn test_update_with_location_upserts() {
        let (app, store) = app();
        let update = PresenceUpdate::now("u-1", true);

        let response = app
            .oneshot(post_json(
                "/api/presence/update-with-location",
                serde_json::to_value(&update).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["status"], "online");
        assert_eq!(body["data"]["location"], "203.0.113.7");

        let record = store.find_by_user("u-1").await.unwrap().unwrap();
        assert!(record.is_online);
        assert_eq!(record.last_seen, update.last_seen);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_user() {
        let (app, store) = app();
        let response = app
            .oneshot(post_json(
                "/api/presence/update-with-location",
                json!({ "user_id": "", "is_online": true }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_beacon_accepts_text_plain_and_forces_offline() {
        let (app, store) = app();
        let payload = serde_json::to_string(&PresenceUpdate::now("u-2", true)).unwrap();

        let response = app
            .oneshot(
                Request::post("/api/presence/offline")
                    .header(header::CONTENT_TYPE, "text/plain;charset=UTF-8")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let record = store.find_by_user("u-2").await.unwrap().unwrap();
        assert!(!record.is_online);
        assert_eq!(record.location, None);
    }

    #[tokio::test]
    async fn test_beacon_rejects_garbage() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::post("/api/presence/offline")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let (app, store) = app();
        store.upsert(&PresenceUpdate::now("u-1", true)).await.unwrap();
        store.upsert(&PresenceUpdate::now("u-2", false)).await.unwrap();

        let response = app
            .clone()
            .oneshot(Request::get("/api/presence/u-1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["user_id"], "u-1");

        let response = app
            .clone()
            .oneshot(Request::get("/api/presence/nobody").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(Request::get("/api/presence?online=true").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["user_id"], "u-1");

        let response = app
            .oneshot(Request::get("/api/presence").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["data"]["total"], 2);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], "ok");
    }
}
