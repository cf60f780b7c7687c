//! Route definitions for the Presence Hub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use presence_entity::endpoints;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(presence_routes())
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Presence writes and reads
fn presence_routes() -> Router<AppState> {
    Router::new()
        .route(
            endpoints::UPDATE_WITH_LOCATION,
            post(handlers::presence::update_with_location),
        )
        .route(
            endpoints::OFFLINE_BEACON,
            post(handlers::presence::offline_beacon),
        )
        .route("/api/presence", get(handlers::presence::list_presence))
        .route(
            "/api/presence/{user_id}",
            get(handlers::presence::get_presence),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(handlers::health::health))
}
