//! API implementation for the Kinship HTTP server

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    middleware,
    response::Json,
    routing::{get, post, put},
};
use kinship::storage::BaseStore;

use crate::state::AppState;

pub mod auth;
pub mod contexts;
pub mod dto;
pub mod extract;
pub mod friends;
pub mod likes;

use auth::auth_middleware;

/// Create the main router with all API endpoints
///
/// Every route except `/api/health` sits behind [`auth_middleware`].
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_request_size = state.config.max_request_size;

    let api_router = Router::new()
        // Friendship lifecycle
        .route(
            "/friends",
            post(friends::request_friend).get(friends::list_friendships),
        )
        .route(
            "/friends/{id}",
            get(friends::get_friendship).delete(friends::remove_friendship),
        )
        .route("/friends/{id}/status", put(friends::update_status))
        // Contexts
        .route(
            "/friends/contexts",
            post(contexts::add_context).delete(contexts::remove_context),
        )
        .route("/friends/{id}/contexts", get(contexts::list_contexts))
        // Likes
        .route("/friends/{id}/likes", get(likes::list_likes))
        .route("/friends/{id}/like", post(likes::like).delete(likes::unlike))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Public
        .route("/health", get(health_check))
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(DefaultBodyLimit::max(max_request_size))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let healthy = match state.manager.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };

    let store = state
        .manager
        .storage()
        .get_metadata()
        .await
        .unwrap_or_default();

    Json(serde_json::json!({
        "status": if healthy { "OK" } else { "DEGRADED" },
        "version": kinship::VERSION,
        "store": store,
    }))
}
