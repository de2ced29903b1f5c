//! Friend context endpoints

use std::sync::Arc;

use axum::{Extension, extract::State, response::Json};
use kinship::models::{FriendContext, UserId};

use crate::{
    api::{
        auth::CurrentUser,
        dto::{ContextBody, MessageResponse},
        extract::{ApiJson, ApiPath},
    },
    error::ServerResult,
    state::AppState,
};

/// `GET /api/friends/{id}/contexts`
pub async fn list_contexts(
    State(state): State<Arc<AppState>>,
    ApiPath(friend_id): ApiPath<UserId>,
) -> ServerResult<Json<Vec<FriendContext>>> {
    let contexts = state.manager.list_contexts(&friend_id).await?;
    Ok(Json(contexts))
}

/// `POST /api/friends/contexts`
pub async fn add_context(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(body): ApiJson<ContextBody>,
) -> ServerResult<Json<MessageResponse>> {
    state
        .manager
        .add_context(user.id(), &body.friend_id, &body.context)
        .await?;

    Ok(Json(MessageResponse::new("Context added successfully")))
}

/// `DELETE /api/friends/contexts`
pub async fn remove_context(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(body): ApiJson<ContextBody>,
) -> ServerResult<Json<MessageResponse>> {
    state
        .manager
        .remove_context(user.id(), &body.friend_id, &body.context)
        .await?;

    Ok(Json(MessageResponse::new("Context removed successfully")))
}
