//! Like endpoints

use std::sync::Arc;

use axum::{Extension, extract::State, response::Json};
use kinship::models::{FriendLike, UserId};

use crate::{
    api::{auth::CurrentUser, dto::MessageResponse, extract::ApiPath},
    error::ServerResult,
    state::AppState,
};

/// `GET /api/friends/{id}/likes`
pub async fn list_likes(
    State(state): State<Arc<AppState>>,
    ApiPath(friend_id): ApiPath<UserId>,
) -> ServerResult<Json<Vec<FriendLike>>> {
    let likes = state.manager.list_likes(&friend_id).await?;
    Ok(Json(likes))
}

/// `POST /api/friends/{id}/like`
pub async fn like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(friend_id): ApiPath<UserId>,
) -> ServerResult<Json<MessageResponse>> {
    state.manager.like(user.id(), &friend_id).await?;
    Ok(Json(MessageResponse::new("Friend liked successfully")))
}

/// `DELETE /api/friends/{id}/like`
pub async fn unlike(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(friend_id): ApiPath<UserId>,
) -> ServerResult<Json<MessageResponse>> {
    state.manager.unlike(user.id(), &friend_id).await?;
    Ok(Json(MessageResponse::new("Friend unliked successfully")))
}
