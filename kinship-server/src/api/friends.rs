//! Friendship lifecycle endpoints

use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode, response::Json};
use kinship::models::{Friendship, FriendshipStatus};

use crate::{
    api::{
        auth::CurrentUser,
        dto::{MessageResponse, RequestFriendBody, UpdateStatusBody},
        extract::{ApiJson, ApiPath},
    },
    error::ServerResult,
    state::AppState,
};

/// `POST /api/friends`
pub async fn request_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiJson(body): ApiJson<RequestFriendBody>,
) -> ServerResult<(StatusCode, Json<Friendship>)> {
    let friendship = state
        .manager
        .request_friend(user.id(), &body.friend_id)
        .await?;

    Ok((StatusCode::CREATED, Json(friendship)))
}

/// `GET /api/friends`
pub async fn list_friendships(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ServerResult<Json<Vec<Friendship>>> {
    let friendships = state.manager.list_friendships(user.id()).await?;
    Ok(Json(friendships))
}

/// `GET /api/friends/{id}`
pub async fn get_friendship(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<String>,
) -> ServerResult<Json<Friendship>> {
    let friendship = state.manager.get_friendship(&id, user.id()).await?;
    Ok(Json(friendship))
}

/// `PUT /api/friends/{id}/status`
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<UpdateStatusBody>,
) -> ServerResult<Json<MessageResponse>> {
    let status: FriendshipStatus = body.status.parse()?;
    state.manager.update_status(&id, user.id(), status).await?;

    Ok(Json(MessageResponse::new(
        "Friendship status updated successfully",
    )))
}

/// `DELETE /api/friends/{id}`
pub async fn remove_friendship(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    ApiPath(id): ApiPath<String>,
) -> ServerResult<Json<MessageResponse>> {
    state.manager.remove_friendship(&id, user.id()).await?;
    Ok(Json(MessageResponse::new("Friendship removed successfully")))
}
