//! Data Transfer Objects for the API
//!
//! Responses reuse the serde shape of [`kinship::models`]; only request
//! bodies and acknowledgements live here.

use kinship::models::UserId;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/friends`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFriendBody {
    /// User the caller wants to befriend
    pub friend_id: UserId,
}

/// Body of `PUT /api/friends/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusBody {
    /// One of `pending`, `accepted`, `declined` (or `blocked`)
    pub status: String,
}

/// Body of `POST` and `DELETE /api/friends/contexts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBody {
    /// User the note is about
    pub friend_id: UserId,

    /// Note text
    pub context: String,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
