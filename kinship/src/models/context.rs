//! Free-text notes one user attaches describing another

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A context annotation written by `user_id` about `friend_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FriendContext {
    /// Author of the note
    pub user_id: UserId,

    /// User the note describes
    pub friend_id: UserId,

    /// The note itself
    #[serde(rename = "context")]
    pub text: String,

    pub created_at: DateTime<Utc>,
}

impl FriendContext {
    pub fn new(user_id: UserId, friend_id: UserId, text: impl Into<String>) -> Self {
        Self {
            user_id,
            friend_id,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
