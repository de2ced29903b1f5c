//! Like markers between users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A "liked" marker from `user_id` toward `friend_id`. At most one exists
/// per ordered pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FriendLike {
    pub user_id: UserId,
    pub friend_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl FriendLike {
    pub fn new(user_id: UserId, friend_id: UserId) -> Self {
        Self {
            user_id,
            friend_id,
            created_at: Utc::now(),
        }
    }
}
