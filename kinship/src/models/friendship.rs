//! Friendship model: a directional request that is queried symmetrically

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::UserId;
use crate::KinshipError;

/// Separator used when building pair keys. User ids never contain control
/// characters, so it cannot collide with id content.
const PAIR_KEY_SEPARATOR: char = '\u{1f}';

/// Status of a friendship
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    /// Requested, not yet answered
    #[default]
    Pending,

    /// Accepted by a participant
    Accepted,

    /// Declined or blocked by a participant
    #[serde(alias = "blocked")]
    Declined,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FriendshipStatus {
    type Err = KinshipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(FriendshipStatus::Pending),
            "accepted" => Ok(FriendshipStatus::Accepted),
            "declined" | "blocked" => Ok(FriendshipStatus::Declined),
            other => Err(KinshipError::Validation(format!(
                "invalid friendship status '{}', expected one of: pending, accepted, declined",
                other
            ))),
        }
    }
}

/// A friendship between a requester and a target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Friendship {
    /// Unique identifier for the friendship
    pub id: String,

    /// User who sent the request
    pub requester_id: UserId,

    /// User the request was sent to
    pub target_id: UserId,

    /// Current status
    pub status: FriendshipStatus,

    /// When the request was made
    pub created_at: DateTime<Utc>,

    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// Create a new pending request from `requester_id` to `target_id`
    pub fn new(requester_id: UserId, target_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            requester_id,
            target_id,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the given user is the requester or the target
    pub fn is_participant(&self, user_id: &UserId) -> bool {
        &self.requester_id == user_id || &self.target_id == user_id
    }

    /// Get the other participant, if `user_id` is one of them
    pub fn other_participant(&self, user_id: &UserId) -> Option<&UserId> {
        if &self.requester_id == user_id {
            Some(&self.target_id)
        } else if &self.target_id == user_id {
            Some(&self.requester_id)
        } else {
            None
        }
    }

    /// Order-independent key of this friendship's participants
    pub fn pair_key(&self) -> String {
        Self::pair_key_for(&self.requester_id, &self.target_id)
    }

    /// Order-independent key of two users
    pub fn pair_key_for(a: &UserId, b: &UserId) -> String {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        format!("{}{}{}", low, PAIR_KEY_SEPARATOR, high)
    }
}
