//! Filter types for storage queries
//!
//! Every set field narrows the match (AND semantics); an empty filter matches
//! every record of its kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{FriendContext, FriendLike, Friendship, FriendshipStatus, UserId};

/// Filter for friendship queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FriendshipFilter {
    /// Filter by friendship IDs
    pub ids: Option<Vec<String>>,

    /// Match records where this user is the requester or the target
    pub participant: Option<UserId>,

    /// Filter by requester
    pub requester_id: Option<UserId>,

    /// Filter by target
    pub target_id: Option<UserId>,

    /// Match the record for this unordered pair, in either direction
    pub pair: Option<(UserId, UserId)>,

    /// Filter by status
    pub status: Option<FriendshipStatus>,
}

impl FriendshipFilter {
    /// Matches a single friendship by id
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            ids: Some(vec![id.into()]),
            ..Default::default()
        }
    }

    /// Matches every friendship the user takes part in
    pub fn for_participant(user_id: &UserId) -> Self {
        Self {
            participant: Some(user_id.clone()),
            ..Default::default()
        }
    }

    /// Matches the friendship with `id` only when `user_id` takes part in it
    pub fn by_id_for_participant(id: impl Into<String>, user_id: &UserId) -> Self {
        Self {
            ids: Some(vec![id.into()]),
            participant: Some(user_id.clone()),
            ..Default::default()
        }
    }

    /// Matches the friendship between two users regardless of direction
    pub fn between(a: &UserId, b: &UserId) -> Self {
        Self {
            pair: Some((a.clone(), b.clone())),
            ..Default::default()
        }
    }

    pub fn matches(&self, friendship: &Friendship) -> bool {
        if let Some(ids) = &self.ids
            && !ids.iter().any(|id| *id == friendship.id)
        {
            return false;
        }

        if let Some(user) = &self.participant
            && !friendship.is_participant(user)
        {
            return false;
        }

        if let Some(requester) = &self.requester_id
            && friendship.requester_id != *requester
        {
            return false;
        }

        if let Some(target) = &self.target_id
            && friendship.target_id != *target
        {
            return false;
        }

        if let Some((a, b)) = &self.pair
            && friendship.pair_key() != Friendship::pair_key_for(a, b)
        {
            return false;
        }

        if let Some(status) = self.status
            && friendship.status != status
        {
            return false;
        }

        true
    }
}

/// Field changes applied by a conditional friendship update
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FriendshipPatch {
    /// New status
    pub status: Option<FriendshipStatus>,

    /// New modification timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl FriendshipPatch {
    /// Status change stamped with the given time
    pub fn status(status: FriendshipStatus, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            updated_at: Some(at),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.updated_at.is_none()
    }

    pub fn apply(&self, friendship: &mut Friendship) {
        if let Some(status) = self.status {
            friendship.status = status;
        }
        if let Some(updated_at) = self.updated_at {
            friendship.updated_at = updated_at;
        }
    }
}

/// Filter for context queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContextFilter {
    /// Filter by the annotating user
    pub user_id: Option<UserId>,

    /// Filter by the annotated user
    pub friend_id: Option<UserId>,

    /// Exact text match
    pub text: Option<String>,
}

impl ContextFilter {
    /// Matches every context written about `friend_id`
    pub fn about(friend_id: &UserId) -> Self {
        Self {
            friend_id: Some(friend_id.clone()),
            ..Default::default()
        }
    }

    /// Matches the exact (author, subject, text) triple
    pub fn exact(user_id: &UserId, friend_id: &UserId, text: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.clone()),
            friend_id: Some(friend_id.clone()),
            text: Some(text.into()),
        }
    }

    pub fn matches(&self, context: &FriendContext) -> bool {
        self.user_id.as_ref().is_none_or(|u| context.user_id == *u)
            && self.friend_id.as_ref().is_none_or(|f| context.friend_id == *f)
            && self.text.as_ref().is_none_or(|t| context.text == *t)
    }
}

/// Filter for like queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LikeFilter {
    /// Filter by the liking user
    pub user_id: Option<UserId>,

    /// Filter by the liked user
    pub friend_id: Option<UserId>,
}

impl LikeFilter {
    /// Matches every like received by `friend_id`
    pub fn received_by(friend_id: &UserId) -> Self {
        Self {
            user_id: None,
            friend_id: Some(friend_id.clone()),
        }
    }

    /// Matches the single like from `user_id` toward `friend_id`
    pub fn exact(user_id: &UserId, friend_id: &UserId) -> Self {
        Self {
            user_id: Some(user_id.clone()),
            friend_id: Some(friend_id.clone()),
        }
    }

    pub fn matches(&self, like: &FriendLike) -> bool {
        self.user_id.as_ref().is_none_or(|u| like.user_id == *u)
            && self.friend_id.as_ref().is_none_or(|f| like.friend_id == *f)
    }
}
