//! Like markers between users

use std::sync::Arc;

use crate::Result;
use crate::models::{FriendLike, UserId};
use crate::storage::filters::LikeFilter;
use crate::storage::traits::{FriendStore, LikeStore};

/// Handler for likes
#[derive(Debug, Clone)]
pub struct LikeOperations {
    storage: Arc<dyn FriendStore>,
}

impl LikeOperations {
    pub fn new(storage: Arc<dyn FriendStore>) -> Self {
        Self { storage }
    }

    /// Mark `friend_id` as liked by `user_id`. Repeating it changes nothing.
    pub async fn like(&self, user_id: &UserId, friend_id: &UserId) -> Result<()> {
        let created = self
            .storage
            .upsert_like(FriendLike::new(user_id.clone(), friend_id.clone()))
            .await?;

        tracing::info!(user_id = %user_id, friend_id = %friend_id, created, "Friend liked");
        Ok(())
    }

    /// Remove the like if present
    pub async fn unlike(&self, user_id: &UserId, friend_id: &UserId) -> Result<()> {
        let removed = self
            .storage
            .delete_likes_where(LikeFilter::exact(user_id, friend_id))
            .await?;

        tracing::info!(user_id = %user_id, friend_id = %friend_id, removed, "Friend unliked");
        Ok(())
    }

    /// Likes received by `friend_id`, oldest first
    pub async fn list(&self, friend_id: &UserId) -> Result<Vec<FriendLike>> {
        let mut likes = self
            .storage
            .query_likes(LikeFilter::received_by(friend_id))
            .await?;
        likes.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        tracing::debug!(friend_id = %friend_id, count = likes.len(), "Listed likes");
        Ok(likes)
    }

    pub async fn is_liked(&self, user_id: &UserId, friend_id: &UserId) -> Result<bool> {
        let likes = self
            .storage
            .query_likes(LikeFilter::exact(user_id, friend_id))
            .await?;
        Ok(!likes.is_empty())
    }
}
