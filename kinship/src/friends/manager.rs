//! Friendship manager: the single entry point to friendships, contexts and
//! likes

use std::sync::Arc;

use crate::Result;
use crate::config::FriendsConfig;
use crate::models::{FriendContext, FriendLike, Friendship, FriendshipStatus, UserId};
use crate::storage::traits::{BaseStore, FriendStore};

use super::{ContextOperations, FriendshipLifecycle, LikeOperations};

/// Owns every business rule around friendships. The store it wraps is only
/// ever written through this type.
#[derive(Debug, Clone)]
pub struct FriendshipManager {
    storage: Arc<dyn FriendStore>,
    config: FriendsConfig,
    lifecycle: FriendshipLifecycle,
    contexts: ContextOperations,
    likes: LikeOperations,
}

impl FriendshipManager {
    pub fn new(storage: Arc<dyn FriendStore>, config: FriendsConfig) -> Self {
        Self {
            lifecycle: FriendshipLifecycle::new(storage.clone()),
            contexts: ContextOperations::new(storage.clone(), config.max_context_length),
            likes: LikeOperations::new(storage.clone()),
            storage,
            config,
        }
    }

    /// Access the underlying store
    pub fn storage(&self) -> &Arc<dyn FriendStore> {
        &self.storage
    }

    pub fn config(&self) -> &FriendsConfig {
        &self.config
    }

    pub async fn health_check(&self) -> Result<bool> {
        Ok(self.storage.health_check().await?)
    }

    /// Release the store's resources
    pub async fn close(&self) -> Result<()> {
        Ok(self.storage.close().await?)
    }

    // Friendship lifecycle

    pub async fn request_friend(
        &self,
        requester_id: &UserId,
        target_id: &UserId,
    ) -> Result<Friendship> {
        self.lifecycle.request(requester_id, target_id).await
    }

    pub async fn list_friendships(&self, user_id: &UserId) -> Result<Vec<Friendship>> {
        self.lifecycle.list(user_id).await
    }

    pub async fn get_friendship(
        &self,
        friendship_id: &str,
        user_id: &UserId,
    ) -> Result<Friendship> {
        self.lifecycle.get(friendship_id, user_id).await
    }

    pub async fn update_status(
        &self,
        friendship_id: &str,
        user_id: &UserId,
        status: FriendshipStatus,
    ) -> Result<Friendship> {
        self.lifecycle
            .update_status(friendship_id, user_id, status)
            .await
    }

    pub async fn remove_friendship(&self, friendship_id: &str, user_id: &UserId) -> Result<()> {
        self.lifecycle.remove(friendship_id, user_id).await
    }

    // Contexts

    pub async fn add_context(
        &self,
        user_id: &UserId,
        friend_id: &UserId,
        text: &str,
    ) -> Result<FriendContext> {
        self.contexts.add(user_id, friend_id, text).await
    }

    pub async fn remove_context(
        &self,
        user_id: &UserId,
        friend_id: &UserId,
        text: &str,
    ) -> Result<usize> {
        self.contexts.remove(user_id, friend_id, text).await
    }

    pub async fn list_contexts(&self, friend_id: &UserId) -> Result<Vec<FriendContext>> {
        self.contexts.list(friend_id).await
    }

    // Likes

    pub async fn like(&self, user_id: &UserId, friend_id: &UserId) -> Result<()> {
        self.likes.like(user_id, friend_id).await
    }

    pub async fn unlike(&self, user_id: &UserId, friend_id: &UserId) -> Result<()> {
        self.likes.unlike(user_id, friend_id).await
    }

    pub async fn list_likes(&self, friend_id: &UserId) -> Result<Vec<FriendLike>> {
        self.likes.list(friend_id).await
    }

    pub async fn is_liked(&self, user_id: &UserId, friend_id: &UserId) -> Result<bool> {
        self.likes.is_liked(user_id, friend_id).await
    }
}
