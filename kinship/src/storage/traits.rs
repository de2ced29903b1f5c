//! Trait definitions for storage components in Kinship

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{FriendContext, FriendLike, Friendship};
use crate::storage::errors::StorageError;
use crate::storage::filters::{ContextFilter, FriendshipFilter, FriendshipPatch, LikeFilter};

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> std::result::Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> std::result::Result<(), StorageError>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> std::result::Result<serde_json::Value, StorageError>;

    /// Close connections and release resources
    async fn close(&self) -> std::result::Result<(), StorageError>;
}

/// Trait for friendship records
#[async_trait]
pub trait FriendshipStore: BaseStore {
    /// Insert a new friendship.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when a record for the same
    /// unordered pair is already stored. The check and the write are atomic.
    async fn insert_friendship(
        &self,
        friendship: Friendship,
    ) -> std::result::Result<Friendship, StorageError>;

    /// All friendships matching the filter, in no particular order
    async fn query_friendships(
        &self,
        filter: FriendshipFilter,
    ) -> std::result::Result<Vec<Friendship>, StorageError>;

    /// Apply `patch` to every friendship matching `filter` in one statement
    /// and return the updated records
    async fn update_friendships_where(
        &self,
        filter: FriendshipFilter,
        patch: FriendshipPatch,
    ) -> std::result::Result<Vec<Friendship>, StorageError>;

    /// Delete every friendship matching `filter` in one statement, returning
    /// how many were removed
    async fn delete_friendships_where(
        &self,
        filter: FriendshipFilter,
    ) -> std::result::Result<usize, StorageError>;
}

/// Trait for context annotations
#[async_trait]
pub trait ContextStore: BaseStore {
    /// Append a context; duplicates are allowed
    async fn insert_context(
        &self,
        context: FriendContext,
    ) -> std::result::Result<FriendContext, StorageError>;

    async fn query_contexts(
        &self,
        filter: ContextFilter,
    ) -> std::result::Result<Vec<FriendContext>, StorageError>;

    async fn delete_contexts_where(
        &self,
        filter: ContextFilter,
    ) -> std::result::Result<usize, StorageError>;
}

/// Trait for like markers
#[async_trait]
pub trait LikeStore: BaseStore {
    /// Store the like unless one already exists for the same
    /// `(user_id, friend_id)`. Returns `true` when a new record was written.
    async fn upsert_like(&self, like: FriendLike) -> std::result::Result<bool, StorageError>;

    async fn query_likes(
        &self,
        filter: LikeFilter,
    ) -> std::result::Result<Vec<FriendLike>, StorageError>;

    async fn delete_likes_where(
        &self,
        filter: LikeFilter,
    ) -> std::result::Result<usize, StorageError>;
}

/// Everything the friendship manager needs from a backend
pub trait FriendStore: FriendshipStore + ContextStore + LikeStore {}

impl<T> FriendStore for T where T: FriendshipStore + ContextStore + LikeStore {}
