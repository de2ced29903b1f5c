//! In-memory storage backend for tests and embedded use

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{FriendContext, FriendLike, Friendship, UserId};
use crate::storage::errors::StorageError;
use crate::storage::filters::{ContextFilter, FriendshipFilter, FriendshipPatch, LikeFilter};
use crate::storage::traits::{BaseStore, ContextStore, FriendshipStore, LikeStore};

/// Friendships keyed by id plus a pair index used to keep one record per
/// unordered pair. Both maps live behind one lock so they never drift apart.
#[derive(Debug, Default)]
struct FriendshipTable {
    by_id: HashMap<String, Friendship>,
    by_pair: HashMap<String, String>,
}

/// Store that keeps every record in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    friendships: RwLock<FriendshipTable>,
    contexts: RwLock<Vec<FriendContext>>,
    likes: RwLock<HashMap<(UserId, UserId), FriendLike>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseStore for MemoryStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut friendships = self.friendships.write().await;
        friendships.by_id.clear();
        friendships.by_pair.clear();
        self.contexts.write().await.clear();
        self.likes.write().await.clear();
        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        Ok(serde_json::json!({
            "type": "memory",
            "friendship_count": self.friendships.read().await.by_id.len(),
            "context_count": self.contexts.read().await.len(),
            "like_count": self.likes.read().await.len(),
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl FriendshipStore for MemoryStore {
    async fn insert_friendship(&self, friendship: Friendship) -> Result<Friendship, StorageError> {
        let mut table = self.friendships.write().await;
        let pair_key = friendship.pair_key();

        if table.by_pair.contains_key(&pair_key) {
            return Err(StorageError::AlreadyExists(format!(
                "Friendship between {} and {} already exists",
                friendship.requester_id, friendship.target_id
            )));
        }
        if table.by_id.contains_key(&friendship.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Friendship with ID {} already exists",
                friendship.id
            )));
        }

        table.by_pair.insert(pair_key, friendship.id.clone());
        table.by_id.insert(friendship.id.clone(), friendship.clone());
        Ok(friendship)
    }

    async fn query_friendships(
        &self,
        filter: FriendshipFilter,
    ) -> Result<Vec<Friendship>, StorageError> {
        let table = self.friendships.read().await;
        Ok(table
            .by_id
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect())
    }

    async fn update_friendships_where(
        &self,
        filter: FriendshipFilter,
        patch: FriendshipPatch,
    ) -> Result<Vec<Friendship>, StorageError> {
        let mut table = self.friendships.write().await;
        let mut updated = Vec::new();

        for friendship in table.by_id.values_mut() {
            if filter.matches(friendship) {
                patch.apply(friendship);
                updated.push(friendship.clone());
            }
        }

        Ok(updated)
    }

    async fn delete_friendships_where(
        &self,
        filter: FriendshipFilter,
    ) -> Result<usize, StorageError> {
        let mut table = self.friendships.write().await;
        let doomed: Vec<(String, String)> = table
            .by_id
            .values()
            .filter(|f| filter.matches(f))
            .map(|f| (f.id.clone(), f.pair_key()))
            .collect();

        for (id, pair_key) in &doomed {
            table.by_id.remove(id);
            table.by_pair.remove(pair_key);
        }

        Ok(doomed.len())
    }
}

#[async_trait]
impl ContextStore for MemoryStore {
    async fn insert_context(&self, context: FriendContext) -> Result<FriendContext, StorageError> {
        self.contexts.write().await.push(context.clone());
        Ok(context)
    }

    async fn query_contexts(
        &self,
        filter: ContextFilter,
    ) -> Result<Vec<FriendContext>, StorageError> {
        let contexts = self.contexts.read().await;
        Ok(contexts.iter().filter(|c| filter.matches(c)).cloned().collect())
    }

    async fn delete_contexts_where(&self, filter: ContextFilter) -> Result<usize, StorageError> {
        let mut contexts = self.contexts.write().await;
        let before = contexts.len();
        contexts.retain(|c| !filter.matches(c));
        Ok(before - contexts.len())
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn upsert_like(&self, like: FriendLike) -> Result<bool, StorageError> {
        let mut likes = self.likes.write().await;
        let key = (like.user_id.clone(), like.friend_id.clone());
        if likes.contains_key(&key) {
            return Ok(false);
        }
        likes.insert(key, like);
        Ok(true)
    }

    async fn query_likes(&self, filter: LikeFilter) -> Result<Vec<FriendLike>, StorageError> {
        let likes = self.likes.read().await;
        Ok(likes.values().filter(|l| filter.matches(l)).cloned().collect())
    }

    async fn delete_likes_where(&self, filter: LikeFilter) -> Result<usize, StorageError> {
        let mut likes = self.likes.write().await;
        let before = likes.len();
        likes.retain(|_, like| !filter.matches(like));
        Ok(before - likes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FriendshipStatus;

    fn uid(raw: &str) -> UserId {
        UserId::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_reverse_pair() {
        let store = MemoryStore::new();
        store
            .insert_friendship(Friendship::new(uid("u1"), uid("u2")))
            .await
            .unwrap();

        let result = store
            .insert_friendship(Friendship::new(uid("u2"), uid("u1")))
            .await;
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_delete_frees_pair() {
        let store = MemoryStore::new();
        let friendship = store
            .insert_friendship(Friendship::new(uid("u1"), uid("u2")))
            .await
            .unwrap();

        let removed = store
            .delete_friendships_where(FriendshipFilter::by_id(friendship.id))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        store
            .insert_friendship(Friendship::new(uid("u2"), uid("u1")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_conditional_update_skips_non_participants() {
        let store = MemoryStore::new();
        let friendship = store
            .insert_friendship(Friendship::new(uid("u1"), uid("u2")))
            .await
            .unwrap();
        let patch = FriendshipPatch::status(FriendshipStatus::Accepted, chrono::Utc::now());

        let updated = store
            .update_friendships_where(
                FriendshipFilter::by_id_for_participant(friendship.id.clone(), &uid("u3")),
                patch.clone(),
            )
            .await
            .unwrap();
        assert!(updated.is_empty());

        let updated = store
            .update_friendships_where(
                FriendshipFilter::by_id_for_participant(friendship.id, &uid("u2")),
                patch,
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].status, FriendshipStatus::Accepted);
    }

    #[tokio::test]
    async fn test_like_upsert_reports_creation() {
        let store = MemoryStore::new();
        assert!(store.upsert_like(FriendLike::new(uid("u1"), uid("u2"))).await.unwrap());
        assert!(!store.upsert_like(FriendLike::new(uid("u1"), uid("u2"))).await.unwrap());
        assert_eq!(store.query_likes(LikeFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_and_metadata() {
        let store = MemoryStore::new();
        store
            .insert_context(FriendContext::new(uid("u1"), uid("u2"), "met at work"))
            .await
            .unwrap();

        let metadata = store.get_metadata().await.unwrap();
        assert_eq!(metadata["context_count"], 1);

        store.clear().await.unwrap();
        let metadata = store.get_metadata().await.unwrap();
        assert_eq!(metadata["context_count"], 0);
        assert_eq!(metadata["type"], "memory");
    }
}
