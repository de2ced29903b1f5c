//! Integration tests for the friendship manager over the in-memory store
//!
//! Covers the lifecycle of a friendship, the participant checks on every
//! mutation, contexts and likes, and how store failures surface to callers.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use kinship::config::FriendsConfig;
use kinship::friends::FriendshipManager;
use kinship::models::{FriendContext, FriendLike, Friendship, FriendshipStatus, UserId};
use kinship::storage::{
    BaseStore, ContextFilter, ContextStore, FriendshipFilter, FriendshipPatch, FriendshipStore,
    LikeFilter, LikeStore, MemoryStore, StorageError,
};
use kinship::{ErrorClass, KinshipError};

fn uid(raw: &str) -> UserId {
    UserId::parse(raw).expect("valid user id")
}

fn create_manager() -> FriendshipManager {
    FriendshipManager::new(Arc::new(MemoryStore::new()), FriendsConfig::default())
}

#[tokio::test]
async fn test_request_creates_pending_friendship() {
    let manager = create_manager();

    let friendship = manager
        .request_friend(&uid("u1"), &uid("u2"))
        .await
        .expect("request should succeed");

    assert_eq!(friendship.requester_id, "u1");
    assert_eq!(friendship.target_id, "u2");
    assert_eq!(friendship.status, FriendshipStatus::Pending);
    assert_eq!(friendship.created_at, friendship.updated_at);
    assert!(!friendship.id.is_empty());
}

#[tokio::test]
async fn test_duplicate_and_reverse_requests_conflict() {
    let manager = create_manager();
    manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();

    let duplicate = manager.request_friend(&uid("u1"), &uid("u2")).await;
    assert!(matches!(duplicate, Err(KinshipError::Conflict(_))));

    let reverse = manager.request_friend(&uid("u2"), &uid("u1")).await;
    let err = reverse.expect_err("reverse request should conflict");
    assert_eq!(err.class(), ErrorClass::Conflict);

    assert_eq!(manager.list_friendships(&uid("u1")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_self_request_is_a_validation_error() {
    let manager = create_manager();
    let err = manager
        .request_friend(&uid("u1"), &uid("u1"))
        .await
        .expect_err("self request should fail");
    assert_eq!(err.class(), ErrorClass::BadRequest);
}

#[tokio::test]
async fn test_list_returns_only_participating_friendships() {
    let manager = create_manager();
    manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();
    manager.request_friend(&uid("u3"), &uid("u1")).await.unwrap();
    manager.request_friend(&uid("u2"), &uid("u3")).await.unwrap();

    let listed = manager.list_friendships(&uid("u1")).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|f| f.is_participant(&uid("u1"))));

    let none = manager.list_friendships(&uid("u4")).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let manager = create_manager();
    let first = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = manager.request_friend(&uid("u1"), &uid("u3")).await.unwrap();

    let listed = manager.list_friendships(&uid("u1")).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn test_request_then_accept_is_visible_to_both_users() {
    let manager = create_manager();
    let request = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();

    let accepted = manager
        .update_status(&request.id, &uid("u2"), FriendshipStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(accepted.status, FriendshipStatus::Accepted);
    assert!(accepted.updated_at >= accepted.created_at);

    for user in ["u1", "u2"] {
        let listed = manager.list_friendships(&uid(user)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, request.id);
        assert_eq!(listed[0].status, FriendshipStatus::Accepted);
    }
}

#[tokio::test]
async fn test_any_participant_may_set_any_status() {
    let manager = create_manager();
    let request = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();

    let declined = manager
        .update_status(&request.id, &uid("u1"), FriendshipStatus::Declined)
        .await
        .unwrap();
    assert_eq!(declined.status, FriendshipStatus::Declined);

    let reopened = manager
        .update_status(&request.id, &uid("u2"), FriendshipStatus::Pending)
        .await
        .unwrap();
    assert_eq!(reopened.status, FriendshipStatus::Pending);
}

#[tokio::test]
async fn test_non_participant_update_is_not_found_and_changes_nothing() {
    let manager = create_manager();
    let request = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();

    let result = manager
        .update_status(&request.id, &uid("u3"), FriendshipStatus::Accepted)
        .await;
    assert!(matches!(result, Err(KinshipError::NotFoundOrForbidden)));

    let missing = manager
        .update_status("no-such-id", &uid("u1"), FriendshipStatus::Accepted)
        .await;
    let (forbidden_msg, missing_msg) = (
        result.unwrap_err().to_string(),
        missing.unwrap_err().to_string(),
    );
    assert_eq!(forbidden_msg, missing_msg);

    let stored = manager.get_friendship(&request.id, &uid("u1")).await.unwrap();
    assert_eq!(stored, request);
}

#[tokio::test]
async fn test_get_friendship_requires_participant() {
    let manager = create_manager();
    let request = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();

    assert_eq!(
        manager.get_friendship(&request.id, &uid("u2")).await.unwrap().id,
        request.id
    );
    assert!(matches!(
        manager.get_friendship(&request.id, &uid("u3")).await,
        Err(KinshipError::NotFoundOrForbidden)
    ));
}

#[tokio::test]
async fn test_remove_twice_then_not_found() {
    let manager = create_manager();
    let request = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();

    manager
        .remove_friendship(&request.id, &uid("u2"))
        .await
        .expect("first removal succeeds");

    let second = manager.remove_friendship(&request.id, &uid("u2")).await;
    assert!(matches!(second, Err(KinshipError::NotFoundOrForbidden)));

    assert!(manager.list_friendships(&uid("u1")).await.unwrap().is_empty());

    // The pair is free again once removed
    manager.request_friend(&uid("u2"), &uid("u1")).await.unwrap();
}

#[tokio::test]
async fn test_non_participant_cannot_remove() {
    let manager = create_manager();
    let request = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();

    let result = manager.remove_friendship(&request.id, &uid("u3")).await;
    assert!(matches!(result, Err(KinshipError::NotFoundOrForbidden)));
    assert_eq!(manager.list_friendships(&uid("u1")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_context_add_list_remove() {
    let manager = create_manager();

    let added = manager
        .add_context(&uid("u1"), &uid("u2"), "likes coffee")
        .await
        .unwrap();
    assert_eq!(added.text, "likes coffee");
    manager
        .add_context(&uid("u3"), &uid("u2"), "plays chess")
        .await
        .unwrap();

    let contexts = manager.list_contexts(&uid("u2")).await.unwrap();
    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts[0].text, "likes coffee");
    assert!(
        contexts
            .iter()
            .any(|c| c.user_id == "u3" && c.text == "plays chess")
    );

    let removed = manager
        .remove_context(&uid("u1"), &uid("u2"), "likes coffee")
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let contexts = manager.list_contexts(&uid("u2")).await.unwrap();
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0].user_id, "u3");
}

#[tokio::test]
async fn test_duplicate_contexts_are_removed_together() {
    let manager = create_manager();
    for _ in 0..2 {
        manager
            .add_context(&uid("u1"), &uid("u2"), "likes coffee")
            .await
            .unwrap();
    }

    let removed = manager
        .remove_context(&uid("u1"), &uid("u2"), "likes coffee")
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let nothing = manager
        .remove_context(&uid("u1"), &uid("u2"), "likes coffee")
        .await
        .unwrap();
    assert_eq!(nothing, 0);
}

#[tokio::test]
async fn test_only_the_author_can_remove_a_context() {
    let manager = create_manager();
    manager
        .add_context(&uid("u1"), &uid("u2"), "likes coffee")
        .await
        .unwrap();

    let removed = manager
        .remove_context(&uid("u3"), &uid("u2"), "likes coffee")
        .await
        .unwrap();
    assert_eq!(removed, 0);
    assert_eq!(manager.list_contexts(&uid("u2")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_like_is_idempotent_and_unlike_is_a_no_op_when_absent() {
    let manager = create_manager();

    manager.like(&uid("u1"), &uid("u2")).await.unwrap();
    manager.like(&uid("u1"), &uid("u2")).await.unwrap();

    let likes = manager.list_likes(&uid("u2")).await.unwrap();
    assert_eq!(likes.len(), 1);
    assert!(manager.is_liked(&uid("u1"), &uid("u2")).await.unwrap());
    assert!(!manager.is_liked(&uid("u2"), &uid("u1")).await.unwrap());

    manager.unlike(&uid("u1"), &uid("u2")).await.unwrap();
    manager.unlike(&uid("u1"), &uid("u2")).await.unwrap();
    assert!(manager.list_likes(&uid("u2")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_contexts_and_likes_survive_friendship_removal() {
    let manager = create_manager();
    let request = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();
    manager
        .add_context(&uid("u1"), &uid("u2"), "college roommate")
        .await
        .unwrap();
    manager.like(&uid("u1"), &uid("u2")).await.unwrap();

    manager
        .update_status(&request.id, &uid("u2"), FriendshipStatus::Declined)
        .await
        .unwrap();
    manager.remove_friendship(&request.id, &uid("u1")).await.unwrap();

    assert_eq!(manager.list_contexts(&uid("u2")).await.unwrap().len(), 1);
    assert!(manager.is_liked(&uid("u1"), &uid("u2")).await.unwrap());
}

const WRITERS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_keep_one_record() {
    let manager = create_manager();

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.like(&uid("u1"), &uid("u2")).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().expect("every concurrent like succeeds");
    }

    assert_eq!(manager.list_likes(&uid("u2")).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_for_one_pair_store_one_friendship() {
    let manager = create_manager();

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let manager = manager.clone();
            let (from, to) = if i % 2 == 0 { ("u1", "u2") } else { ("u2", "u1") };
            tokio::spawn(async move { manager.request_friend(&uid(from), &uid(to)).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert_eq!(e.class(), ErrorClass::Conflict, "{e:?}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(manager.list_friendships(&uid("u1")).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_status_updates_all_apply() {
    let manager = create_manager();
    let request = manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let manager = manager.clone();
            let id = request.id.clone();
            let (user, status) = if i % 2 == 0 {
                ("u1", FriendshipStatus::Accepted)
            } else {
                ("u2", FriendshipStatus::Declined)
            };
            tokio::spawn(async move { manager.update_status(&id, &uid(user), status).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().expect("every participant update succeeds");
    }

    let stored = manager.get_friendship(&request.id, &uid("u1")).await.unwrap();
    assert!(matches!(
        stored.status,
        FriendshipStatus::Accepted | FriendshipStatus::Declined
    ));
    assert!(stored.updated_at >= request.updated_at);
}

/// Store whose every operation fails with a detailed backend error
#[derive(Debug)]
struct FailingStore;

fn backend_down() -> StorageError {
    StorageError::Connection("connection refused by db.internal:8000".to_string())
}

#[async_trait]
impl BaseStore for FailingStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Err(backend_down())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(backend_down())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        Err(backend_down())
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl FriendshipStore for FailingStore {
    async fn insert_friendship(&self, _friendship: Friendship) -> Result<Friendship, StorageError> {
        Err(backend_down())
    }

    async fn query_friendships(
        &self,
        _filter: FriendshipFilter,
    ) -> Result<Vec<Friendship>, StorageError> {
        Err(backend_down())
    }

    async fn update_friendships_where(
        &self,
        _filter: FriendshipFilter,
        _patch: FriendshipPatch,
    ) -> Result<Vec<Friendship>, StorageError> {
        Err(backend_down())
    }

    async fn delete_friendships_where(
        &self,
        _filter: FriendshipFilter,
    ) -> Result<usize, StorageError> {
        Err(backend_down())
    }
}

#[async_trait]
impl ContextStore for FailingStore {
    async fn insert_context(&self, _context: FriendContext) -> Result<FriendContext, StorageError> {
        Err(backend_down())
    }

    async fn query_contexts(
        &self,
        _filter: ContextFilter,
    ) -> Result<Vec<FriendContext>, StorageError> {
        Err(backend_down())
    }

    async fn delete_contexts_where(&self, _filter: ContextFilter) -> Result<usize, StorageError> {
        Err(backend_down())
    }
}

#[async_trait]
impl LikeStore for FailingStore {
    async fn upsert_like(&self, _like: FriendLike) -> Result<bool, StorageError> {
        Err(backend_down())
    }

    async fn query_likes(&self, _filter: LikeFilter) -> Result<Vec<FriendLike>, StorageError> {
        Err(backend_down())
    }

    async fn delete_likes_where(&self, _filter: LikeFilter) -> Result<usize, StorageError> {
        Err(backend_down())
    }
}

#[tokio::test]
async fn test_store_failures_are_internal_and_opaque() {
    let manager = FriendshipManager::new(Arc::new(FailingStore), FriendsConfig::default());

    let errors = vec![
        manager.request_friend(&uid("u1"), &uid("u2")).await.unwrap_err(),
        manager.list_friendships(&uid("u1")).await.unwrap_err(),
        manager
            .update_status("id", &uid("u1"), FriendshipStatus::Accepted)
            .await
            .unwrap_err(),
        manager.remove_friendship("id", &uid("u1")).await.unwrap_err(),
        manager.add_context(&uid("u1"), &uid("u2"), "note").await.unwrap_err(),
        manager.like(&uid("u1"), &uid("u2")).await.unwrap_err(),
        manager.unlike(&uid("u1"), &uid("u2")).await.unwrap_err(),
    ];

    for err in errors {
        assert_eq!(err.class(), ErrorClass::Internal);
        assert!(!err.to_string().contains("db.internal"));
        let source = err.source().expect("store error keeps its cause");
        assert!(source.to_string().contains("db.internal"));
    }
}

#[tokio::test]
async fn test_init_with_memory_backend() {
    let config = kinship::config::ConfigBuilder::new()
        .with_memory_storage()
        .build()
        .unwrap();

    let manager = kinship::init(config).await.unwrap();
    assert!(manager.health_check().await.unwrap());

    let metadata = manager.storage().get_metadata().await.unwrap();
    assert_eq!(metadata["type"], "memory");
}
