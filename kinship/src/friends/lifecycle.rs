//! Friendship lifecycle: request, list, status changes and removal

use std::sync::Arc;

use chrono::Utc;

use crate::models::{Friendship, FriendshipStatus, UserId};
use crate::storage::filters::{FriendshipFilter, FriendshipPatch};
use crate::storage::traits::{FriendStore, FriendshipStore};
use crate::{KinshipError, Result};

/// Handler for friendship records
#[derive(Debug, Clone)]
pub struct FriendshipLifecycle {
    storage: Arc<dyn FriendStore>,
}

impl FriendshipLifecycle {
    pub fn new(storage: Arc<dyn FriendStore>) -> Self {
        Self { storage }
    }

    /// Create a pending friendship from `requester_id` to `target_id`
    pub async fn request(&self, requester_id: &UserId, target_id: &UserId) -> Result<Friendship> {
        if requester_id == target_id {
            tracing::warn!(user_id = %requester_id, "Rejected self friend request");
            return Err(KinshipError::Validation(
                "cannot send a friend request to yourself".to_string(),
            ));
        }

        // Early check for a clean error; the store's pair key still guards
        // against a concurrent request slipping in between
        let existing = self
            .storage
            .query_friendships(FriendshipFilter::between(requester_id, target_id))
            .await?;
        if !existing.is_empty() {
            tracing::warn!(
                requester_id = %requester_id,
                target_id = %target_id,
                "Rejected duplicate friend request"
            );
            return Err(KinshipError::Conflict(
                "a friendship between these users already exists".to_string(),
            ));
        }

        let friendship = Friendship::new(requester_id.clone(), target_id.clone());
        let created = self
            .storage
            .insert_friendship(friendship)
            .await
            .map_err(|e| match KinshipError::from(e) {
                KinshipError::Conflict(_) => KinshipError::Conflict(
                    "a friendship between these users already exists".to_string(),
                ),
                other => other,
            })?;

        tracing::info!(
            friendship_id = %created.id,
            requester_id = %created.requester_id,
            target_id = %created.target_id,
            "Friend request created"
        );
        Ok(created)
    }

    /// Every friendship `user_id` takes part in, newest first
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Friendship>> {
        let mut friendships = self
            .storage
            .query_friendships(FriendshipFilter::for_participant(user_id))
            .await?;

        friendships.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        tracing::debug!(user_id = %user_id, count = friendships.len(), "Listed friendships");
        Ok(friendships)
    }

    /// The friendship with `friendship_id`, if `user_id` takes part in it
    pub async fn get(&self, friendship_id: &str, user_id: &UserId) -> Result<Friendship> {
        let found = self
            .storage
            .query_friendships(FriendshipFilter::by_id_for_participant(
                friendship_id,
                user_id,
            ))
            .await?;

        tracing::debug!(
            friendship_id,
            user_id = %user_id,
            found = !found.is_empty(),
            "Fetched friendship"
        );
        found
            .into_iter()
            .next()
            .ok_or(KinshipError::NotFoundOrForbidden)
    }

    /// Set the status of a friendship on behalf of one of its participants.
    ///
    /// The participant check is part of the update predicate, so a
    /// non-participant changes nothing and sees the same error as for a
    /// missing id.
    pub async fn update_status(
        &self,
        friendship_id: &str,
        user_id: &UserId,
        status: FriendshipStatus,
    ) -> Result<Friendship> {
        let updated = self
            .storage
            .update_friendships_where(
                FriendshipFilter::by_id_for_participant(friendship_id, user_id),
                FriendshipPatch::status(status, Utc::now()),
            )
            .await?;

        match updated.into_iter().next() {
            Some(friendship) => {
                tracing::info!(
                    friendship_id,
                    user_id = %user_id,
                    status = %friendship.status,
                    "Friendship status updated"
                );
                Ok(friendship)
            }
            None => {
                tracing::warn!(friendship_id, user_id = %user_id, "Status update matched nothing");
                Err(KinshipError::NotFoundOrForbidden)
            }
        }
    }

    /// Delete a friendship on behalf of one of its participants.
    ///
    /// Contexts and likes between the two users are kept.
    pub async fn remove(&self, friendship_id: &str, user_id: &UserId) -> Result<()> {
        let removed = self
            .storage
            .delete_friendships_where(FriendshipFilter::by_id_for_participant(
                friendship_id,
                user_id,
            ))
            .await?;

        if removed == 0 {
            tracing::warn!(friendship_id, user_id = %user_id, "Removal matched nothing");
            return Err(KinshipError::NotFoundOrForbidden);
        }

        tracing::info!(friendship_id, user_id = %user_id, "Friendship removed");
        Ok(())
    }
}
