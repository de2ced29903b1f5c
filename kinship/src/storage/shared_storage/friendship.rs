//! Friendship storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::{
    Conditions, SharedStorage, is_conflict_error, is_duplicate_error, query_error,
    retry_on_conflict, run_statement,
};
use crate::models::{Friendship, UserId};
use crate::storage::errors::StorageError;
use crate::storage::filters::{FriendshipFilter, FriendshipPatch};
use crate::storage::traits::FriendshipStore;

/// Internal representation of a Friendship record for SurrealDB
#[derive(Debug, Clone, serde::Deserialize)]
struct SurrealFriendship {
    #[allow(dead_code)]
    id: RecordId,
    friendship_id: String,
    requester_id: String,
    target_id: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Struct for creating friendships (the record id is set by the resource)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateFriendship {
    friendship_id: String,
    requester_id: String,
    target_id: String,
    pair_key: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Friendship> for CreateFriendship {
    fn from(friendship: &Friendship) -> Self {
        Self {
            friendship_id: friendship.id.clone(),
            requester_id: friendship.requester_id.to_string(),
            target_id: friendship.target_id.to_string(),
            pair_key: friendship.pair_key(),
            status: friendship.status.as_str().to_string(),
            created_at: friendship.created_at,
            updated_at: friendship.updated_at,
        }
    }
}

impl TryFrom<SurrealFriendship> for Friendship {
    type Error = StorageError;

    fn try_from(record: SurrealFriendship) -> Result<Self, Self::Error> {
        let convert = |field: &str, value: &str| {
            UserId::parse(value).map_err(|e| {
                StorageError::Conversion(format!(
                    "Friendship {} has invalid {}: {}",
                    record.friendship_id, field, e
                ))
            })
        };

        Ok(Self {
            requester_id: convert("requester_id", &record.requester_id)?,
            target_id: convert("target_id", &record.target_id)?,
            status: record.status.parse().map_err(|e| {
                StorageError::Conversion(format!(
                    "Friendship {} has invalid status: {}",
                    record.friendship_id, e
                ))
            })?,
            id: record.friendship_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

fn friendship_conditions(filter: &FriendshipFilter) -> Result<Conditions, StorageError> {
    let mut conditions = Conditions::default();

    if let Some(ids) = &filter.ids {
        conditions.push("friendship_id INSIDE $ids", "ids", ids)?;
    }
    if let Some(participant) = &filter.participant {
        conditions.push(
            "(requester_id = $participant OR target_id = $participant)",
            "participant",
            participant.as_str(),
        )?;
    }
    if let Some(requester) = &filter.requester_id {
        conditions.push("requester_id = $requester_id", "requester_id", requester.as_str())?;
    }
    if let Some(target) = &filter.target_id {
        conditions.push("target_id = $target_id", "target_id", target.as_str())?;
    }
    if let Some((a, b)) = &filter.pair {
        conditions.push(
            "pair_key = $pair_key",
            "pair_key",
            Friendship::pair_key_for(a, b),
        )?;
    }
    if let Some(status) = filter.status {
        conditions.push("status = $status", "status", status.as_str())?;
    }

    Ok(conditions)
}

fn into_friendships(records: Vec<SurrealFriendship>) -> Result<Vec<Friendship>, StorageError> {
    records.into_iter().map(Friendship::try_from).collect()
}

#[async_trait]
impl<C> FriendshipStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn insert_friendship(&self, friendship: Friendship) -> Result<Friendship, StorageError> {
        let client = &self.client;
        let id = friendship.id.as_str();
        let content = CreateFriendship::from(&friendship);
        let content = &content;

        let result = retry_on_conflict(move || async move {
            let created: surrealdb::Result<Option<SurrealFriendship>> = client
                .create(("friendship", id))
                .content(content.clone())
                .await;
            created
        })
        .await;

        let already_exists = || {
            StorageError::AlreadyExists(format!(
                "Friendship between {} and {} already exists",
                friendship.requester_id, friendship.target_id
            ))
        };

        match result {
            Ok(created) => created
                .ok_or_else(|| StorageError::Internal("No friendship created".to_string()))
                .and_then(Friendship::try_from),
            Err(e) if is_duplicate_error(&e) => Err(already_exists()),
            Err(e) if is_conflict_error(&e) => {
                // Out of retries; a competing request for the pair may have won
                let existing = self
                    .query_friendships(FriendshipFilter::between(
                        &friendship.requester_id,
                        &friendship.target_id,
                    ))
                    .await?;
                if existing.is_empty() {
                    Err(query_error("Failed to create friendship", e))
                } else {
                    Err(already_exists())
                }
            }
            Err(e) => Err(query_error("Failed to create friendship", e)),
        }
    }

    async fn query_friendships(
        &self,
        filter: FriendshipFilter,
    ) -> Result<Vec<Friendship>, StorageError> {
        let conditions = friendship_conditions(&filter)?;
        let sql = format!("SELECT * FROM friendship{}", conditions.where_clause());

        let records: Vec<SurrealFriendship> =
            run_statement(&self.client, &sql, &conditions.into_bindings())
                .await
                .map_err(|e| query_error("Failed to query friendships", e))?;

        into_friendships(records)
    }

    async fn update_friendships_where(
        &self,
        filter: FriendshipFilter,
        patch: FriendshipPatch,
    ) -> Result<Vec<Friendship>, StorageError> {
        if patch.is_empty() {
            return self.query_friendships(filter).await;
        }

        let mut conditions = friendship_conditions(&filter)?;
        let mut assignments = Vec::new();
        if let Some(status) = patch.status {
            assignments.push("status = $new_status");
            conditions.bind("new_status", status.as_str())?;
        }
        if let Some(updated_at) = patch.updated_at {
            assignments.push("updated_at = $new_updated_at");
            conditions.bind("new_updated_at", updated_at)?;
        }

        // One statement, so the filter's participant check and the write
        // happen atomically
        let sql = format!(
            "UPDATE friendship SET {}{} RETURN AFTER",
            assignments.join(", "),
            conditions.where_clause()
        );

        let records: Vec<SurrealFriendship> =
            run_statement(&self.client, &sql, &conditions.into_bindings())
                .await
                .map_err(|e| query_error("Failed to update friendships", e))?;

        into_friendships(records)
    }

    async fn delete_friendships_where(
        &self,
        filter: FriendshipFilter,
    ) -> Result<usize, StorageError> {
        let conditions = friendship_conditions(&filter)?;
        let sql = format!(
            "DELETE friendship{} RETURN BEFORE",
            conditions.where_clause()
        );

        let deleted: Vec<SurrealFriendship> =
            run_statement(&self.client, &sql, &conditions.into_bindings())
                .await
                .map_err(|e| query_error("Failed to delete friendships", e))?;

        Ok(deleted.len())
    }
}
