//! Friend like storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::{
    Conditions, SharedStorage, is_conflict_error, is_duplicate_error, query_error, run_statement,
};
use crate::models::{FriendLike, UserId};
use crate::storage::errors::StorageError;
use crate::storage::filters::LikeFilter;
use crate::storage::traits::LikeStore;

/// Internal representation of a like record for SurrealDB
#[derive(Debug, Clone, serde::Deserialize)]
struct SurrealLike {
    id: RecordId,
    user_id: String,
    friend_id: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SurrealLike> for FriendLike {
    type Error = StorageError;

    fn try_from(record: SurrealLike) -> Result<Self, Self::Error> {
        let convert = |value: &str| {
            UserId::parse(value).map_err(|e| {
                StorageError::Conversion(format!("Like {} has invalid user id: {}", record.id, e))
            })
        };

        Ok(Self {
            user_id: convert(&record.user_id)?,
            friend_id: convert(&record.friend_id)?,
            created_at: record.created_at,
        })
    }
}

fn like_conditions(filter: &LikeFilter) -> Result<Conditions, StorageError> {
    let mut conditions = Conditions::default();

    if let Some(user_id) = &filter.user_id {
        conditions.push("user_id = $user_id", "user_id", user_id.as_str())?;
    }
    if let Some(friend_id) = &filter.friend_id {
        conditions.push("friend_id = $friend_id", "friend_id", friend_id.as_str())?;
    }

    Ok(conditions)
}

#[async_trait]
impl<C> LikeStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn upsert_like(&self, like: FriendLike) -> Result<bool, StorageError> {
        // Keyed by the pair, so a repeated like collides on the record id and
        // the original record is kept
        let sql = "CREATE type::thing('friend_like', [$user_id, $friend_id]) \
                   SET user_id = $user_id, friend_id = $friend_id, created_at = $created_at";
        let bindings = vec![
            ("user_id".to_string(), serde_json::to_value(like.user_id.as_str())?),
            ("friend_id".to_string(), serde_json::to_value(like.friend_id.as_str())?),
            ("created_at".to_string(), serde_json::to_value(like.created_at)?),
        ];

        match run_statement::<C, SurrealLike>(&self.client, sql, &bindings).await {
            Ok(created) if !created.is_empty() => Ok(true),
            Ok(_) => Err(StorageError::Internal("No like created".to_string())),
            Err(e) if is_duplicate_error(&e) => Ok(false),
            Err(e) if is_conflict_error(&e) => {
                let existing = self
                    .query_likes(LikeFilter::exact(&like.user_id, &like.friend_id))
                    .await?;
                if existing.is_empty() {
                    Err(query_error("Failed to create like", e))
                } else {
                    Ok(false)
                }
            }
            Err(e) => Err(query_error("Failed to create like", e)),
        }
    }

    async fn query_likes(&self, filter: LikeFilter) -> Result<Vec<FriendLike>, StorageError> {
        let conditions = like_conditions(&filter)?;
        let sql = format!("SELECT * FROM friend_like{}", conditions.where_clause());

        let records: Vec<SurrealLike> =
            run_statement(&self.client, &sql, &conditions.into_bindings())
                .await
                .map_err(|e| query_error("Failed to query likes", e))?;

        records.into_iter().map(FriendLike::try_from).collect()
    }

    async fn delete_likes_where(&self, filter: LikeFilter) -> Result<usize, StorageError> {
        let conditions = like_conditions(&filter)?;
        let sql = format!("DELETE friend_like{} RETURN BEFORE", conditions.where_clause());

        let deleted: Vec<SurrealLike> =
            run_statement(&self.client, &sql, &conditions.into_bindings())
                .await
                .map_err(|e| query_error("Failed to delete likes", e))?;

        Ok(deleted.len())
    }
}
