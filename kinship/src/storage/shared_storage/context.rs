//! Friend context storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, RecordId};

use super::base::{Conditions, SharedStorage, query_error, retry_on_conflict, run_statement};
use crate::models::{FriendContext, UserId};
use crate::storage::errors::StorageError;
use crate::storage::filters::ContextFilter;
use crate::storage::traits::ContextStore;

/// Internal representation of a context record for SurrealDB
#[derive(Debug, Clone, serde::Deserialize)]
struct SurrealContext {
    id: RecordId,
    user_id: String,
    friend_id: String,
    body: String,
    created_at: DateTime<Utc>,
}

/// Struct for creating contexts (without generated fields)
#[derive(Debug, Clone, serde::Serialize)]
struct CreateContext {
    user_id: String,
    friend_id: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SurrealContext> for FriendContext {
    type Error = StorageError;

    fn try_from(record: SurrealContext) -> Result<Self, Self::Error> {
        let convert = |value: &str| {
            UserId::parse(value).map_err(|e| {
                StorageError::Conversion(format!(
                    "Context {} has invalid user id: {}",
                    record.id, e
                ))
            })
        };

        Ok(Self {
            user_id: convert(&record.user_id)?,
            friend_id: convert(&record.friend_id)?,
            text: record.body,
            created_at: record.created_at,
        })
    }
}

fn context_conditions(filter: &ContextFilter) -> Result<Conditions, StorageError> {
    let mut conditions = Conditions::default();

    if let Some(user_id) = &filter.user_id {
        conditions.push("user_id = $user_id", "user_id", user_id.as_str())?;
    }
    if let Some(friend_id) = &filter.friend_id {
        conditions.push("friend_id = $friend_id", "friend_id", friend_id.as_str())?;
    }
    if let Some(text) = &filter.text {
        conditions.push("body = $body", "body", text)?;
    }

    Ok(conditions)
}

#[async_trait]
impl<C> ContextStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn insert_context(&self, context: FriendContext) -> Result<FriendContext, StorageError> {
        let create_context = CreateContext {
            user_id: context.user_id.to_string(),
            friend_id: context.friend_id.to_string(),
            body: context.text.clone(),
            created_at: context.created_at,
        };

        let client = &self.client;
        let create_context = &create_context;
        let created = retry_on_conflict(move || async move {
            let created: surrealdb::Result<Option<SurrealContext>> = client
                .create("friend_context")
                .content(create_context.clone())
                .await;
            created
        })
        .await
        .map_err(|e| query_error("Failed to create context", e))?;

        created
            .ok_or_else(|| StorageError::Internal("No context created".to_string()))
            .and_then(FriendContext::try_from)
    }

    async fn query_contexts(
        &self,
        filter: ContextFilter,
    ) -> Result<Vec<FriendContext>, StorageError> {
        let conditions = context_conditions(&filter)?;
        let sql = format!("SELECT * FROM friend_context{}", conditions.where_clause());

        let records: Vec<SurrealContext> =
            run_statement(&self.client, &sql, &conditions.into_bindings())
                .await
                .map_err(|e| query_error("Failed to query contexts", e))?;

        records.into_iter().map(FriendContext::try_from).collect()
    }

    async fn delete_contexts_where(&self, filter: ContextFilter) -> Result<usize, StorageError> {
        let conditions = context_conditions(&filter)?;
        let sql = format!(
            "DELETE friend_context{} RETURN BEFORE",
            conditions.where_clause()
        );

        let deleted: Vec<SurrealContext> =
            run_statement(&self.client, &sql, &conditions.into_bindings())
                .await
                .map_err(|e| query_error("Failed to delete contexts", e))?;

        Ok(deleted.len())
    }
}
