//! Schema initialization and management for SharedStorage

use crate::storage::errors::StorageError;
use surrealdb::{Connection, Surreal};

/// Tables owned by the shared storage, in the order they are cleared
pub(crate) const TABLES: [&str; 3] = ["friendship", "friend_context", "friend_like"];

/// Initialize the SharedStorage schema with tables and unique indexes
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    // pair_key is order independent, so one unique index covers both
    // directions of a request
    let friendship_table_query = r#"
        DEFINE TABLE IF NOT EXISTS friendship SCHEMALESS
        COMMENT "Friend requests and their current status";

        DEFINE INDEX IF NOT EXISTS friendship_id_idx ON friendship FIELDS friendship_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS friendship_pair_idx ON friendship FIELDS pair_key UNIQUE;
        DEFINE INDEX IF NOT EXISTS friendship_requester_idx ON friendship FIELDS requester_id;
        DEFINE INDEX IF NOT EXISTS friendship_target_idx ON friendship FIELDS target_id;
    "#;

    let context_table_query = r#"
        DEFINE TABLE IF NOT EXISTS friend_context SCHEMALESS
        COMMENT "Free-text notes one user keeps about another";

        DEFINE INDEX IF NOT EXISTS friend_context_friend_idx ON friend_context FIELDS friend_id;
        DEFINE INDEX IF NOT EXISTS friend_context_owner_idx ON friend_context FIELDS user_id, friend_id;
    "#;

    let like_table_query = r#"
        DEFINE TABLE IF NOT EXISTS friend_like SCHEMALESS
        COMMENT "Like markers from one user toward another";

        DEFINE INDEX IF NOT EXISTS friend_like_pair_idx ON friend_like FIELDS user_id, friend_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS friend_like_friend_idx ON friend_like FIELDS friend_id;
    "#;

    execute_schema_query(client, friendship_table_query, "friendship table").await?;
    execute_schema_query(client, context_table_query, "friend_context table").await?;
    execute_schema_query(client, like_table_query, "friend_like table").await?;

    tracing::info!("SharedStorage schema initialized");
    Ok(())
}

/// Execute a schema query and handle errors
async fn execute_schema_query<C>(
    client: &Surreal<C>,
    query: &str,
    description: &str,
) -> Result<(), StorageError>
where
    C: Connection,
{
    client
        .query(query)
        .await
        .map_err(|e| StorageError::Query(format!("Failed to create {}: {}", description, e)))?
        .check()
        .map_err(|e| StorageError::Query(format!("Failed to create {}: {}", description, e)))?;

    tracing::debug!("Created {} successfully", description);
    Ok(())
}

/// Drop all Kinship tables (useful for testing)
pub async fn drop_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    for table in TABLES {
        client
            .query(format!("REMOVE TABLE IF EXISTS {}", table))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to drop {}: {}", table, e)))?;
    }

    tracing::info!("SharedStorage schema dropped");
    Ok(())
}
