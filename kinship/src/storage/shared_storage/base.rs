//! Base shared storage implementation

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use surrealdb::{Connection, Surreal};

use super::config::SharedStorageConfig;
use super::schema::TABLES;
use crate::storage::errors::StorageError;
use crate::storage::traits::BaseStore;

/// SurrealDB-backed store for friendships, contexts and likes
#[derive(Debug)]
pub struct SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) config: SharedStorageConfig,
}

impl<C> SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Create a new shared storage instance
    pub async fn new(
        client: Surreal<C>,
        config: SharedStorageConfig,
    ) -> Result<Self, StorageError> {
        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        let storage = Self { client, config };
        storage.initialize_schema().await?;

        Ok(storage)
    }

    /// Initialize the database schema with all required tables
    async fn initialize_schema(&self) -> Result<(), StorageError> {
        super::schema::initialize_schema(&self.client).await
    }

    /// Get the underlying client for advanced operations
    pub fn client(&self) -> &Surreal<C> {
        &self.client
    }
}

/// `WHERE` conditions with their bound parameters, built from a filter
#[derive(Debug, Default)]
pub(crate) struct Conditions {
    clauses: Vec<String>,
    bindings: Vec<(String, serde_json::Value)>,
}

impl Conditions {
    /// Add `clause`, which refers to `$name`, binding `value` to it
    pub(crate) fn push(
        &mut self,
        clause: impl Into<String>,
        name: &str,
        value: impl Serialize,
    ) -> Result<(), StorageError> {
        self.clauses.push(clause.into());
        self.bindings
            .push((name.to_string(), serde_json::to_value(value)?));
        Ok(())
    }

    /// Bind a parameter used outside the `WHERE` clause
    pub(crate) fn bind(&mut self, name: &str, value: impl Serialize) -> Result<(), StorageError> {
        self.bindings
            .push((name.to_string(), serde_json::to_value(value)?));
        Ok(())
    }

    pub(crate) fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(crate) fn into_bindings(self) -> Vec<(String, serde_json::Value)> {
        self.bindings
    }
}

/// Whether a SurrealDB error reports a unique index or record id collision
pub(crate) fn is_duplicate_error(err: &surrealdb::Error) -> bool {
    let message = err.to_string();
    message.contains("already contains") || message.contains("already exists")
}

/// Attempts made by [`retry_on_conflict`] before giving up
pub(crate) const CONFLICT_ATTEMPTS: u32 = 32;

/// Whether a SurrealDB error reports a transaction aborted by a concurrent
/// writer touching the same keys
pub(crate) fn is_conflict_error(err: &surrealdb::Error) -> bool {
    let message = err.to_string();
    message.contains("read or write conflict")
        || message.contains("Failed to commit transaction")
        || message.contains("Transaction conflict")
}

/// Classify a failed statement, keeping transaction conflicts apart from
/// other query failures
pub(crate) fn query_error(action: &str, err: surrealdb::Error) -> StorageError {
    if is_conflict_error(&err) {
        StorageError::TransactionConflict(format!("{}: {}", action, err))
    } else {
        StorageError::Query(format!("{}: {}", action, err))
    }
}

/// Run `operation` until it stops failing with a transaction conflict, or
/// [`CONFLICT_ATTEMPTS`] runs out. The last result is returned either way.
pub(crate) async fn retry_on_conflict<T, F, Fut>(mut operation: F) -> Result<T, surrealdb::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, surrealdb::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(e) if is_conflict_error(&e) && attempt < CONFLICT_ATTEMPTS => {
                tracing::debug!(attempt, "Retrying after transaction conflict: {}", e);
                tokio::time::sleep(Duration::from_millis(u64::from(attempt.min(10)) * 2)).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Run a statement built from `sql` and `bindings`, retrying transaction
/// conflicts, and take the records of its first result
pub(crate) async fn run_statement<C, R>(
    client: &Surreal<C>,
    sql: &str,
    bindings: &[(String, serde_json::Value)],
) -> Result<Vec<R>, surrealdb::Error>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
    R: serde::de::DeserializeOwned + Send,
{
    retry_on_conflict(move || async move {
        let mut query = client.query(sql);
        for binding in bindings {
            query = query.bind(binding.clone());
        }
        let mut response = query.await?;
        let records: Vec<R> = response.take(0)?;
        Ok(records)
    })
    .await
}

#[async_trait]
impl<C> BaseStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        let _result = self
            .client
            .query("INFO FOR DB")
            .await
            .map_err(|e| StorageError::Connection(format!("Health check failed: {}", e)))?;

        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        for table in TABLES {
            self.client
                .query(format!("DELETE FROM {}", table))
                .await
                .map_err(|e| StorageError::Query(format!("Failed to clear table: {}", e)))?;
        }

        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        Ok(serde_json::json!({
            "type": "shared_storage",
            "namespace": self.config.namespace,
            "database": self.config.database,
            "tables": TABLES,
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        // SurrealDB connections are closed when dropped
        Ok(())
    }
}
