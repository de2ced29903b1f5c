//! Shared Storage
//!
//! SurrealDB implementation of every storage trait used by the friendship
//! manager. Pair uniqueness for friendships and likes is enforced with
//! unique indexes, so concurrent writers cannot create duplicates.

use std::path::Path;
use std::sync::Arc;

use surrealdb::Surreal;

use crate::storage::config::{SurrealDBConfig, SurrealDBEngine};
use crate::storage::errors::StorageError;
use crate::storage::traits::FriendStore;

pub mod base;
pub mod config;
pub mod context;
pub mod friendship;
pub mod like;
pub mod schema;

pub use base::SharedStorage;
pub use config::SharedStorageConfig;

/// Type alias for embedded shared storage
pub type EmbeddedSharedStorage = SharedStorage<surrealdb::engine::local::Db>;

/// Create an embedded shared storage instance backed by RocksDB
pub async fn create_embedded_shared_storage(
    path: &str,
    config: SharedStorageConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    use surrealdb::engine::local::RocksDb;

    let client = Surreal::new::<RocksDb>(path).await.map_err(|e| {
        StorageError::Connection(format!("Failed to create embedded database: {}", e))
    })?;

    SharedStorage::new(client, config).await
}

/// Create an in-memory shared storage instance
pub async fn create_memory_shared_storage(
    config: SharedStorageConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    let client = Surreal::new::<surrealdb::engine::local::Mem>(())
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to create memory client: {}", e)))?;

    SharedStorage::new(client, config).await
}

/// Create a shared storage instance from configuration.
///
/// An empty `connection` places the RocksDB files under `data_dir`.
pub async fn create_shared_store(
    config: &SurrealDBConfig,
    data_dir: &Path,
) -> Result<Arc<dyn FriendStore>, StorageError> {
    let shared_config = SharedStorageConfig::from(config);

    match config.engine {
        SurrealDBEngine::Memory => {
            tracing::info!("Creating SharedStorage in-memory store");
            let store = create_memory_shared_storage(shared_config).await?;
            Ok(Arc::new(store))
        }
        SurrealDBEngine::RocksDB => {
            let path = if config.connection.is_empty() {
                data_dir.join("surrealdb").to_string_lossy().into_owned()
            } else {
                config.connection.clone()
            };
            tracing::info!("Creating SharedStorage RocksDB store at {}", path);

            let store = create_embedded_shared_storage(&path, shared_config).await?;
            Ok(Arc::new(store))
        }
    }
}
