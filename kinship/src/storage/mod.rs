//! Storage abstractions and implementations
//!
//! The friendship manager reaches persistence only through the traits in
//! [`traits`]. Two backends are provided:
//!
//! - **MemoryStore**: process-local maps behind a `RwLock`, for tests and
//!   embedded use
//! - **SharedStorage**: SurrealDB (in-memory or RocksDB engine), enabled by
//!   the `surrealdb-embedded` feature

use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod filters;
pub mod memory;
#[cfg(feature = "surrealdb-embedded")]
pub mod shared_storage;
pub mod traits;

pub use config::{StorageBackend, SurrealDBConfig, SurrealDBEngine};
pub use errors::{StorageError, StorageResult};
pub use filters::{ContextFilter, FriendshipFilter, FriendshipPatch, LikeFilter};
pub use memory::MemoryStore;
#[cfg(feature = "surrealdb-embedded")]
pub use shared_storage::{
    EmbeddedSharedStorage, SharedStorage, SharedStorageConfig, create_embedded_shared_storage,
    create_memory_shared_storage,
};
pub use traits::{BaseStore, ContextStore, FriendStore, FriendshipStore, LikeStore};

/// Create the storage backend selected by the configuration
pub async fn create_storage_service(
    config: &crate::config::StorageConfig,
) -> Result<Arc<dyn FriendStore>, StorageError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Creating in-memory friend store");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "surrealdb-embedded")]
        StorageBackend::SurrealDB => {
            shared_storage::create_shared_store(&config.surrealdb, &config.data_dir).await
        }
        #[cfg(not(feature = "surrealdb-embedded"))]
        StorageBackend::SurrealDB => Err(StorageError::Configuration(
            "SurrealDB backend requires the 'surrealdb-embedded' feature to be enabled"
                .to_string(),
        )),
    }
}
