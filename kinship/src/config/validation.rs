//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;
use crate::storage::config::{StorageBackend, SurrealDBEngine};

/// Upper bound accepted for `friends.max_context_length`
const MAX_CONTEXT_LENGTH_LIMIT: usize = 64 * 1024;

/// Validate the entire configuration.
pub fn validate_config(config: &KinshipConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_friends_config(&config.friends)?;

    Ok(())
}

/// Validate storage configuration.
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.backend == StorageBackend::Memory {
        return Ok(());
    }

    if config.surrealdb.namespace.is_empty() {
        return Err(ConfigError::ValidationError(
            "SurrealDB namespace cannot be empty".to_string(),
        ));
    }
    if config.surrealdb.database.is_empty() {
        return Err(ConfigError::ValidationError(
            "SurrealDB database cannot be empty".to_string(),
        ));
    }

    // RocksDB falls back to <data_dir>/surrealdb when no path is given
    if config.surrealdb.engine == SurrealDBEngine::RocksDB
        && config.surrealdb.connection.is_empty()
        && config.data_dir.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "RocksDB needs either a connection path or a data directory".to_string(),
        ));
    }

    Ok(())
}

/// Validate friendship manager limits.
fn validate_friends_config(config: &FriendsConfig) -> Result<(), ConfigError> {
    if config.max_context_length == 0 {
        return Err(ConfigError::ValidationError(
            "friends.max_context_length must be greater than zero".to_string(),
        ));
    }
    if config.max_context_length > MAX_CONTEXT_LENGTH_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "friends.max_context_length cannot exceed {}",
            MAX_CONTEXT_LENGTH_LIMIT
        )));
    }

    Ok(())
}
