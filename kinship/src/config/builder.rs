//! Configuration builder.

use super::{Result, models::*, validation};
use crate::storage::config::{StorageBackend, SurrealDBEngine};
use std::path::Path;

/// Builder for creating KinshipConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: KinshipConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: KinshipConfig::default(),
        }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Keep everything in process memory (no SurrealDB)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.backend = StorageBackend::Memory;
        self
    }

    /// SurrealDB with its in-memory engine
    pub fn with_surrealdb_memory(mut self) -> Self {
        self.config.storage.backend = StorageBackend::SurrealDB;
        self.config.storage.surrealdb.engine = SurrealDBEngine::Memory;
        self
    }

    /// SurrealDB on RocksDB at `path`
    pub fn with_surrealdb_rocksdb<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.backend = StorageBackend::SurrealDB;
        self.config.storage.surrealdb.engine = SurrealDBEngine::RocksDB;
        self.config.storage.surrealdb.connection = path.as_ref().to_string_lossy().into_owned();
        self
    }

    pub fn with_surrealdb_namespace(
        mut self,
        namespace: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        self.config.storage.surrealdb.namespace = namespace.into();
        self.config.storage.surrealdb.database = database.into();
        self
    }

    pub fn with_max_context_length(mut self, max: usize) -> Self {
        self.config.friends.max_context_length = max;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// In-memory store with debug logging
    pub fn development() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Debug)
    }

    /// SurrealDB in-memory engine, quiet logs
    pub fn testing() -> Self {
        Self::new()
            .with_surrealdb_memory()
            .with_log_level(LogLevel::Warn)
    }

    /// SurrealDB on RocksDB under the data directory, JSON logs
    pub fn production() -> Self {
        Self::new()
            .with_log_level(LogLevel::Info)
            .with_log_format(LogFormat::Json)
    }

    pub fn build(self) -> Result<KinshipConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
