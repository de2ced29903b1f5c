//! Configuration structures for storage backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which storage backend backs the friendship manager
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps, lost on shutdown
    Memory,

    /// SurrealDB through [`crate::storage::SharedStorage`]
    #[default]
    #[serde(alias = "surreal")]
    SurrealDB,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::SurrealDB => write!(f, "surrealdb"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "surrealdb" | "surreal" => Ok(StorageBackend::SurrealDB),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SurrealDBConfig {
    /// SurrealDB engine type
    pub engine: SurrealDBEngine,

    /// Path for the RocksDB engine. Empty means `<data_dir>/surrealdb`.
    pub connection: String,

    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        Self {
            engine: SurrealDBEngine::RocksDB,
            connection: String::new(),
            namespace: "kinship".to_string(),
            database: "main".to_string(),
        }
    }
}

/// SurrealDB engine types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SurrealDBEngine {
    /// In-memory storage (for testing)
    Memory,
    /// RocksDB on-disk storage (embedded)
    #[default]
    RocksDB,
}

impl fmt::Display for SurrealDBEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurrealDBEngine::Memory => write!(f, "memory"),
            SurrealDBEngine::RocksDB => write!(f, "rocksdb"),
        }
    }
}
