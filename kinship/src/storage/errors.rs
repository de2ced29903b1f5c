//! Error types for storage operations

use std::error::Error;
use std::fmt;

/// Error type for storage operations
#[derive(Debug)]
pub enum StorageError {
    /// Configuration error
    Configuration(String),

    /// Connection error
    Connection(String),

    /// Query error
    Query(String),

    /// Internal error
    Internal(String),

    /// Item already exists (unique constraint violated)
    AlreadyExists(String),

    /// Serialization/deserialization error
    Serialization(String),

    /// Stored data could not be converted back into a model
    Conversion(String),

    /// Write aborted by a competing transaction, still failing after retries
    TransactionConflict(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            StorageError::Connection(msg) => write!(f, "Connection error: {}", msg),
            StorageError::Query(msg) => write!(f, "Query error: {}", msg),
            StorageError::Internal(msg) => write!(f, "Internal error: {}", msg),
            StorageError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            StorageError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::Conversion(msg) => write!(f, "Conversion error: {}", msg),
            StorageError::TransactionConflict(msg) => write!(f, "Transaction conflict: {}", msg),
        }
    }
}

impl Error for StorageError {}

/// Convert a JSON error to a storage error
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
