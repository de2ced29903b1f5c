//! # Kinship
//!
//! Friend relationships between users: requests and their status, free-text
//! contexts one user keeps about another, and "like" markers.
//!
//! ## Quick Start
//!
//! ```rust
//! use kinship::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let config = ConfigBuilder::development().build()?;
//! let friends = kinship::init(config).await?;
//!
//! let alice = UserId::parse("alice")?;
//! let bob = UserId::parse("bob")?;
//!
//! let request = friends.request_friend(&alice, &bob).await?;
//! friends
//!     .update_status(&request.id, &bob, FriendshipStatus::Accepted)
//!     .await?;
//!
//! friends.add_context(&alice, &bob, "met at the climbing gym").await?;
//! friends.like(&alice, &bob).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Models**: [`models::Friendship`], [`models::FriendContext`],
//!   [`models::FriendLike`] and the validated [`models::UserId`]
//! - **Storage**: narrow traits in [`storage::traits`] with an in-memory
//!   backend and a SurrealDB backend (`surrealdb-embedded` feature)
//! - **Friends**: [`friends::FriendshipManager`], the only writer, which
//!   owns every business rule
//!
//! Transport, identity resolution and routing live in the separate server
//! crate.

pub mod config;
pub mod friends;
pub mod logging;
pub mod models;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::{init, init_logging, init_with_defaults};

    pub use crate::config::{ConfigBuilder, ConfigLoader, KinshipConfig, LogLevel};

    pub use crate::friends::FriendshipManager;

    pub use crate::models::{FriendContext, FriendLike, Friendship, FriendshipStatus, UserId};

    pub use crate::storage::{FriendStore, MemoryStore, StorageError};

    pub use crate::{ErrorClass, KinshipError, Result};
}

/// Version of the Kinship library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Coarse category of a [`KinshipError`], used by transports to pick a
/// status code without inspecting messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// No identity could be resolved
    Unauthorized,
    /// Malformed input
    BadRequest,
    /// The record does not exist or the caller may not touch it
    NotFoundOrForbidden,
    /// The write collides with an existing record
    Conflict,
    /// Anything the caller cannot fix
    Internal,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Unauthorized => "unauthorized",
            ErrorClass::BadRequest => "bad_request",
            ErrorClass::NotFoundOrForbidden => "not_found",
            ErrorClass::Conflict => "conflict",
            ErrorClass::Internal => "internal",
        }
    }
}

/// Main error type for Kinship operations
#[derive(Debug, thiserror::Error)]
pub enum KinshipError {
    /// No identity was resolved for the request
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// Missing and forbidden records are deliberately indistinguishable
    #[error("friendship not found")]
    NotFoundOrForbidden,

    /// A friendship already exists for the pair
    #[error("{0}")]
    Conflict(String),

    /// Invalid configuration at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),

    /// Opaque store failure; the detail is only reachable through `source()`
    #[error("internal store error")]
    Store(#[source] storage::StorageError),
}

impl KinshipError {
    pub fn class(&self) -> ErrorClass {
        match self {
            KinshipError::Unauthenticated(_) => ErrorClass::Unauthorized,
            KinshipError::Validation(_) => ErrorClass::BadRequest,
            KinshipError::NotFoundOrForbidden => ErrorClass::NotFoundOrForbidden,
            KinshipError::Conflict(_) => ErrorClass::Conflict,
            KinshipError::Configuration(_)
            | KinshipError::Logging(_)
            | KinshipError::Store(_) => ErrorClass::Internal,
        }
    }
}

impl From<storage::StorageError> for KinshipError {
    fn from(err: storage::StorageError) -> Self {
        match err {
            storage::StorageError::AlreadyExists(msg) => KinshipError::Conflict(msg),
            other => KinshipError::Store(other),
        }
    }
}

impl From<config::ConfigError> for KinshipError {
    fn from(err: config::ConfigError) -> Self {
        KinshipError::Configuration(err.to_string())
    }
}

/// Result type for Kinship operations
pub type Result<T> = std::result::Result<T, KinshipError>;

/// Initialize Kinship from configuration found in the default files and the
/// `KINSHIP_` environment.
pub async fn init_with_defaults() -> Result<friends::FriendshipManager> {
    let config = config::ConfigLoader::new()
        .load_default_files()
        .load_env()
        .extract()?;
    init(config).await
}

/// Install the global `tracing` subscriber described by `config`.
///
/// Hold the returned guard for as long as events should reach the log file.
pub fn init_logging(config: &config::LoggingConfig) -> Result<logging::LoggingGuard> {
    Ok(logging::init(config)?)
}

/// Initialize Kinship with the provided configuration
///
/// Creates the configured store and returns the manager that owns it.
/// Logging is left to the caller, see [`init_logging`].
///
/// # Examples
///
/// ```rust
/// use kinship::prelude::*;
///
/// async fn example() -> Result<()> {
///     let config = ConfigBuilder::new().with_memory_storage().build()?;
///     let friends = init(config).await?;
///     assert!(friends.health_check().await?);
///     Ok(())
/// }
/// ```
pub async fn init(config: config::KinshipConfig) -> Result<friends::FriendshipManager> {
    tracing::info!(
        backend = %config.storage.backend,
        "Initializing friend store"
    );

    let store = storage::create_storage_service(&config.storage).await?;

    Ok(friends::FriendshipManager::new(store, config.friends))
}
