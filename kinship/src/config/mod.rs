//! Configuration system for Kinship.
//!
//! Configuration is layered from defaults, an optional file and `KINSHIP_`
//! environment variables, then validated before use.

mod builder;
mod loader;
mod models;
#[cfg(test)]
mod tests;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "kinship.toml",
    "kinship.yaml",
    "kinship.yml",
    "kinship.json",
    ".kinship/config.toml",
    ".kinship/config.yaml",
    ".kinship/config.yml",
    ".kinship/config.json",
];

/// Environment variable prefix for Kinship configuration
pub const ENV_PREFIX: &str = "KINSHIP_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
