//! Server configuration module

use anyhow::{Result, bail};
use kinship::config::{ConfigLoader, KinshipConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// HS256 secret used to verify bearer tokens
    pub jwt_secret: String,

    /// Lifetime of tokens issued by [`crate::api::auth::generate_jwt_token`]
    pub jwt_expiration_hours: u64,

    /// Kinship library configuration file
    pub config_file_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            max_request_size: 1024 * 1024, // 1MB
            jwt_secret: String::new(),
            jwt_expiration_hours: 24,
            config_file_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI arguments and environment variables
    /// CLI arguments take precedence over environment variables
    pub fn from_cli_and_env(cli_args: crate::cli::CliArgs) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = cli_args.port {
            config.port = port;
        } else if let Ok(port) = env::var("KINSHIP_PORT") {
            config.port = port.parse()?;
        }

        if let Some(max_size) = cli_args.max_request_size {
            config.max_request_size = max_size;
        } else if let Ok(max_size) = env::var("KINSHIP_MAX_REQUEST_SIZE") {
            config.max_request_size = max_size.parse()?;
        }

        if let Some(jwt_secret) = cli_args.jwt_secret {
            config.jwt_secret = jwt_secret;
        } else if let Ok(jwt_secret) = env::var("KINSHIP_JWT_SECRET") {
            config.jwt_secret = jwt_secret;
        }

        if let Some(exp_hours) = cli_args.jwt_expiration_hours {
            config.jwt_expiration_hours = exp_hours;
        } else if let Ok(exp_hours) = env::var("KINSHIP_JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = exp_hours.parse()?;
        }

        if let Some(config_path) = cli_args.config_file {
            config.config_file_path = Some(config_path);
        } else if let Ok(config_path) = env::var("KINSHIP_CONFIG_FILE") {
            config.config_file_path = Some(PathBuf::from(config_path));
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            bail!("a JWT secret is required (--jwt-secret or KINSHIP_JWT_SECRET)");
        }
        if self.jwt_expiration_hours == 0 {
            bail!("JWT expiration must be at least one hour");
        }
        if self.max_request_size == 0 {
            bail!("maximum request size must be greater than zero");
        }
        Ok(())
    }

    /// Build the library configuration: defaults, then the configured file
    /// (or the default file locations), then `KINSHIP_*` variables.
    ///
    /// An unreadable config file is logged and skipped.
    pub fn load_kinship_config(&self) -> Result<KinshipConfig> {
        let mut loader = ConfigLoader::new();
        match &self.config_file_path {
            Some(config_file) => {
                info!("Loading Kinship configuration from {}", config_file.display());
                if let Err(e) = loader.load_file(config_file) {
                    warn!(
                        "Failed to load config file {}: {}. Using defaults.",
                        config_file.display(),
                        e
                    );
                }
            }
            None => {
                info!("No config file provided, looking for default config files");
                loader.load_default_files();
            }
        }

        Ok(loader.load_env().extract()?)
    }
}
