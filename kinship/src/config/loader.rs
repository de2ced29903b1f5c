//! Configuration loader.
//!
//! Sources are merged in order: defaults, a configuration file, then
//! `KINSHIP_` environment variables (`__` separates nested keys, e.g.
//! `KINSHIP_STORAGE__BACKEND=memory`).

use super::{ConfigError, DEFAULT_CONFIG_FILES, ENV_PREFIX, Result, models::*, validation};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};

/// Configuration loader that handles loading from multiple sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    /// Create a new configuration loader with default values.
    pub fn new() -> Self {
        let figment = Figment::new().merge(Serialized::defaults(KinshipConfig::default()));
        Self { figment }
    }

    /// Load configuration from a file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let provider_figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Figment::from(Toml::file(path)),
            Some("yaml") | Some("yml") => Figment::from(Yaml::file(path)),
            Some("json") => Figment::from(Json::file(path)),
            _ => {
                return Err(ConfigError::FileLoadError(format!(
                    "Unsupported file format: {}",
                    path.display()
                )));
            }
        };
        self.merge(provider_figment);

        Ok(self)
    }

    /// Attempt to load from default configuration file locations.
    pub fn load_default_files(&mut self) -> &mut Self {
        for file in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(file);
            if path.exists() && self.load_file(&path).is_ok() {
                return self;
            }
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("org", "kinship", "kinship") {
            let config_dir = proj_dirs.config_dir();

            for ext in &["toml", "yaml", "yml", "json"] {
                let path = config_dir.join(format!("config.{}", ext));
                if path.exists() && self.load_file(&path).is_ok() {
                    break;
                }
            }
        }

        self
    }

    /// Load configuration from environment variables.
    pub fn load_env(&mut self) -> &mut Self {
        let figment =
            std::mem::take(&mut self.figment).merge(Env::prefixed(ENV_PREFIX).split("__"));
        self.figment = figment;
        self
    }

    /// Load configuration from a custom source.
    pub fn merge<T: figment::Provider>(&mut self, provider: T) -> &mut Self {
        let figment = std::mem::take(&mut self.figment).merge(provider);
        self.figment = figment;
        self
    }

    /// Extract and validate the configuration.
    pub fn extract(&self) -> Result<KinshipConfig> {
        let config: KinshipConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        validation::validate_config(&config)?;

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
