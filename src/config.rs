// src/config.rs

//! Configuration loading utilities.
//!
//! Configuration comes from a TOML file (local or S3), falls back to defaults
//! when the file is absent, and is then overlaid with environment variables.

use std::path::Path;

use crate::models::Config;

#[cfg(feature = "s3")]
use crate::error::{AppError, Result};
#[cfg(feature = "s3")]
use crate::storage::s3::S3Storage;

/// Load configuration from a local TOML file and apply env overrides.
///
/// Falls back to defaults if loading fails.
pub fn load_config(path: &Path) -> Config {
    let mut config = Config::load_or_default(path);
    config.apply_env_overrides();
    config
}

/// Config loader for Lambda environment.
#[cfg(feature = "s3")]
pub struct LambdaConfigLoader {
    storage: S3Storage,
    prefix: String,
}

#[cfg(feature = "s3")]
impl LambdaConfigLoader {
    pub fn new(storage: S3Storage, config_prefix: &str) -> Self {
        Self {
            storage,
            prefix: config_prefix.trim_matches('/').to_string(),
        }
    }

    /// Load `{prefix}/config.toml`, using defaults when it does not exist.
    pub async fn load_config(&self) -> Result<Config> {
        let key = format!("{}/config.toml", self.prefix);
        log::info!("Loading config file from S3: {}", key);

        let mut config = match self.storage.read_bytes_optional(&key).await? {
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    AppError::config(format!("Config file {} is not valid UTF-8: {}", key, e))
                })?;
                Config::from_toml(&text)?
            }
            None => {
                log::warn!("Config file not found in S3: {}. Using defaults.", key);
                Config::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }
}
