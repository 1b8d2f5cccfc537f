//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default, so an empty configuration is valid.

pub mod allocation;
pub mod logging;
pub mod storage;

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::allocation::AllocationConfig;
use self::logging::LoggingConfig;
use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay) and
/// `ROOMHUB__`-prefixed environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Persistence backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Allocation engine settings.
    #[serde(default)]
    #[validate(nested)]
    pub allocation: AllocationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config_path`, an optional `config/{env}.toml` overlay placed
    /// next to it, and environment variables prefixed with `ROOMHUB__`
    /// (e.g. `ROOMHUB__ALLOCATION__HORIZON_DAYS=90`). Missing files are
    /// ignored.
    pub fn load(config_path: &str, env: &str) -> Result<Self, AppError> {
        let overlay = Path::new(config_path)
            .parent()
            .map(|dir| dir.join(env))
            .unwrap_or_else(|| Path::new(env).to_path_buf());

        let config = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::File::from(overlay).required(false))
            .add_source(
                config::Environment::with_prefix("ROOMHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }
}
