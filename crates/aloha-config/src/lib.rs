//! # aloha-config
//!
//! Layered configuration loading for Aloha using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ALOHA_*` prefix, `__` as separator)
//! 2. Project-level `.aloha/config.toml`
//! 3. User-level `~/.config/aloha/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ALOHA_STORAGE__SETTINGS_PATH` -> `storage.settings_path`,
//! `ALOHA_MONITORING__MAX_GEOFENCES` -> `monitoring.max_geofences`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use aloha_config::AlohaConfig;
//!
//! let config = AlohaConfig::load_with_dotenv().expect("config");
//! println!("settings file: {}", config.storage.settings_path.display());
//! ```

mod error;
mod events;
mod monitoring;
mod storage;

pub use error::ConfigError;
pub use events::EventsConfig;
pub use monitoring::MonitoringConfig;
pub use storage::{DEFAULT_COLLECTION_KEY, StorageConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlohaConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

impl AlohaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value fails
    /// [`validate`](Self::validate).
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".aloha/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("ALOHA_").split("__"))
    }

    /// Reject values the manager cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero geofence limit, a zero
    /// channel capacity, or an empty collection key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitoring.max_geofences == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitoring.max_geofences".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.events.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "events.channel_capacity".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.storage.collection_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.collection_key".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("aloha").join("config.toml"))
    }
}
