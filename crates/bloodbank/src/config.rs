//! Configuration management for bloodbank.
//!
//! Configuration is layered with figment: built-in defaults, then a TOML
//! file, then `BLOODBANK_` environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "bloodbank";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "bloodbank.db";

/// Prefix for environment overrides. Nested keys are joined with `__`,
/// e.g. `BLOODBANK_REST__API_KEY`.
const ENV_PREFIX: &str = "BLOODBANK_";

/// Application configuration.
///
/// Precedence, highest first:
/// 1. Environment variables (`BLOODBANK_SECTION__KEY`)
/// 2. TOML config file at `<config dir>/bloodbank/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where submissions are sent.
    pub storage: StorageConfig,
    /// Hosted data API settings, used by the `rest` backend.
    pub rest: RestConfig,
    /// HTTP service settings.
    pub server: ServerConfig,
}

/// Which collaborator receives the inserts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Local `SQLite` database.
    #[default]
    Sqlite,
    /// Hosted PostgREST-style data API.
    Rest,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Collaborator to use.
    pub backend: Backend,
    /// Path to the `SQLite` database file.
    /// Defaults to `<data dir>/bloodbank/bloodbank.db`.
    pub database_path: Option<PathBuf>,
}

/// Hosted data API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    /// Base URL of the project, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Anonymous API key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Connect timeout for the HTTP client, in seconds.
    pub timeout_secs: u64,
}

/// HTTP service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config = Self::load_unchecked(config_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration without validating the values.
    ///
    /// Used to display a configuration that would not pass [`Config::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment cannot be parsed.
    pub fn load_unchecked(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Ok(Self::figment(&config_file).extract()?)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.rest.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "rest.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.storage.backend == Backend::Rest {
            if self.rest.url.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "rest.url is required when storage.backend = \"rest\"".to_string(),
                });
            }
            if self.rest.api_key.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "rest.api_key is required when storage.backend = \"rest\""
                        .to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Parse the configured listen address.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("server.bind is not a socket address: {}", self.server.bind),
            })
    }

    /// Connect timeout for the hosted data API.
    #[must_use]
    pub fn rest_timeout(&self) -> Duration {
        Duration::from_secs(self.rest.timeout_secs)
    }
}
