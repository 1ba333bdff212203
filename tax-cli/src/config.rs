//! `tax-calculator.toml` settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use tax_core::db::DbConfig;
use tax_http::NBG_RATES_URL;

pub const DEFAULT_CONFIG_FILE: &str = "tax-calculator.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("the firestore backend needs firebase.project_id or --db")]
    MissingProjectId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub rates: RatesConfig,
    pub storage: StorageConfig,
    pub firebase: FirebaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatesConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: NBG_RATES_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl RatesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Registered backend name, `sqlite` or `firestore`.
    pub backend: String,
    pub connection_string: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "tax-calculations.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirebaseConfig {
    /// Realtime Database root; no server message is fetched when unset.
    pub database_url: Option<String>,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit`, or [`DEFAULT_CONFIG_FILE`] when it exists, or the
    /// built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Storage settings for the repository registry.
    ///
    /// `backend` and `connection_string` override `[storage]`. Without an
    /// explicit connection string the firestore backend is addressed by
    /// `firebase.project_id`.
    pub fn db_config(
        &self,
        backend: Option<&str>,
        connection_string: Option<&str>,
        auth_token: Option<String>,
    ) -> Result<DbConfig, ConfigError> {
        let backend = backend.unwrap_or(self.storage.backend.as_str()).to_string();
        let connection_string = match connection_string {
            Some(connection_string) => connection_string.to_string(),
            None if backend == "firestore" => self
                .firebase
                .project_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or(ConfigError::MissingProjectId)?
                .to_string(),
            None => self.storage.connection_string.clone(),
        };
        Ok(DbConfig {
            backend,
            connection_string,
            auth_token,
        })
    }
}
