//! Application configuration (`parking.toml`).
//!
//! Every section is optional. Missing keys take their defaults, and a missing
//! file means "all defaults".

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::RepositoryConfig;
use crate::models::{ColumnMap, MAX_WINDOW_HOURS};
use crate::services::HistoryOptions;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "PARKING_CONFIG";

const SEARCH_PATHS: [&str; 3] = ["parking.toml", "backend/parking.toml", "../parking.toml"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Listen address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    /// Let `HOST` and `PORT` override the file. An unparsable `PORT` is
    /// ignored.
    pub fn apply_env(mut self) -> Self {
        if let Ok(host) = env::var("HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if let Some(port) = env::var("PORT").ok().and_then(|p| p.trim().parse().ok()) {
            self.port = port;
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[repository]`, `[sheets]` and `[csv]`
    #[serde(flatten)]
    pub source: RepositoryConfig,
    pub columns: ColumnMap,
    pub history: HistoryOptions,
    pub server: ServerSettings,
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    /// Range checks serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let hours = self.history.window_hours;
        if !(1..=MAX_WINDOW_HOURS).contains(&hours) {
            return Err(format!(
                "history.window_hours must be between 1 and {}, got {}",
                MAX_WINDOW_HOURS, hours
            ));
        }
        Ok(())
    }

    /// Locate the configuration file.
    ///
    /// `PARKING_CONFIG` wins when set. Otherwise `parking.toml` is searched in
    /// the current directory, `backend/`, and the parent directory.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Load the configuration file if there is one, then apply environment
    /// overrides. An explicitly named file that cannot be read is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match Self::locate() {
            Some(path) => {
                let config = Self::from_file(&path)?;
                tracing::info!(path = %path.display(), "Loaded configuration");
                config
            }
            None => {
                tracing::info!("No parking.toml found; using built-in defaults");
                Self::default()
            }
        };
        Ok(config.apply_env())
    }

    pub fn apply_env(mut self) -> Self {
        self.server = self.server.apply_env();
        self
    }
}
