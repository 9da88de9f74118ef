//! Repository configuration file support.
//!
//! The `[repository]`, `[sheets]` and `[csv]` tables of `parking.toml` select
//! and configure the data source.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use super::config::SheetsConfig;
use super::factory::RepositoryType;

/// Data-source part of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    pub sheets: SheetsConfig,
    pub csv: CsvSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

fn default_repo_type() -> String {
    "sheets".to_string()
}

/// CSV export locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    pub live_path: PathBuf,
    pub history_path: PathBuf,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            live_path: PathBuf::from("data/live.csv"),
            history_path: PathBuf::from("data/history.csv"),
        }
    }
}

impl RepositoryConfig {
    /// Get the repository type, letting `REPOSITORY_TYPE` override the file.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        match std::env::var("REPOSITORY_TYPE") {
            Ok(value) if !value.trim().is_empty() => RepositoryType::from_str(&value),
            _ => RepositoryType::from_str(&self.repository.repo_type),
        }
    }
}
