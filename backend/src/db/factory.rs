//! Repository factory for dependency injection.
//!
//! This module creates repository instances based on runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::{CsvSettings, RepositoryConfig};
use super::repository::{ParkingRepository, RepositoryError, RepositoryResult};
#[cfg(feature = "sheets-repo")]
use super::config::SheetsConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Google Sheets over HTTPS
    Sheets,
    /// CSV exports on disk
    Csv,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("sheets", "csv", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sheets" | "google-sheets" | "gsheets" => Ok(Self::Sheets),
            "csv" => Ok(Self::Csv),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use parking_rust::db::{RepositoryConfig, RepositoryFactory};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config: RepositoryConfig = toml::from_str("[repository]\ntype = \"local\"")?;
///     let repo = RepositoryFactory::from_config(&config).await?;
///     assert!(repo.health_check().await?);
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create the repository selected by `config`.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn ParkingRepository>)` - connected repository
    /// * `Err(RepositoryError)` - bad configuration, missing credentials, or
    ///   a failed first authentication
    pub async fn from_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn ParkingRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Sheets => {
                #[cfg(feature = "sheets-repo")]
                {
                    let repo = Self::create_sheets(&config.sheets).await?;
                    Ok(repo as Arc<dyn ParkingRepository>)
                }
                #[cfg(not(feature = "sheets-repo"))]
                {
                    Err(RepositoryError::configuration(
                        "Sheets repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Csv => Self::create_csv(&config.csv),
            RepositoryType::Local => Self::create_local(),
        }
    }

    /// Connect to Google Sheets with the credential found in the environment.
    #[cfg(feature = "sheets-repo")]
    pub async fn create_sheets(
        config: &SheetsConfig,
    ) -> RepositoryResult<Arc<super::repositories::SheetsRepository>> {
        let config = config.clone().apply_env();
        let credential =
            super::credentials::ServiceCredential::from_env(Some(config.credentials_path.as_path()))?;
        let repo = super::repositories::SheetsRepository::connect(config, credential).await?;
        Ok(Arc::new(repo))
    }

    /// Create a CSV-export repository.
    pub fn create_csv(settings: &CsvSettings) -> RepositoryResult<Arc<dyn ParkingRepository>> {
        #[cfg(feature = "csv-repo")]
        {
            let repo = super::repositories::CsvRepository::new(super::repositories::CsvConfig {
                live_path: settings.live_path.clone(),
                history_path: settings.history_path.clone(),
            });
            Ok(Arc::new(repo))
        }
        #[cfg(not(feature = "csv-repo"))]
        {
            let _ = settings;
            Err(RepositoryError::configuration(
                "CSV repository feature not enabled",
            ))
        }
    }

    /// Create an empty in-memory local repository.
    pub fn create_local() -> RepositoryResult<Arc<dyn ParkingRepository>> {
        #[cfg(feature = "local-repo")]
        {
            Ok(Arc::new(super::repositories::LocalRepository::new()))
        }
        #[cfg(not(feature = "local-repo"))]
        {
            Err(RepositoryError::configuration(
                "Local repository feature not enabled",
            ))
        }
    }
}
