//! Data-source module.
//!
//! The spreadsheet is the only system of record. This module wraps it behind
//! the Repository pattern so the service layer never knows whether rows come
//! from Google Sheets, CSV exports, or memory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / service layer                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  services.rs - fetch wrappers with logging              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ParkingRepository trait (repository/)                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┼──────────────────┐
//!     │               │                  │
//!  Sheets (HTTPS)   CSV files       Local (in-memory)
//! ```
//!
//! The connection is made once at start-up with [`connect`] and handed to the
//! HTTP state explicitly. A failed connection is not fatal: the server runs
//! without a source and every query reports it as unavailable.

#[cfg(not(any(feature = "sheets-repo", feature = "csv-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod credentials;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use config::SheetsConfig;
pub use credentials::ServiceCredential;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::{CsvSettings, RepositoryConfig, RepositorySettings};
pub use repository::{ErrorContext, ParkingRepository, RepositoryError, RepositoryResult};

use std::sync::Arc;

/// Create the configured repository, or `None` if it cannot be set up.
///
/// Failures are logged, not returned: missing credentials degrade the server
/// instead of stopping it.
pub async fn connect(config: &RepositoryConfig) -> Option<Arc<dyn ParkingRepository>> {
    match RepositoryFactory::from_config(config).await {
        Ok(repo) => {
            tracing::info!(source = %repo.describe(), "Data source connected");
            Some(repo)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                kind = e.kind(),
                "Data source unavailable; data endpoints will return empty or error results"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_local() {
        let config: RepositoryConfig = toml::from_str("[repository]\ntype = \"local\"").unwrap();
        let repo = connect(&config).await;
        assert!(repo.is_some());
    }

    #[tokio::test]
    async fn test_connect_bad_type_degrades_to_none() {
        let config: RepositoryConfig = toml::from_str("[repository]\ntype = \"oracle\"").unwrap();
        assert!(connect(&config).await.is_none());
    }
}
