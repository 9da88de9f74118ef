//! Service-layer wrappers around repository calls.
//!
//! These add the logging every caller wants (row counts, timings, and a clear
//! warning when the source is down) so that handlers and services never talk
//! to a repository directly.

use std::time::Instant;

use super::repository::{ParkingRepository, RepositoryResult};
use crate::models::RawRecord;

/// Fetch the full live table.
pub async fn fetch_live_records(repo: &dyn ParkingRepository) -> RepositoryResult<Vec<RawRecord>> {
    let started = Instant::now();
    match repo.fetch_live_records().await {
        Ok(records) => {
            tracing::debug!(
                rows = records.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Fetched live table"
            );
            Ok(records)
        }
        Err(e) => {
            tracing::warn!(error = %e, kind = e.kind(), "Live source unavailable");
            Err(e)
        }
    }
}

/// Fetch the full history table.
pub async fn fetch_history_records(
    repo: &dyn ParkingRepository,
) -> RepositoryResult<Vec<RawRecord>> {
    let started = Instant::now();
    match repo.fetch_history_records().await {
        Ok(records) => {
            tracing::debug!(
                rows = records.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Fetched history table"
            );
            Ok(records)
        }
        Err(e) => {
            tracing::warn!(error = %e, kind = e.kind(), "History source unavailable");
            Err(e)
        }
    }
}

/// Check whether the data source is reachable.
pub async fn health_check(repo: &dyn ParkingRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

#[cfg(all(test, feature = "local-repo"))]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::RepositoryError;

    #[tokio::test]
    async fn test_fetch_passes_through() {
        let repo = LocalRepository::new();
        repo.push_live(RawRecord::new().with_text("ParkingLotID", "P01"));

        assert_eq!(fetch_live_records(&repo).await.unwrap().len(), 1);
        assert!(fetch_history_records(&repo).await.unwrap().is_empty());
        assert!(health_check(&repo).await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch_propagates_outage() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        let err = fetch_history_records(&repo).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
    }
}
