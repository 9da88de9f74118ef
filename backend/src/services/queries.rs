//! Query orchestration: fetch, normalize, aggregate.
//!
//! Each call re-reads the tables it needs. Nothing is cached between calls.

use std::sync::Arc;

use chrono::NaiveDateTime;

use super::checksum::checksum_json;
use super::history::{reconstruct_lot_series, reconstruct_route_series, HistoryOptions};
use super::normalizer::UNKNOWN_LOT_NAME;
use super::snapshot::LotSnapshot;
use crate::db::repository::{ParkingRepository, RepositoryError};
use crate::db::services as db_services;
use crate::models::{ColumnMap, LotId, ParkingLot, RawRecord};
use crate::routes::health::SourceStatus;
use crate::routes::history::{LotHistoryData, OverallHistoryData, LOT_HISTORY_LABEL};
use crate::routes::snapshot::SnapshotData;

/// Conditions a query reports to its caller. Everything else is recovered
/// inside the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for QueryError {
    fn from(err: RepositoryError) -> Self {
        QueryError::SourceUnavailable(err.to_string())
    }
}

const NO_SOURCE: &str = "no data source configured";

/// Read-only query service over an optional data source.
#[derive(Clone)]
pub struct ParkingService {
    repository: Option<Arc<dyn ParkingRepository>>,
    columns: Arc<ColumnMap>,
    history: Arc<HistoryOptions>,
}

impl ParkingService {
    pub fn new(
        repository: Option<Arc<dyn ParkingRepository>>,
        columns: ColumnMap,
        history: HistoryOptions,
    ) -> Self {
        Self {
            repository,
            columns: Arc::new(columns),
            history: Arc::new(history),
        }
    }

    fn source(&self) -> Result<&dyn ParkingRepository, QueryError> {
        self.repository
            .as_deref()
            .ok_or_else(|| QueryError::SourceUnavailable(NO_SOURCE.to_string()))
    }

    async fn live_records(&self) -> Result<Vec<RawRecord>, QueryError> {
        match self.repository.as_deref() {
            Some(repo) => Ok(db_services::fetch_live_records(repo).await?),
            None => {
                tracing::warn!(reason = NO_SOURCE, "Live source unavailable");
                Err(QueryError::SourceUnavailable(NO_SOURCE.to_string()))
            }
        }
    }

    async fn history_records(&self) -> Result<Vec<RawRecord>, QueryError> {
        let repo = self.source().inspect_err(|_| {
            tracing::warn!(reason = NO_SOURCE, "History source unavailable");
        })?;
        Ok(db_services::fetch_history_records(repo).await?)
    }

    async fn live_snapshot(&self) -> Result<LotSnapshot, QueryError> {
        let records = self.live_records().await?;
        let snapshot = LotSnapshot::from_records(&records, &self.columns);
        let stats = snapshot.stats();
        tracing::debug!(
            rows = stats.rows,
            lots = snapshot.len(),
            skipped = stats.skipped,
            duplicates = stats.duplicates,
            coerced_fields = stats.coerced_fields,
            "Normalized live table"
        );
        Ok(snapshot)
    }

    /// Current state of every lot. An unreachable source yields an empty
    /// snapshot rather than an error.
    pub async fn snapshot(&self, now: NaiveDateTime) -> Result<SnapshotData, QueryError> {
        let snapshot = match self.live_snapshot().await {
            Ok(snapshot) => {
                if snapshot.is_empty() {
                    tracing::info!("Snapshot contains 0 lots");
                }
                snapshot
            }
            Err(QueryError::SourceUnavailable(_)) => LotSnapshot::empty(),
            Err(e) => return Err(e),
        };

        let route_summary = snapshot.route_summaries();
        let lots = snapshot.into_lots();
        let checksum = checksum_json(&(&lots, &route_summary))
            .map_err(|e| QueryError::Internal(format!("Failed to hash snapshot: {}", e)))?;

        Ok(SnapshotData {
            timestamp: now,
            lots,
            route_summary,
            checksum,
        })
    }

    /// One lot of the current snapshot.
    pub async fn lot(&self, raw_id: &str) -> Result<ParkingLot, QueryError> {
        let id = LotId::parse(raw_id).ok_or(QueryError::MissingParameter("id"))?;
        let snapshot = self.live_snapshot().await?;
        snapshot
            .get(&id)
            .cloned()
            .ok_or_else(|| QueryError::NotFound(format!("Parking lot '{}'", id)))
    }

    /// Vehicle count per transit route over the trailing window.
    pub async fn overall_history(
        &self,
        now: NaiveDateTime,
    ) -> Result<OverallHistoryData, QueryError> {
        let records = self.history_records().await?;
        // Without the live table no history row can be attributed to a route.
        let route_map = self
            .live_snapshot()
            .await
            .map(|snapshot| snapshot.route_map())
            .unwrap_or_default();

        let window = self.history.window(now);
        let history =
            reconstruct_route_series(&records, &route_map, window, &self.columns, &self.history);
        if history.discards.total() > 0 {
            tracing::info!(
                rows = records.len(),
                discarded = history.discards.total(),
                discards = ?history.discards,
                "Overall history rebuilt with discarded rows"
            );
        }

        Ok(OverallHistoryData {
            window_start: window.start,
            window_end: window.end,
            series: history.series,
        })
    }

    /// Occupancy history of one lot. The identifier is validated before any
    /// fetch.
    pub async fn lot_history(
        &self,
        raw_id: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<LotHistoryData, QueryError> {
        let lot_id = raw_id
            .and_then(LotId::parse)
            .ok_or(QueryError::MissingParameter("id"))?;

        let records = self.history_records().await?;
        let lot_name = match self.live_snapshot().await {
            Ok(snapshot) => snapshot
                .get(&lot_id)
                .map(|lot| lot.display_name(&self.columns.primary_locale).to_string()),
            Err(_) => None,
        }
        .unwrap_or_else(|| UNKNOWN_LOT_NAME.to_string());

        let window = self.history.window(now);
        let history = reconstruct_lot_series(&records, &lot_id, window, &self.columns, &self.history);
        tracing::debug!(
            lot = %lot_id,
            points = history.points.len(),
            discarded = history.discards.total(),
            "Lot history rebuilt"
        );

        Ok(LotHistoryData {
            lot_id,
            lot_name,
            label: LOT_HISTORY_LABEL.to_string(),
            points: history.points,
        })
    }

    /// Reachability of the data source for the health endpoint.
    pub async fn source_status(&self) -> SourceStatus {
        let Some(repo) = self.repository.as_deref() else {
            return SourceStatus::Unconfigured;
        };
        match db_services::health_check(repo).await {
            Ok(true) => SourceStatus::Connected,
            Ok(false) => SourceStatus::Disconnected,
            Err(e) => SourceStatus::Error(e.to_string()),
        }
    }
}
