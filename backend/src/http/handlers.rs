//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! query service.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    HealthResponse, LotHistoryData, LotHistoryQuery, OverallHistoryData, ParkingLot, SnapshotData,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::time::local_now;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Service status plus reachability of the data source.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let data_source = state.service.source_status().await;
    Ok(Json(HealthResponse::ok(data_source)))
}

/// GET /api/parking-data
///
/// Current snapshot. An unreachable source answers 200 with no lots.
pub async fn get_parking_data(State(state): State<AppState>) -> HandlerResult<SnapshotData> {
    let data = state.service.snapshot(local_now()).await?;
    tracing::info!(lots = data.lot_count(), "Served parking snapshot");
    Ok(Json(data))
}

/// GET /api/parking-lots/{id}
pub async fn get_parking_lot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<ParkingLot> {
    let lot = state.service.lot(&id).await?;
    Ok(Json(lot))
}

/// GET /api/overall-history
///
/// Vehicle count per transit route over the trailing window.
pub async fn get_overall_history(
    State(state): State<AppState>,
) -> HandlerResult<OverallHistoryData> {
    let data = state.service.overall_history(local_now()).await?;
    tracing::info!(
        points = data.series.first().map_or(0, |s| s.points.len()),
        "Served overall history"
    );
    Ok(Json(data))
}

/// GET /api/parking-lot-history?id=<lot>
pub async fn get_lot_history(
    State(state): State<AppState>,
    Query(query): Query<LotHistoryQuery>,
) -> HandlerResult<LotHistoryData> {
    let data = state
        .service
        .lot_history(query.id.as_deref(), local_now())
        .await?;
    tracing::info!(lot = %data.lot_id, points = data.points.len(), "Served lot history");
    Ok(Json(data))
}
