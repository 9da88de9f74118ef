//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are the route types, re-exported here. Only request-side
//! types live in this module.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    // Health
    HealthResponse, SourceStatus,
    // History
    LotHistoryData, OverallHistoryData, RouteSeries, TimePoint,
    // Snapshot
    ParkingLot, SnapshotData,
};

/// Query parameters for the lot history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LotHistoryQuery {
    /// Lot identifier; case and surrounding whitespace are ignored
    #[serde(default)]
    pub id: Option<String>,
}
