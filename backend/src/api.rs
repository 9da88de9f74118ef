//! Public API surface for the parking backend.
//!
//! This file consolidates the types that appear in JSON responses.
//! All of them derive Serialize/Deserialize.

pub use crate::models::Coordinates;
pub use crate::models::LocalizedText;
pub use crate::models::LotId;
pub use crate::models::LotLinks;
pub use crate::models::ParkingLot;
pub use crate::models::Route;
pub use crate::models::RouteSummary;
pub use crate::routes::health::HealthResponse;
pub use crate::routes::health::SourceStatus;
pub use crate::routes::history::LotHistoryData;
pub use crate::routes::history::OverallHistoryData;
pub use crate::routes::history::RouteSeries;
pub use crate::routes::history::TimePoint;
pub use crate::routes::snapshot::SnapshotData;
