//! Service layer: the data pipeline between the repository and the HTTP
//! surface.
//!
//! `normalizer` turns raw rows into lots, `snapshot` aggregates them, and
//! `history` replays the history table. `queries` wires these to a
//! repository.

pub mod checksum;
pub mod history;
pub mod normalizer;
pub mod queries;
pub mod snapshot;

#[cfg(all(test, feature = "local-repo"))]
mod queries_tests;

pub use history::{HistoryDiscards, HistoryOptions, OccupancyPolicy};
pub use normalizer::{normalize_lot, NormalizedLot, UNKNOWN_LOT_NAME};
pub use queries::{ParkingService, QueryError};
pub use snapshot::{LotSnapshot, NormalizeStats};
