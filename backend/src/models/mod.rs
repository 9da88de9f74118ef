//! Domain models: raw source rows, normalized lots, routes, and column mapping.

pub mod columns;
pub mod lot;
pub mod record;
pub mod route;
pub mod time;

pub use columns::{ColumnAliases, ColumnMap, HistoryColumns, LiveColumns};
pub use lot::{
    occupancy_percent, Coordinates, LocalizedText, LotId, LotLinks, ParkingLot, RouteSummary,
};
pub use record::{CellValue, RawRecord};
pub use route::Route;
pub use time::{
    parse_timestamp, HistoryWindow, DEFAULT_TIMESTAMP_FORMAT, DEFAULT_WINDOW_HOURS, MAX_WINDOW_HOURS,
};
