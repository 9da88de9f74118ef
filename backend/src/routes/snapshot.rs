use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{ParkingLot, Route, RouteSummary};

/// Current state of every lot plus per-route totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    pub timestamp: NaiveDateTime,
    pub lots: Vec<ParkingLot>,
    pub route_summary: BTreeMap<Route, RouteSummary>,
    /// Hex SHA-256 over `lots` and `route_summary`.
    pub checksum: String,
}

impl SnapshotData {
    pub fn lot_count(&self) -> usize {
        self.lots.len()
    }
}

pub const GET_PARKING_DATA: &str = "/api/parking-data";
pub const GET_PARKING_LOT: &str = "/api/parking-lots/{id}";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_route_summary_keys_serialize_as_names() {
        let mut route_summary = BTreeMap::new();
        route_summary.insert(Route::Thoothukudi, RouteSummary::default());
        route_summary.insert(Route::Nagercoil, RouteSummary::default());

        let data = SnapshotData {
            timestamp: NaiveDate::from_ymd_opt(2024, 11, 7)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            lots: vec![],
            route_summary,
            checksum: String::new(),
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["timestamp"], "2024-11-07T09:30:00");
        assert!(json["route_summary"].get("Thoothukudi").is_some());
        assert!(json["route_summary"].get("Nagercoil").is_some());
        assert_eq!(data.lot_count(), 0);
    }

    #[test]
    fn test_const_values() {
        assert_eq!(GET_PARKING_DATA, "/api/parking-data");
        assert_eq!(GET_PARKING_LOT, "/api/parking-lots/{id}");
    }
}
