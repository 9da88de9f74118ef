use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{LotId, Route};

/// One point of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint<T> {
    pub time: NaiveDateTime,
    pub value: T,
}

impl<T> TimePoint<T> {
    pub fn new(time: NaiveDateTime, value: T) -> Self {
        Self { time, value }
    }
}

/// Step-function vehicle count for one transit route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSeries {
    pub route: Route,
    pub label: String,
    pub color: String,
    pub points: Vec<TimePoint<u64>>,
}

impl RouteSeries {
    pub fn new(route: Route, points: Vec<TimePoint<u64>>) -> Self {
        Self {
            route,
            label: format!("{} Vehicle Count", route.name()),
            color: route.chart_color().to_string(),
            points,
        }
    }
}

/// Per-route history over the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallHistoryData {
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub series: Vec<RouteSeries>,
}

/// Occupancy history of a single lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotHistoryData {
    pub lot_id: LotId,
    pub lot_name: String,
    pub label: String,
    pub points: Vec<TimePoint<f64>>,
}

pub const LOT_HISTORY_LABEL: &str = "Occupancy (%)";

pub const GET_OVERALL_HISTORY: &str = "/api/overall-history";
pub const GET_LOT_HISTORY: &str = "/api/parking-lot-history";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_series_label_and_color() {
        let series = RouteSeries::new(Route::Tirunelveli, vec![]);
        assert_eq!(series.label, "Tirunelveli Vehicle Count");
        assert_eq!(series.color, "#00BCD4");
    }

    #[test]
    fn test_time_point_json_shape() {
        let time = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let json = serde_json::to_value(TimePoint::new(time, 12u64)).unwrap();
        assert_eq!(json, serde_json::json!({"time": "2024-01-02T03:04:05", "value": 12}));
    }

    #[test]
    fn test_const_values() {
        assert_eq!(GET_OVERALL_HISTORY, "/api/overall-history");
        assert_eq!(GET_LOT_HISTORY, "/api/parking-lot-history");
        assert_eq!(LOT_HISTORY_LABEL, "Occupancy (%)");
    }
}
