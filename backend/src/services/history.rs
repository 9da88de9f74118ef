//! History reconstructor.
//!
//! Replays the append-only history table into time series bounded to a
//! trailing window. Rows arrive in sheet order, not time order.
//!
//! * Per-route series are step functions: the last known count of every lot
//!   carries forward until that lot is updated again, and every surviving
//!   timestamp yields one point on every transit route.
//! * Per-lot series map each surviving row to one occupancy point, with no
//!   merging.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::normalizer::{read_lot_id, FieldReader};
use crate::models::{
    occupancy_percent, parse_timestamp, ColumnMap, HistoryColumns, HistoryWindow, LotId, RawRecord,
    Route, DEFAULT_TIMESTAMP_FORMAT, DEFAULT_WINDOW_HOURS,
};
use crate::routes::history::{RouteSeries, TimePoint};

/// Where per-lot history occupancy comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyPolicy {
    /// Recompute from the capacity and occupied columns of the history row.
    #[default]
    Recompute,
    /// Read the stored percentage column as-is.
    Stored,
}

/// `[history]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryOptions {
    pub window_hours: i64,
    /// chrono format string of the timestamp column.
    pub timestamp_format: String,
    pub occupancy_policy: OccupancyPolicy,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            window_hours: DEFAULT_WINDOW_HOURS,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            occupancy_policy: OccupancyPolicy::default(),
        }
    }
}

impl HistoryOptions {
    pub fn window(&self, now: NaiveDateTime) -> HistoryWindow {
        HistoryWindow::trailing(now, self.window_hours)
    }
}

/// Why a history row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingLotId,
    UnknownLot,
    BadTimestamp,
    OutsideWindow,
}

/// Per-reason counts of dropped history rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryDiscards {
    pub missing_lot_id: usize,
    pub unknown_lot: usize,
    pub bad_timestamp: usize,
    pub outside_window: usize,
}

impl HistoryDiscards {
    pub fn record(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::MissingLotId => self.missing_lot_id += 1,
            RejectReason::UnknownLot => self.unknown_lot += 1,
            RejectReason::BadTimestamp => self.bad_timestamp += 1,
            RejectReason::OutsideWindow => self.outside_window += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_lot_id + self.unknown_lot + self.bad_timestamp + self.outside_window
    }
}

/// A history row with a usable identifier and timestamp.
struct Stamped<'a> {
    record: &'a RawRecord,
    lot_id: LotId,
    timestamp: NaiveDateTime,
}

fn read_stamp<'a>(
    record: &'a RawRecord,
    lot_id: LotId,
    columns: &HistoryColumns,
    format: &str,
    window: &HistoryWindow,
) -> Result<Stamped<'a>, RejectReason> {
    let timestamp = columns
        .timestamp
        .lookup(record)
        .and_then(|cell| parse_timestamp(&cell.as_text(), format))
        .ok_or(RejectReason::BadTimestamp)?;
    if !window.contains(timestamp) {
        return Err(RejectReason::OutsideWindow);
    }
    Ok(Stamped {
        record,
        lot_id,
        timestamp,
    })
}

fn reject(discards: &mut HistoryDiscards, row: usize, reason: RejectReason) {
    tracing::debug!(row, ?reason, "History row discarded");
    discards.record(reason);
}

/// Per-route series plus what was dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteHistory {
    pub series: Vec<RouteSeries>,
    pub discards: HistoryDiscards,
}

/// Rebuild the vehicle-count step function of every transit route.
///
/// Rows for lots absent from `route_map` are dropped. Every lot in the map
/// starts at zero. Rows sharing a timestamp merge into one update; for the
/// same timestamp and lot, the later row wins.
pub fn reconstruct_route_series(
    records: &[RawRecord],
    route_map: &HashMap<LotId, Route>,
    window: HistoryWindow,
    columns: &ColumnMap,
    options: &HistoryOptions,
) -> RouteHistory {
    let history = &columns.history;
    let mut discards = HistoryDiscards::default();
    let mut updates: BTreeMap<NaiveDateTime, HashMap<LotId, u32>> = BTreeMap::new();

    for (row, record) in records.iter().enumerate() {
        let Some(lot_id) = read_lot_id(record, &history.lot_id) else {
            reject(&mut discards, row, RejectReason::MissingLotId);
            continue;
        };
        if !route_map.contains_key(&lot_id) {
            reject(&mut discards, row, RejectReason::UnknownLot);
            continue;
        }
        let stamped =
            match read_stamp(record, lot_id, history, &options.timestamp_format, &window) {
                Ok(stamped) => stamped,
                Err(reason) => {
                    reject(&mut discards, row, reason);
                    continue;
                }
            };

        let vehicles =
            FieldReader::new(stamped.record, stamped.lot_id.as_str()).count("occupied", &history.occupied);
        updates
            .entry(stamped.timestamp)
            .or_default()
            .insert(stamped.lot_id, vehicles);
    }

    let mut running: HashMap<LotId, u32> = HashMap::with_capacity(route_map.len());
    let mut totals: HashMap<Route, u64> = HashMap::new();
    let mut points: BTreeMap<Route, Vec<TimePoint<u64>>> = Route::TRANSIT
        .iter()
        .map(|&route| (route, Vec::with_capacity(updates.len())))
        .collect();

    for (timestamp, snapshot) in updates {
        for (lot_id, vehicles) in snapshot {
            let Some(&route) = route_map.get(&lot_id) else {
                continue;
            };
            let previous = running.insert(lot_id, vehicles).unwrap_or(0);
            let total = totals.entry(route).or_insert(0);
            *total = *total - u64::from(previous) + u64::from(vehicles);
        }
        for (route, series) in points.iter_mut() {
            let value = totals.get(route).copied().unwrap_or(0);
            series.push(TimePoint::new(timestamp, value));
        }
    }

    RouteHistory {
        series: Route::TRANSIT
            .iter()
            .map(|route| RouteSeries::new(*route, points.remove(route).unwrap_or_default()))
            .collect(),
        discards,
    }
}

/// Occupancy points of one lot plus what was dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct LotHistory {
    pub points: Vec<TimePoint<f64>>,
    pub discards: HistoryDiscards,
}

/// One occupancy point per history row of `lot_id`, oldest first. Rows with
/// equal timestamps keep their sheet order.
pub fn reconstruct_lot_series(
    records: &[RawRecord],
    lot_id: &LotId,
    window: HistoryWindow,
    columns: &ColumnMap,
    options: &HistoryOptions,
) -> LotHistory {
    let history = &columns.history;
    let mut discards = HistoryDiscards::default();
    let mut points = Vec::new();

    for (row, record) in records.iter().enumerate() {
        match read_lot_id(record, &history.lot_id) {
            Some(id) if &id == lot_id => {}
            _ => continue,
        }
        let stamped =
            match read_stamp(record, lot_id.clone(), history, &options.timestamp_format, &window) {
                Ok(stamped) => stamped,
                Err(reason) => {
                    reject(&mut discards, row, reason);
                    continue;
                }
            };

        let mut reader = FieldReader::new(stamped.record, stamped.lot_id.as_str());
        let value = match options.occupancy_policy {
            OccupancyPolicy::Recompute => {
                let capacity = reader.count("capacity", &history.capacity);
                let vehicles = reader.count("occupied", &history.occupied);
                occupancy_percent(vehicles, capacity)
            }
            OccupancyPolicy::Stored => reader.float("occupancy_percent", &history.occupancy_percent),
        };
        points.push(TimePoint::new(stamped.timestamp, value));
    }

    points.sort_by_key(|point| point.time);
    LotHistory { points, discards }
}
