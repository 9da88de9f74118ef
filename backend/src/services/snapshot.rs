//! Snapshot aggregator: all live rows into one keyed lot list plus route totals.

use std::collections::{BTreeMap, HashMap};

use super::normalizer::normalize_lot;
use crate::models::{ColumnMap, LotId, ParkingLot, RawRecord, Route, RouteSummary};

/// Counters collected while building a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub rows: usize,
    /// Rows dropped for lack of an identifier.
    pub skipped: usize,
    /// Rows that replaced an earlier row with the same identifier.
    pub duplicates: usize,
    /// Cells replaced by a default value.
    pub coerced_fields: usize,
}

/// Lots keyed by identifier, in order of first appearance.
///
/// A later row with a known identifier replaces the earlier lot's values but
/// keeps its position, so the output order depends only on source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LotSnapshot {
    lots: Vec<ParkingLot>,
    index: HashMap<LotId, usize>,
    stats: NormalizeStats,
}

impl LotSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize every record. Rows without an identifier are skipped.
    pub fn from_records(records: &[RawRecord], columns: &ColumnMap) -> Self {
        let mut snapshot = Self::empty();
        for record in records {
            snapshot.stats.rows += 1;
            let Some(normalized) = normalize_lot(record, columns) else {
                snapshot.stats.skipped += 1;
                continue;
            };
            snapshot.stats.coerced_fields += normalized.coerced_fields;
            snapshot.upsert(normalized.lot);
        }
        snapshot
    }

    fn upsert(&mut self, lot: ParkingLot) {
        match self.index.get(&lot.id) {
            Some(&position) => {
                self.stats.duplicates += 1;
                tracing::debug!(lot = %lot.id, "Duplicate lot id; later row wins");
                self.lots[position] = lot;
            }
            None => {
                self.index.insert(lot.id.clone(), self.lots.len());
                self.lots.push(lot);
            }
        }
    }

    pub fn lots(&self) -> &[ParkingLot] {
        &self.lots
    }

    pub fn into_lots(self) -> Vec<ParkingLot> {
        self.lots
    }

    pub fn get(&self, id: &LotId) -> Option<&ParkingLot> {
        self.index.get(id).map(|&position| &self.lots[position])
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn stats(&self) -> NormalizeStats {
        self.stats
    }

    /// Totals per transit route. Every transit route is present, even with no
    /// lots; VIP and Other lots never contribute.
    pub fn route_summaries(&self) -> BTreeMap<Route, RouteSummary> {
        let mut summaries: BTreeMap<Route, RouteSummary> = Route::TRANSIT
            .iter()
            .map(|&route| (route, RouteSummary::default()))
            .collect();
        for lot in &self.lots {
            if let Some(summary) = summaries.get_mut(&lot.route) {
                summary.add(lot);
            }
        }
        summaries
    }

    /// Identifier to route for every lot, used to attribute history rows.
    pub fn route_map(&self) -> HashMap<LotId, Route> {
        self.lots
            .iter()
            .map(|lot| (lot.id.clone(), lot.route))
            .collect()
    }
}
