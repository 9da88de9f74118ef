//! Parking lot snapshot types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::route::Route;

/// Lot identifier, normalized to trimmed lowercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(String);

impl LotId {
    /// Normalize a raw identifier. Returns `None` when nothing is left after
    /// trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw.trim().to_lowercase();
        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locale code to display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    pub fn insert(&mut self, locale: impl Into<String>, text: impl Into<String>) {
        self.0.insert(locale.into(), text.into());
    }
}

/// Geographic position of a lot. `(0.0, 0.0)` when the sheet has no usable value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// External links shown on the map popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotLinks {
    pub location: String,
    pub photos: String,
}

impl LotLinks {
    pub const PLACEHOLDER: &'static str = "#";
}

impl Default for LotLinks {
    fn default() -> Self {
        Self {
            location: Self::PLACEHOLDER.to_string(),
            photos: Self::PLACEHOLDER.to_string(),
        }
    }
}

/// Current state of one lot, rebuilt from the live table on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingLot {
    pub id: LotId,
    pub name: LocalizedText,
    pub notes: LocalizedText,
    pub total_capacity: u32,
    pub current_vehicles: u32,
    /// Not clamped: a lot reporting more vehicles than capacity goes above 100.
    pub occupancy_percent: f64,
    pub is_available: bool,
    pub route: Route,
    pub route_name: LocalizedText,
    pub vehicles_in: u32,
    pub vehicles_out: u32,
    pub coordinates: Coordinates,
    pub links: LotLinks,
}

impl ParkingLot {
    /// Display name in `locale`, falling back to the first available locale.
    pub fn display_name(&self, locale: &str) -> &str {
        self.name
            .get(locale)
            .or_else(|| self.name.0.values().next().map(String::as_str))
            .unwrap_or_default()
    }
}

/// Vehicles as a percentage of capacity; `0.0` when capacity is zero.
pub fn occupancy_percent(vehicles: u32, capacity: u32) -> f64 {
    if capacity > 0 {
        vehicles as f64 / capacity as f64 * 100.0
    } else {
        0.0
    }
}

/// Aggregate over all lots on one route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_vehicles: u64,
    pub total_capacity: u64,
    pub occupancy_percent: f64,
}

impl RouteSummary {
    pub fn add(&mut self, lot: &ParkingLot) {
        self.total_vehicles += u64::from(lot.current_vehicles);
        self.total_capacity += u64::from(lot.total_capacity);
        self.occupancy_percent = if self.total_capacity > 0 {
            self.total_vehicles as f64 / self.total_capacity as f64 * 100.0
        } else {
            0.0
        };
    }
}
