//! Logical-field to physical-column mapping.
//!
//! Sheet headers have drifted between deployments (`occupied space` vs
//! `Current_Vehicle`, a lot-type capacity column next to `Capacity`, ...). The
//! normalizer never names a column directly; it asks a [`ColumnMap`], which can
//! be overridden per deployment from the `[columns]` table of `parking.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::record::{CellValue, RawRecord};

/// One or more column names for a logical field; the first present wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnAliases {
    One(String),
    Many(Vec<String>),
}

impl ColumnAliases {
    pub fn names(&self) -> Vec<&str> {
        match self {
            ColumnAliases::One(name) => vec![name.as_str()],
            ColumnAliases::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Look the field up in `record`.
    pub fn lookup<'r>(&self, record: &'r RawRecord) -> Option<&'r CellValue> {
        record.get_any(self.names())
    }
}

impl From<&str> for ColumnAliases {
    fn from(name: &str) -> Self {
        ColumnAliases::One(name.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnAliases {
    fn from(names: [&str; N]) -> Self {
        ColumnAliases::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Columns of the live table (one row per lot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveColumns {
    pub lot_id: ColumnAliases,
    /// Locale code to name column.
    pub name: BTreeMap<String, ColumnAliases>,
    /// Locale code to notes column.
    pub notes: BTreeMap<String, ColumnAliases>,
    pub capacity: ColumnAliases,
    pub occupied: ColumnAliases,
    pub available: ColumnAliases,
    pub route: ColumnAliases,
    pub vehicles_in: ColumnAliases,
    pub vehicles_out: ColumnAliases,
    pub latitude: ColumnAliases,
    pub longitude: ColumnAliases,
    pub location_link: ColumnAliases,
    pub photos_link: ColumnAliases,
}

impl Default for LiveColumns {
    fn default() -> Self {
        Self {
            lot_id: "ParkingLotID".into(),
            name: BTreeMap::from([
                ("en".to_string(), "Parking Name".into()),
                ("ta".to_string(), "Parking Name_ta".into()),
            ]),
            notes: BTreeMap::from([
                ("en".to_string(), "Notes_en".into()),
                ("ta".to_string(), "Notes_ta".into()),
            ]),
            capacity: "Capacity".into(),
            occupied: ["occupied space", "Current_Vehicle"].into(),
            available: "Available/Filled".into(),
            route: "Route".into(),
            vehicles_in: "In".into(),
            vehicles_out: "Out".into(),
            latitude: "Latitude".into(),
            longitude: "Longitude".into(),
            location_link: "Location_Link".into(),
            photos_link: "Photos_Link".into(),
        }
    }
}

/// Columns of the append-only history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryColumns {
    pub lot_id: ColumnAliases,
    pub timestamp: ColumnAliases,
    pub occupied: ColumnAliases,
    pub capacity: ColumnAliases,
    pub occupancy_percent: ColumnAliases,
}

impl Default for HistoryColumns {
    fn default() -> Self {
        Self {
            lot_id: "ParkingLotID".into(),
            timestamp: "Timestamp".into(),
            occupied: ["occupied space", "Current_Vehicle"].into(),
            capacity: "Capacity".into(),
            occupancy_percent: "Occupancy_Percent".into(),
        }
    }
}

/// Complete column configuration for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Bumped whenever a deployment changes its sheet layout.
    pub schema_version: u32,
    pub primary_locale: String,
    /// Value of the availability column that means "open".
    pub available_sentinel: String,
    pub live: LiveColumns,
    pub history: HistoryColumns,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            schema_version: 1,
            primary_locale: "en".to_string(),
            available_sentinel: "TRUE".to_string(),
            live: LiveColumns::default(),
            history: HistoryColumns::default(),
        }
    }
}
