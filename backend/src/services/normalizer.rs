//! Row normalizer: one raw live-table row into a [`ParkingLot`].
//!
//! Only a missing identifier rejects a row. Every other field falls back to a
//! default when its column is absent or unparsable.

use crate::models::{
    occupancy_percent, CellValue, ColumnAliases, ColumnMap, Coordinates, LocalizedText, LotId,
    LotLinks, ParkingLot, RawRecord, Route,
};

/// Display name used when the primary-locale name cell is empty.
pub const UNKNOWN_LOT_NAME: &str = "Unknown Lot";

/// Reads typed fields out of one record, logging each substitution.
pub(crate) struct FieldReader<'a> {
    record: &'a RawRecord,
    lot: &'a str,
    coerced: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(record: &'a RawRecord, lot: &'a str) -> Self {
        Self {
            record,
            lot,
            coerced: 0,
        }
    }

    fn cell(&self, aliases: &ColumnAliases) -> Option<&'a CellValue> {
        aliases.lookup(self.record)
    }

    fn note_failure(&mut self, field: &str, cell: &CellValue) {
        self.coerced += 1;
        tracing::debug!(
            lot = self.lot,
            field,
            value = %cell.as_text(),
            "Field coercion failed; using default"
        );
    }

    /// Non-negative integer, `0` when missing or unparsable.
    pub(crate) fn count(&mut self, field: &str, aliases: &ColumnAliases) -> u32 {
        match self.cell(aliases) {
            None | Some(CellValue::Blank) => 0,
            Some(cell) => cell.as_count().unwrap_or_else(|| {
                self.note_failure(field, cell);
                0
            }),
        }
    }

    /// Finite float, `0.0` when missing or unparsable.
    pub(crate) fn float(&mut self, field: &str, aliases: &ColumnAliases) -> f64 {
        match self.cell(aliases) {
            None | Some(CellValue::Blank) => 0.0,
            Some(cell) => cell.as_float().unwrap_or_else(|| {
                self.note_failure(field, cell);
                0.0
            }),
        }
    }

    /// Cell text, `None` when missing or blank.
    pub(crate) fn text(&self, aliases: &ColumnAliases) -> Option<String> {
        self.cell(aliases)
            .filter(|cell| !cell.is_blank())
            .map(CellValue::as_text)
    }

    pub(crate) fn coerced(&self) -> usize {
        self.coerced
    }
}

/// Read and normalize the identifier column of any record.
pub fn read_lot_id(record: &RawRecord, aliases: &ColumnAliases) -> Option<LotId> {
    aliases
        .lookup(record)
        .and_then(|cell| LotId::parse(&cell.as_text()))
}

/// Build localized text from per-locale columns. Locales without a value take
/// the primary locale's text, which itself falls back to `default`.
fn localized(
    reader: &FieldReader<'_>,
    columns: &std::collections::BTreeMap<String, ColumnAliases>,
    primary_locale: &str,
    default: &str,
) -> LocalizedText {
    let primary = columns
        .get(primary_locale)
        .and_then(|aliases| reader.text(aliases))
        .unwrap_or_else(|| default.to_string());

    let mut text = LocalizedText::default();
    text.insert(primary_locale, primary.clone());
    for (locale, aliases) in columns {
        if locale != primary_locale {
            text.insert(locale.clone(), reader.text(aliases).unwrap_or_else(|| primary.clone()));
        }
    }
    text
}

/// Outcome of normalizing one row, with the number of substituted fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLot {
    pub lot: ParkingLot,
    pub coerced_fields: usize,
}

/// Normalize one live-table row. Returns `None` when the row has no usable
/// identifier.
pub fn normalize_lot(record: &RawRecord, columns: &ColumnMap) -> Option<NormalizedLot> {
    let live = &columns.live;
    let id = read_lot_id(record, &live.lot_id)?;
    let mut reader = FieldReader::new(record, id.as_str());

    let total_capacity = reader.count("capacity", &live.capacity);
    let current_vehicles = reader.count("occupied", &live.occupied);
    let vehicles_in = reader.count("vehicles_in", &live.vehicles_in);
    let vehicles_out = reader.count("vehicles_out", &live.vehicles_out);
    let latitude = reader.float("latitude", &live.latitude);
    let longitude = reader.float("longitude", &live.longitude);

    let is_available = reader
        .text(&live.available)
        .map(|flag| flag.trim().to_uppercase() == columns.available_sentinel.trim().to_uppercase())
        .unwrap_or(false);

    let route = Route::from_code(&reader.text(&live.route).unwrap_or_default());

    let name = localized(&reader, &live.name, &columns.primary_locale, UNKNOWN_LOT_NAME);
    let notes = localized(&reader, &live.notes, &columns.primary_locale, "");

    let links = LotLinks {
        location: reader
            .text(&live.location_link)
            .unwrap_or_else(|| LotLinks::PLACEHOLDER.to_string()),
        photos: reader
            .text(&live.photos_link)
            .unwrap_or_else(|| LotLinks::PLACEHOLDER.to_string()),
    };

    let coerced_fields = reader.coerced();
    Some(NormalizedLot {
        lot: ParkingLot {
            id,
            name,
            notes,
            total_capacity,
            current_vehicles,
            occupancy_percent: occupancy_percent(current_vehicles, total_capacity),
            is_available,
            route,
            route_name: route.localized_name(),
            vehicles_in,
            vehicles_out,
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            links,
        },
        coerced_fields,
    })
}
