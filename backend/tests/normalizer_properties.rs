//! Properties of the normalizer and snapshot aggregator over arbitrary cells.

use proptest::prelude::*;

use parking_rust::models::{CellValue, ColumnMap, RawRecord, Route};
use parking_rust::services::{normalize_lot, LotSnapshot};

fn cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Blank),
        any::<f64>().prop_map(CellValue::Number),
        "[ -~]{0,12}".prop_map(|s| CellValue::text(s)),
        (0u32..10_000).prop_map(|n| CellValue::text(n.to_string())),
    ]
}

fn route_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("TUT".to_string()),
        Just("tin".to_string()),
        Just(" NGL ".to_string()),
        Just("VIP".to_string()),
        "[A-Z]{0,4}",
    ]
}

fn live_record() -> impl Strategy<Value = RawRecord> {
    ("[A-Za-z0-9]{1,4}", cell(), cell(), route_code()).prop_map(
        |(id, capacity, occupied, route)| {
            RawRecord::new()
                .with_text("ParkingLotID", id)
                .with("Capacity", capacity)
                .with("occupied space", occupied)
                .with_text("Route", route)
        },
    )
}

proptest! {
    #[test]
    fn prop_occupancy_zero_when_capacity_zero(record in live_record()) {
        let lot = normalize_lot(&record, &ColumnMap::default()).unwrap().lot;
        if lot.total_capacity == 0 {
            prop_assert_eq!(lot.occupancy_percent, 0.0);
        }
        prop_assert!(lot.occupancy_percent.is_finite());
        prop_assert!(lot.occupancy_percent >= 0.0);
    }

    #[test]
    fn prop_route_summaries_cover_exactly_transit_lots(
        records in prop::collection::vec(live_record(), 0..30)
    ) {
        let snapshot = LotSnapshot::from_records(&records, &ColumnMap::default());
        let summaries = snapshot.route_summaries();

        prop_assert_eq!(summaries.len(), Route::TRANSIT.len());
        for route in Route::TRANSIT {
            let lots: Vec<_> = snapshot.lots().iter().filter(|lot| lot.route == route).collect();
            let vehicles: u64 = lots.iter().map(|lot| u64::from(lot.current_vehicles)).sum();
            let capacity: u64 = lots.iter().map(|lot| u64::from(lot.total_capacity)).sum();
            prop_assert_eq!(summaries[&route].total_vehicles, vehicles);
            prop_assert_eq!(summaries[&route].total_capacity, capacity);
            if capacity == 0 {
                prop_assert_eq!(summaries[&route].occupancy_percent, 0.0);
            }
        }
    }

    #[test]
    fn prop_snapshot_ids_are_unique(records in prop::collection::vec(live_record(), 0..30)) {
        let snapshot = LotSnapshot::from_records(&records, &ColumnMap::default());
        let mut ids: Vec<_> = snapshot.lots().iter().map(|lot| lot.id.clone()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }
}
