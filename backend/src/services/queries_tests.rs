use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::db::repositories::LocalRepository;
use crate::models::{ColumnMap, RawRecord, Route};
use crate::routes::health::SourceStatus;
use crate::services::{HistoryOptions, ParkingService, QueryError, UNKNOWN_LOT_NAME};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 7)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn live(id: &str, name: &str, capacity: u32, occupied: u32, route: &str) -> RawRecord {
    RawRecord::new()
        .with_text("ParkingLotID", id)
        .with_text("Parking Name", name)
        .with_text("Capacity", capacity.to_string())
        .with_text("occupied space", occupied.to_string())
        .with_text("Route", route)
}

fn history(id: &str, ts: &str, capacity: u32, occupied: u32) -> RawRecord {
    RawRecord::new()
        .with_text("ParkingLotID", id)
        .with_text("Timestamp", ts)
        .with_text("Capacity", capacity.to_string())
        .with_text("occupied space", occupied.to_string())
}

fn service(repo: &LocalRepository) -> ParkingService {
    ParkingService::new(
        Some(Arc::new(repo.clone())),
        ColumnMap::default(),
        HistoryOptions::default(),
    )
}

fn seeded() -> LocalRepository {
    LocalRepository::with_records(
        vec![
            live("P01", "Bus Stand", 100, 45, "TUT"),
            live("P02", "Junction", 50, 10, "TIN"),
            live("P03", "Guest House", 20, 20, "VIP"),
        ],
        vec![
            history("P01", "07/11/2024 09:00:00", 100, 5),
            history("P02", "07/11/2024 09:00:00", 50, 3),
            history("P01", "07/11/2024 10:00:00", 100, 8),
            history("P09", "07/11/2024 10:00:00", 10, 1),
        ],
    )
}

#[tokio::test]
async fn test_snapshot_is_stable_across_calls() {
    let svc = service(&seeded());

    let first = svc.snapshot(now()).await.unwrap();
    let second = svc.snapshot(now() + chrono::Duration::minutes(1)).await.unwrap();

    assert_eq!(first.lots.len(), 3);
    assert_eq!(first.lots, second.lots);
    assert_eq!(first.route_summary, second.route_summary);
    assert_eq!(first.checksum, second.checksum);
    assert_ne!(first.timestamp, second.timestamp);
    assert_eq!(first.route_summary[&Route::Thoothukudi].total_vehicles, 45);
    assert!(!first.route_summary.contains_key(&Route::Vip));
}

#[tokio::test]
async fn test_checksum_tracks_source_changes() {
    let repo = seeded();
    let svc = service(&repo);
    let before = svc.snapshot(now()).await.unwrap().checksum;

    repo.push_live(live("P04", "Market", 10, 1, "NGL"));
    let after = svc.snapshot(now()).await.unwrap().checksum;
    assert_ne!(before, after);
}

#[tokio::test]
async fn test_snapshot_degrades_when_source_down() {
    let repo = seeded();
    repo.set_healthy(false);

    let data = service(&repo).snapshot(now()).await.unwrap();
    assert!(data.lots.is_empty());
    assert!(data.route_summary.values().all(|s| s.total_vehicles == 0));
}

#[tokio::test]
async fn test_snapshot_without_repository() {
    let svc = ParkingService::new(None, ColumnMap::default(), HistoryOptions::default());
    assert!(svc.snapshot(now()).await.unwrap().lots.is_empty());
    assert_eq!(svc.source_status().await, SourceStatus::Unconfigured);
}

#[tokio::test]
async fn test_overall_history() {
    let data = service(&seeded()).overall_history(now()).await.unwrap();

    assert_eq!(data.window_end, now());
    assert_eq!(data.window_start, now() - chrono::Duration::hours(24));
    assert_eq!(data.series.len(), 3);

    let tut = &data.series[0];
    assert_eq!(tut.route, Route::Thoothukudi);
    assert_eq!(tut.label, "Thoothukudi Vehicle Count");
    let values: Vec<u64> = tut.points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![5, 8]);

    let tin: Vec<u64> = data.series[1].points.iter().map(|p| p.value).collect();
    assert_eq!(tin, vec![3, 3]);
}

#[tokio::test]
async fn test_overall_history_source_down() {
    let repo = seeded();
    repo.set_healthy(false);
    let err = service(&repo).overall_history(now()).await.unwrap_err();
    assert!(matches!(err, QueryError::SourceUnavailable(_)));
}

#[tokio::test]
async fn test_lot_history_missing_id_checked_first() {
    let repo = seeded();
    repo.set_healthy(false);
    let svc = service(&repo);

    for id in [None, Some(""), Some("   ")] {
        let err = svc.lot_history(id, now()).await.unwrap_err();
        assert!(matches!(err, QueryError::MissingParameter("id")));
    }
}

#[tokio::test]
async fn test_lot_history() {
    let data = service(&seeded())
        .lot_history(Some(" P01 "), now())
        .await
        .unwrap();

    assert_eq!(data.lot_id.as_str(), "p01");
    assert_eq!(data.lot_name, "Bus Stand");
    assert_eq!(data.label, "Occupancy (%)");
    let values: Vec<f64> = data.points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![5.0, 8.0]);
}

#[tokio::test]
async fn test_lot_history_unknown_lot_name() {
    let data = service(&seeded())
        .lot_history(Some("P09"), now())
        .await
        .unwrap();
    assert_eq!(data.lot_name, UNKNOWN_LOT_NAME);
    assert_eq!(data.points.len(), 1);
}

#[tokio::test]
async fn test_lot_history_source_down() {
    let repo = seeded();
    repo.set_healthy(false);
    let err = service(&repo)
        .lot_history(Some("P01"), now())
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::SourceUnavailable(_)));
}

#[tokio::test]
async fn test_single_lot_lookup() {
    let svc = service(&seeded());

    let lot = svc.lot("p02").await.unwrap();
    assert_eq!(lot.current_vehicles, 10);
    assert_eq!(lot.occupancy_percent, 20.0);

    assert!(matches!(svc.lot("nope").await, Err(QueryError::NotFound(_))));
}

#[tokio::test]
async fn test_source_status() {
    let repo = seeded();
    let svc = service(&repo);
    assert_eq!(svc.source_status().await, SourceStatus::Connected);
}
