#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use parking_rust::db::repositories::LocalRepository;
use parking_rust::models::{ColumnMap, RawRecord};
use parking_rust::services::{HistoryOptions, ParkingService};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Fixed evaluation time: 7 Nov 2024, 18:00 local.
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 7)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

/// A live-table row in the default sheet layout.
pub fn live_row(id: &str, name: &str, capacity: &str, occupied: &str, route: &str) -> RawRecord {
    RawRecord::new()
        .with_text("ParkingLotID", id)
        .with_text("Parking Name", name)
        .with_text("Capacity", capacity)
        .with_text("occupied space", occupied)
        .with_text("Available/Filled", "TRUE")
        .with_text("Route", route)
}

/// A history-table row in the default sheet layout.
pub fn history_row(id: &str, timestamp: &str, capacity: &str, occupied: &str) -> RawRecord {
    RawRecord::new()
        .with_text("ParkingLotID", id)
        .with_text("Timestamp", timestamp)
        .with_text("Capacity", capacity)
        .with_text("occupied space", occupied)
}

/// Three transit lots, one VIP lot, and a morning of history.
pub fn seeded_repository() -> LocalRepository {
    LocalRepository::with_records(
        vec![
            live_row("TUT-01", "Old Bus Stand", "100", "45", "TUT"),
            live_row("TUT-02", "New Bus Stand", "80", "20", "TUT"),
            live_row("TIN-01", "Junction", "50", "10", "TIN"),
            live_row("VIP-01", "Collectorate", "20", "5", "VIP"),
        ],
        vec![
            history_row("TUT-01", "07/11/2024 08:00:00", "100", "5"),
            history_row("TIN-01", "07/11/2024 08:00:00", "50", "3"),
            history_row("TUT-02", "07/11/2024 09:30:00", "80", "12"),
            history_row("TUT-01", "07/11/2024 11:00:00", "100", "40"),
            history_row("TUT-01", "05/11/2024 11:00:00", "100", "99"),
            history_row("TUT-01", "not a date", "100", "99"),
        ],
    )
}

pub fn service_for(repo: &LocalRepository) -> ParkingService {
    ParkingService::new(
        Some(Arc::new(repo.clone())),
        ColumnMap::default(),
        HistoryOptions::default(),
    )
}
