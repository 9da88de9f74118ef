//! Repository trait for the tabular parking data source.
//!
//! The source exposes two logical tables: a live table with one row per lot,
//! and an append-only history table with one row per observation. Both are
//! read in full on every query; nothing is cached on this side.

use async_trait::async_trait;

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::RawRecord;

/// Read-only access to the live and history tables.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait ParkingRepository: Send + Sync {
    /// Fetch every row of the live table, in source row order.
    async fn fetch_live_records(&self) -> RepositoryResult<Vec<RawRecord>>;

    /// Fetch every row of the history table, in source row order.
    async fn fetch_history_records(&self) -> RepositoryResult<Vec<RawRecord>>;

    /// Check that the source is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` - source reachable
    /// * `Ok(false)` - source known to be down
    /// * `Err(RepositoryError)` - the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Short human-readable description of the backing store.
    fn describe(&self) -> String;
}
