//! In-memory local repository implementation.
//!
//! Rows live in memory behind a lock, which makes this backend suitable for
//! unit tests, demos, and running the server without any credentials.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::RawRecord;

/// In-memory local repository.
///
/// # Example
/// ```
/// use parking_rust::db::repositories::LocalRepository;
/// use parking_rust::models::RawRecord;
///
/// let repo = LocalRepository::new();
/// repo.push_live(RawRecord::new().with_text("ParkingLotID", "P01"));
/// assert_eq!(repo.live_len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    live: Vec<RawRecord>,
    history: Vec<RawRecord>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            live: Vec::new(),
            history: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with both tables.
    pub fn with_records(live: Vec<RawRecord>, history: Vec<RawRecord>) -> Self {
        let repo = Self::new();
        repo.replace_live(live);
        repo.replace_history(history);
        repo
    }

    pub fn push_live(&self, record: RawRecord) {
        self.data.write().live.push(record);
    }

    pub fn push_history(&self, record: RawRecord) {
        self.data.write().history.push(record);
    }

    pub fn replace_live(&self, records: Vec<RawRecord>) {
        self.data.write().live = records;
    }

    pub fn replace_history(&self, records: Vec<RawRecord>) {
        self.data.write().history = records;
    }

    pub fn live_len(&self) -> usize {
        self.data.read().live.len()
    }

    pub fn history_len(&self) -> usize {
        self.data.read().history.len()
    }

    /// Simulate the source going up or down.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    fn ensure_reachable(&self, operation: &str, table: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "local repository marked unhealthy",
                ErrorContext::new(operation).with_table(table),
            ))
        }
    }
}

#[async_trait]
impl ParkingRepository for LocalRepository {
    async fn fetch_live_records(&self) -> RepositoryResult<Vec<RawRecord>> {
        self.ensure_reachable("fetch_live_records", "live")?;
        Ok(self.data.read().live.clone())
    }

    async fn fetch_history_records(&self) -> RepositoryResult<Vec<RawRecord>> {
        self.ensure_reachable("fetch_history_records", "history")?;
        Ok(self.data.read().history.clone())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    fn describe(&self) -> String {
        let data = self.data.read();
        format!(
            "local (in-memory, {} live rows, {} history rows)",
            data.live.len(),
            data.history.len()
        )
    }
}
