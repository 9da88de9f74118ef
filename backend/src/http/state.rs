//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::ParkingRepository;
use crate::services::ParkingService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Query service; holds the data source, `None` when none could be set up
    pub service: ParkingService,
}

impl AppState {
    /// Create the state from the start-up connection result and configuration.
    pub fn new(repository: Option<Arc<dyn ParkingRepository>>, config: &AppConfig) -> Self {
        Self {
            service: ParkingService::new(
                repository,
                config.columns.clone(),
                config.history.clone(),
            ),
        }
    }
}
