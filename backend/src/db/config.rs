//! Data-source connection settings and environment variable handling.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Google Sheets connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Spreadsheet key (the long id in the sheet URL)
    pub spreadsheet_id: String,
    /// Worksheet holding one row per lot
    pub live_worksheet: String,
    /// Worksheet holding the append-only observation log
    pub history_worksheet: String,
    /// Credential file used when no credential env var is set
    pub credentials_path: PathBuf,
    /// API root, overridable for proxies
    pub api_base: String,
    /// Whole-request timeout
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            live_worksheet: "Sheet1".to_string(),
            history_worksheet: "History".to_string(),
            credentials_path: PathBuf::from("credentials.json"),
            api_base: "https://sheets.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SheetsConfig {
    /// Apply environment overrides on top of file settings.
    ///
    /// # Environment Variables
    /// - `SHEETS_SPREADSHEET_ID`: spreadsheet key
    /// - `SHEETS_LIVE_WORKSHEET`: live worksheet title
    /// - `SHEETS_HISTORY_WORKSHEET`: history worksheet title
    /// - `SHEETS_TIMEOUT_SECS`: request timeout (ignored if not a number)
    pub fn apply_env(mut self) -> Self {
        if let Ok(id) = env::var("SHEETS_SPREADSHEET_ID") {
            self.spreadsheet_id = id;
        }
        if let Ok(name) = env::var("SHEETS_LIVE_WORKSHEET") {
            self.live_worksheet = name;
        }
        if let Ok(name) = env::var("SHEETS_HISTORY_WORKSHEET") {
            self.history_worksheet = name;
        }
        if let Some(secs) = env::var("SHEETS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.timeout_secs = secs;
        }
        self
    }
}
