use serde::{Deserialize, Serialize};

/// Reachability of the configured data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SourceStatus {
    Connected,
    Disconnected,
    /// No repository could be created at start-up.
    Unconfigured,
    Error(String),
}

impl From<SourceStatus> for String {
    fn from(status: SourceStatus) -> Self {
        match status {
            SourceStatus::Connected => "connected".into(),
            SourceStatus::Disconnected => "disconnected".into(),
            SourceStatus::Unconfigured => "unconfigured".into(),
            SourceStatus::Error(e) => format!("error: {}", e),
        }
    }
}

impl From<String> for SourceStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "connected" => Self::Connected,
            "disconnected" => Self::Disconnected,
            "unconfigured" => Self::Unconfigured,
            other => Self::Error(other.strip_prefix("error: ").unwrap_or(other).to_string()),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub data_source: SourceStatus,
}

impl HealthResponse {
    pub fn ok(data_source: SourceStatus) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_source,
        }
    }
}

pub const HEALTH: &str = "/health";
