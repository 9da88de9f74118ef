//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::QueryError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// A required request parameter is absent or empty
    MissingParameter(String),
    /// The data source could not be reached or authenticated
    SourceUnavailable(String),
    /// Resource not found
    NotFound(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                ApiError::new(
                    "MISSING_PARAMETER",
                    format!("Parameter '{}' is required", name),
                ),
            ),
            AppError::SourceUnavailable(details) => {
                tracing::warn!(details = %details, "Responding 503: data source unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ApiError::new("SOURCE_UNAVAILABLE", "Could not retrieve data from the data source")
                        .with_details(details),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", msg),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::MissingParameter(name) => AppError::MissingParameter(name.to_string()),
            QueryError::SourceUnavailable(details) => AppError::SourceUnavailable(details),
            QueryError::NotFound(msg) => AppError::NotFound(msg),
            QueryError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<crate::db::repository::RepositoryError> for AppError {
    fn from(err: crate::db::repository::RepositoryError) -> Self {
        AppError::SourceUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::RepositoryError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::MissingParameter("id".into()), StatusCode::BAD_REQUEST),
            (AppError::SourceUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::NotFound("p99".into()), StatusCode::NOT_FOUND),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_repository_error_maps_to_unavailable() {
        let err: AppError = RepositoryError::authentication("token rejected").into();
        assert!(matches!(err, AppError::SourceUnavailable(msg) if msg.contains("token rejected")));
    }

    #[test]
    fn test_details_skipped_when_absent() {
        let json = serde_json::to_value(ApiError::new("NOT_FOUND", "nope")).unwrap();
        assert!(json.get("details").is_none());
    }
}
