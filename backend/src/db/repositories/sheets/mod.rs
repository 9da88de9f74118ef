//! Google Sheets repository.
//!
//! Reads whole worksheets through the Sheets v4 `values.get` endpoint. Values
//! are requested as formatted text so that no cell is numericised on the way
//! in; all coercion happens in the normalizer.

pub mod auth;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

use crate::db::config::SheetsConfig;
use crate::db::credentials::ServiceCredential;
use crate::db::repository::*;
use crate::models::{CellValue, RawRecord};

pub use auth::SheetsAuth;

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Repository backed by two worksheets of one spreadsheet.
pub struct SheetsRepository {
    config: SheetsConfig,
    http: reqwest::Client,
    auth: SheetsAuth,
}

impl SheetsRepository {
    /// Build the client and, for OAuth credentials, perform the first token
    /// exchange so that bad credentials surface at start-up.
    pub async fn connect(
        config: SheetsConfig,
        credential: ServiceCredential,
    ) -> RepositoryResult<Self> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "Sheets repository requires 'sheets.spreadsheet_id'",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RepositoryError::internal(format!("Failed to build HTTP client: {}", e)))?;

        let auth = SheetsAuth::from_credential(credential)?;
        if let SheetsAuth::OAuth(source) = &auth {
            source.access_token(&http).await?;
        }

        tracing::info!(
            spreadsheet = %config.spreadsheet_id,
            auth = auth.kind(),
            "Connected to Google Sheets"
        );

        Ok(Self { config, http, auth })
    }

    fn spreadsheet_url(&self, extra: &[&str]) -> RepositoryResult<Url> {
        let mut url = Url::parse(&self.config.api_base).map_err(|e| {
            RepositoryError::configuration(format!("Invalid sheets.api_base: {}", e))
        })?;
        url.path_segments_mut()
            .map_err(|_| RepositoryError::configuration("sheets.api_base cannot be a base URL"))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.config.spreadsheet_id.as_str()])
            .extend(extra);
        Ok(url)
    }

    /// Spreadsheet metadata trimmed to its id; cheap enough for health checks.
    fn metadata_url(&self) -> RepositoryResult<Url> {
        let mut url = self.spreadsheet_url(&[])?;
        url.query_pairs_mut().append_pair("fields", "spreadsheetId");
        Ok(url)
    }

    fn values_url(&self, worksheet: &str) -> RepositoryResult<Url> {
        let mut url = self.spreadsheet_url(&["values", worksheet])?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");
        Ok(url)
    }

    async fn fetch_worksheet(
        &self,
        worksheet: &str,
        operation: &'static str,
        table: &'static str,
    ) -> RepositoryResult<Vec<RawRecord>> {
        let context = ErrorContext::new(operation)
            .with_table(table)
            .with_details(worksheet.to_string());

        let range: ValueRange = self.get_json(self.values_url(worksheet)?, context).await?;

        let records = records_from_rows(range.values);
        tracing::debug!(worksheet, rows = records.len(), "Fetched worksheet");
        Ok(records)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        context: ErrorContext,
    ) -> RepositoryResult<T> {
        let request = self.auth.apply(&self.http, self.http.get(url)).await?;

        let response = request.send().await.map_err(|e| {
            RepositoryError::connection_with_context(
                format!("Failed to send request: {}", e),
                context.clone(),
            )
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::authentication(format!(
                "Sheets API returned status {}: {}",
                status, body
            ))
            .with_context(context));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::query_with_context(
                format!("Sheets API returned status {}: {}", status, body),
                context,
            ));
        }

        response.json().await.map_err(|e| {
            RepositoryError::query_with_context(format!("Failed to parse response: {}", e), context)
        })
    }
}

/// Turn a header row plus data rows into records.
///
/// Short rows are padded with blanks (the API omits trailing empty cells),
/// cells beyond the header are ignored, and fully blank rows are dropped.
pub fn records_from_rows(rows: Vec<Vec<serde_json::Value>>) -> Vec<RawRecord> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header
        .iter()
        .map(|cell| CellValue::from_json(cell).as_text())
        .collect();

    rows.map(|row| {
        header
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let cell = row.get(i).map_or(CellValue::Blank, CellValue::from_json);
                (column.clone(), cell)
            })
            .collect::<RawRecord>()
    })
    .filter(|record| !record.is_blank())
    .collect()
}

#[async_trait]
impl ParkingRepository for SheetsRepository {
    async fn fetch_live_records(&self) -> RepositoryResult<Vec<RawRecord>> {
        self.fetch_worksheet(&self.config.live_worksheet, "fetch_live_records", "live")
            .await
    }

    async fn fetch_history_records(&self) -> RepositoryResult<Vec<RawRecord>> {
        self.fetch_worksheet(
            &self.config.history_worksheet,
            "fetch_history_records",
            "history",
        )
        .await
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        let context = ErrorContext::new("health_check");
        match self
            .get_json::<serde_json::Value>(self.metadata_url()?, context)
            .await
        {
            Ok(_) => Ok(true),
            Err(RepositoryError::ConnectionError { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn describe(&self) -> String {
        format!(
            "sheets (spreadsheet={}, live={}, history={})",
            self.config.spreadsheet_id, self.config.live_worksheet, self.config.history_worksheet
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_from_rows_pads_short_rows() {
        let rows = vec![
            vec![json!("ParkingLotID"), json!("Capacity"), json!("occupied space")],
            vec![json!("P01"), json!("100"), json!("45")],
            vec![json!("P02"), json!("50")],
            vec![],
            vec![json!("P03"), json!("10"), json!("1"), json!("extra")],
        ];

        let records = records_from_rows(rows);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("occupied space").unwrap().as_count(), Some(45));
        assert_eq!(records[1].get("occupied space"), Some(&CellValue::Blank));
        assert_eq!(records[2].len(), 3);
    }

    #[test]
    fn test_records_from_rows_empty_sheet() {
        assert!(records_from_rows(vec![]).is_empty());
        assert!(records_from_rows(vec![vec![json!("ParkingLotID")]]).is_empty());
    }

    #[tokio::test]
    async fn test_connect_requires_spreadsheet_id() {
        let config = SheetsConfig {
            spreadsheet_id: " ".into(),
            ..SheetsConfig::default()
        };
        let result =
            SheetsRepository::connect(config, ServiceCredential::ApiKey { key: "k".into() }).await;
        assert!(matches!(result, Err(RepositoryError::ConfigurationError { .. })));
    }

    #[tokio::test]
    async fn test_values_url_escapes_worksheet() {
        let config = SheetsConfig {
            spreadsheet_id: "abc123".into(),
            ..SheetsConfig::default()
        };
        let repo = SheetsRepository::connect(config, ServiceCredential::ApiKey { key: "k".into() })
            .await
            .unwrap();

        let url = repo.values_url("Live Sheet").unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc123/values/Live%20Sheet");
        assert!(url.query().unwrap().contains("valueRenderOption=FORMATTED_VALUE"));

        let url = repo.metadata_url().unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc123");
        assert_eq!(url.query(), Some("fields=spreadsheetId"));
    }

    #[tokio::test]
    async fn test_health_check_contacts_the_api() {
        // Nothing listens on port 9 locally, so the request itself must fail.
        let config = SheetsConfig {
            spreadsheet_id: "abc123".into(),
            api_base: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..SheetsConfig::default()
        };
        let repo = SheetsRepository::connect(config, ServiceCredential::ApiKey { key: "k".into() })
            .await
            .unwrap();

        assert!(!matches!(repo.health_check().await, Ok(true)));
    }
}
