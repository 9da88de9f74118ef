//! CSV-export repository.
//!
//! Reads the live and history tables from CSV files downloaded from the
//! spreadsheet (`File > Download > CSV`). Useful for offline development and
//! for replaying a captured day of history.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::db::repository::*;
use crate::models::{CellValue, RawRecord};

/// Paths to the two exported tables.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    pub live_path: PathBuf,
    pub history_path: PathBuf,
}

/// Repository backed by CSV files on disk. Files are re-read on every fetch.
#[derive(Debug, Clone)]
pub struct CsvRepository {
    config: CsvConfig,
}

impl CsvRepository {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    async fn read(&self, path: PathBuf, operation: &'static str, table: &'static str) -> RepositoryResult<Vec<RawRecord>> {
        let context = ErrorContext::new(operation)
            .with_table(table)
            .with_details(path.display().to_string());

        tokio::task::spawn_blocking(move || read_table(&path))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))?
            .map_err(|e| e.with_context(context))
    }
}

/// Parse one CSV file into records keyed by its header row.
///
/// Every cell is kept as text; invalid UTF-8 is replaced rather than
/// rejected. Rows shorter than the header are padded with blanks, longer rows
/// are truncated, and fully blank rows are dropped. A row the reader cannot
/// parse is skipped; only I/O failures abort the table.
pub fn read_table(path: &Path) -> RepositoryResult<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(map_csv_error)?;

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(map_csv_error)?
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect();
    let mut records = Vec::new();

    for row in reader.byte_records() {
        let row = match row {
            Ok(row) => row,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                return Err(map_csv_error(err))
            }
            Err(err) => {
                tracing::debug!(error = %err, "Skipping unreadable CSV row");
                continue;
            }
        };
        let record: RawRecord = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let cell = row.get(i).map(String::from_utf8_lossy).unwrap_or_default();
                (header.clone(), CellValue::text(cell))
            })
            .collect();

        if !record.is_blank() {
            records.push(record);
        }
    }

    Ok(records)
}

fn map_csv_error(err: csv::Error) -> RepositoryError {
    match err.kind() {
        csv::ErrorKind::Io(_) => RepositoryError::connection(err.to_string()),
        _ => RepositoryError::query(format!("CSV parse error: {}", err)),
    }
}

#[async_trait]
impl ParkingRepository for CsvRepository {
    async fn fetch_live_records(&self) -> RepositoryResult<Vec<RawRecord>> {
        self.read(self.config.live_path.clone(), "fetch_live_records", "live")
            .await
    }

    async fn fetch_history_records(&self) -> RepositoryResult<Vec<RawRecord>> {
        self.read(self.config.history_path.clone(), "fetch_history_records", "history")
            .await
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.config.live_path.is_file() && self.config.history_path.is_file())
    }

    fn describe(&self) -> String {
        format!(
            "csv (live={}, history={})",
            self.config.live_path.display(),
            self.config.history_path.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_table_pads_and_skips_blank_rows() {
        let file = write_csv(
            "ParkingLotID,Capacity,occupied space\n\
             P01,100,45\n\
             ,,\n\
             P02,50\n",
        );

        let records = read_table(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Capacity").unwrap().as_count(), Some(100));
        assert_eq!(records[1].get("occupied space"), Some(&CellValue::Blank));
    }

    #[test]
    fn test_invalid_utf8_row_does_not_abort_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ParkingLotID,Capacity,occupied space\nP01,100,45\nP02,\xff\xfe,3\nP03,40,4\n")
            .unwrap();

        let records = read_table(file.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("occupied space").unwrap().as_count(), Some(45));
        assert_eq!(records[1].get("ParkingLotID").unwrap().as_text(), "P02");
        assert_eq!(records[1].get("Capacity").unwrap().as_count(), None);
        assert_eq!(records[2].get("Capacity").unwrap().as_count(), Some(40));
    }

    #[tokio::test]
    async fn test_missing_file_is_connection_error() {
        let repo = CsvRepository::new(CsvConfig {
            live_path: PathBuf::from("/nonexistent/live.csv"),
            history_path: PathBuf::from("/nonexistent/history.csv"),
        });

        let err = repo.fetch_live_records().await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
        assert_eq!(err.context().table.as_deref(), Some("live"));
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch_history() {
        let live = write_csv("ParkingLotID\nP01\n");
        let history = write_csv("ParkingLotID,Timestamp,occupied space\nP01,07/11/2024 09:00:00,4\n");
        let repo = CsvRepository::new(CsvConfig {
            live_path: live.path().to_path_buf(),
            history_path: history.path().to_path_buf(),
        });

        let rows = repo.fetch_history_records().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Timestamp").unwrap().as_text(), "07/11/2024 09:00:00");
        assert!(repo.health_check().await.unwrap());
    }
}
