//! Repository implementations module.
//!
//! This module contains the implementations of the `ParkingRepository` trait:
//! - `sheets`: Google Sheets v4 REST implementation
//! - `csv_export`: CSV files exported from the spreadsheet
//! - `local`: In-memory implementation for unit testing and local development
#[cfg(feature = "csv-repo")]
pub mod csv_export;
#[cfg(feature = "local-repo")]
pub mod local;
#[cfg(feature = "sheets-repo")]
pub mod sheets;

#[cfg(feature = "csv-repo")]
pub use csv_export::{CsvConfig, CsvRepository};
#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
#[cfg(feature = "sheets-repo")]
pub use sheets::SheetsRepository;
