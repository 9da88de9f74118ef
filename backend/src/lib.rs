//! # Parking Occupancy Backend
//!
//! Republishes live and historical parking-lot occupancy, kept in a
//! spreadsheet, as JSON for a map and dashboard frontend.
//!
//! ## Features
//!
//! - **Normalization**: Turn loosely-typed sheet rows into typed lots, with
//!   configurable column names and per-field defaults
//! - **Aggregation**: Per-route vehicle and capacity totals for the transit
//!   corridors
//! - **History**: Carry-forward per-route series and per-lot occupancy series
//!   over a trailing window
//! - **Data Sources**: Google Sheets, CSV exports, or in-memory rows
//! - **HTTP API**: JSON endpoints for the frontend
//!
//! ## Architecture
//!
//! - [`api`]: Types that appear in API responses
//! - [`config`]: `parking.toml` loading
//! - [`db`]: Data-source trait, implementations, and credentials
//! - [`models`]: Raw records, lots, routes, column mapping, timestamps
//! - [`services`]: Normalizer, snapshot aggregator, history reconstructor
//! - [`routes`]: Response types and endpoint paths
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
