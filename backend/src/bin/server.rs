//! Parking HTTP Server Binary
//!
//! Loads configuration, connects to the data source once, and serves the
//! JSON API.
//!
//! # Usage
//!
//! ```bash
//! # Google Sheets (default); needs a credential
//! PARKING_CREDENTIALS_FILE=credentials.json SHEETS_SPREADSHEET_ID=... \
//!   cargo run --bin parking-server
//!
//! # CSV exports on disk
//! REPOSITORY_TYPE=csv cargo run --bin parking-server
//! ```
//!
//! # Environment Variables
//!
//! - `PARKING_CONFIG`: Path to `parking.toml`
//! - `REPOSITORY_TYPE`: `sheets`, `csv` or `local`
//! - `PARKING_CREDENTIALS_JSON` / `PARKING_CREDENTIALS_FILE`: Sheets credential
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parking_rust::config::AppConfig;
use parking_rust::db;
use parking_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(filter)
        .init();

    info!("Starting parking HTTP server");

    let config = AppConfig::load()?;

    // A missing source is not fatal; queries report it instead.
    let repository = db::connect(&config.source).await;

    let state = AppState::new(repository, &config);
    let app = create_router(state);

    let addr: SocketAddr = config.server.bind_address().parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
