//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::routes::{health, history, snapshot};

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The dashboard is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(health::HEALTH, get(handlers::health_check))
        .route(snapshot::GET_PARKING_DATA, get(handlers::get_parking_data))
        .route(snapshot::GET_PARKING_LOT, get(handlers::get_parking_lot))
        .route(history::GET_OVERALL_HISTORY, get(handlers::get_overall_history))
        .route(history::GET_LOT_HISTORY, get(handlers::get_lot_history))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
