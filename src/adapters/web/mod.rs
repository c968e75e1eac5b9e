//! HTTP adapter.
//!
//! JSON endpoints over the market intelligence core, served by Axum.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::intelligence::SharedDataPort;
use crate::domain::settings::Settings;

pub struct AppState {
    pub data_port: SharedDataPort,
    pub settings: Settings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/market/filters", get(handlers::market_filters))
        .route("/api/market/intelligence", get(handlers::market_intelligence))
        .route("/api/market/records", get(handlers::market_records))
        .route("/api/market/data", get(handlers::market_data))
        .route("/api/market/coords", get(handlers::market_coords))
        .route("/api/market/dashboard", get(handlers::dashboard))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
