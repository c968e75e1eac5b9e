//! HTTP request handlers for the web adapter.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::Uri,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::coords::{Coords, resolve_coords_for_state};
use crate::domain::filters::{FilterCatalog, get_available_filters};
use crate::domain::intelligence::{
    Dashboard, FarmerPreferences, farmer_dashboard, market_intelligence as run_intelligence,
    run_blocking,
};
use crate::domain::market_data::get_market_data;
use crate::domain::market_record::MarketData;
use crate::domain::pagination::{RecordPage, get_market_records, validate_page};
use crate::domain::series::validate_days;
use crate::domain::summary::MarketSummary;

use super::{AppState, WebError};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub components: Vec<&'static str>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Local::now().to_rfc3339(),
        components: vec![
            "record_store",
            "series_builder",
            "momentum",
            "enrichment",
            "recommendation",
            "filters",
            "pagination",
            "coords",
        ],
    })
}

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    pub region: Option<String>,
    pub commodity: Option<String>,
    pub days: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub region: Option<String>,
    pub commodity: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CoordsQuery {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub primary_region: Option<String>,
    pub primary_commodity: Option<String>,
}

fn pick(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub async fn market_filters(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterCatalog>, WebError> {
    let port = Arc::clone(&state.data_port);
    let catalog = run_blocking(move || get_available_filters(port.as_ref())).await?;
    Ok(Json(catalog))
}

pub async fn market_intelligence(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MarketQuery>, QueryRejection>,
) -> Result<Json<MarketSummary>, WebError> {
    let Query(query) = query?;
    let defaults = &state.settings.defaults;
    let region = pick(query.region, &defaults.region);
    let commodity = pick(query.commodity, &defaults.commodity);
    let days = validate_days(query.days.unwrap_or(defaults.days))?;

    let intel = run_intelligence(
        Arc::clone(&state.data_port),
        &region,
        &commodity,
        days,
        &state.settings.signals,
    )
    .await?;
    Ok(Json(intel.summary()))
}

pub async fn market_records(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecordsQuery>, QueryRejection>,
) -> Result<Json<RecordPage>, WebError> {
    let Query(query) = query?;
    let defaults = &state.settings.defaults;
    let region = pick(query.region, &defaults.region);
    let commodity = pick(query.commodity, &defaults.commodity);
    let (page, page_size) = validate_page(
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(defaults.page_size),
    )?;

    let port = Arc::clone(&state.data_port);
    let page = run_blocking(move || {
        get_market_records(port.as_ref(), &region, &commodity, page, page_size)
    })
    .await?;
    Ok(Json(page))
}

pub async fn market_data(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MarketQuery>, QueryRejection>,
) -> Result<Json<MarketData>, WebError> {
    let Query(query) = query?;
    let defaults = &state.settings.defaults;
    let region = pick(query.region, &defaults.region);
    let commodity = pick(query.commodity, &defaults.commodity);

    let port = Arc::clone(&state.data_port);
    let data = run_blocking(move || get_market_data(port.as_ref(), &region, &commodity)).await?;
    Ok(Json(data))
}

pub async fn market_coords(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CoordsQuery>, QueryRejection>,
) -> Result<Json<Coords>, WebError> {
    let Query(query) = query?;
    let region = pick(query.region, &state.settings.defaults.region);
    Ok(Json(resolve_coords_for_state(&region)))
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<Dashboard>, WebError> {
    let Query(query) = query?;
    let preferences = FarmerPreferences {
        primary_region: query.primary_region,
        primary_commodity: query.primary_commodity,
    };
    let dashboard = farmer_dashboard(
        Arc::clone(&state.data_port),
        &preferences,
        &state.settings.signals,
    )
    .await?;
    Ok(Json(dashboard))
}

pub async fn not_found(uri: Uri) -> WebError {
    WebError::not_found(format!("no route for {}", uri.path()))
}
