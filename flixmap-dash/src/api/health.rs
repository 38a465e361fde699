//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response with a summary of the loaded data
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// Countries with a boundary polygon
    pub countries: usize,
    /// Rows in the exploded (entry, country) table
    pub exploded_rows: usize,
    pub year_min: i32,
    pub year_max: i32,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let dashboard = &state.dashboard;
    let years = dashboard.year_range();

    Json(HealthResponse {
        status: "ok",
        module: "flixmap-dash",
        version: env!("CARGO_PKG_VERSION"),
        countries: dashboard.boundaries.countries.len(),
        exploded_rows: dashboard.aggregates.exploded.len(),
        year_min: years.min,
        year_max: years.max,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
