//! Page layout description
//!
//! The page builds its controls from this response so the year range and
//! options come from the loaded data.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::catalog::{ContentFilter, ScaleMode};
use crate::wiring::DashboardState;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SliderLayout {
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub marks: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub title: String,
    pub subtitle: String,
    pub content_options: Vec<&'static str>,
    pub scale_options: Vec<&'static str>,
    pub slider: SliderLayout,
    pub fixed_scale_max: u32,
    pub fallback_country: String,
    pub initial_state: DashboardState,
}

/// GET /api/layout
pub async fn get_layout(State(state): State<AppState>) -> Json<LayoutResponse> {
    let dashboard = &state.dashboard;
    let years = dashboard.year_range();

    Json(LayoutResponse {
        title: "Netflix in Data".to_string(),
        subtitle: "Visualisation of Netflix Movie and TV Show origins".to_string(),
        content_options: ContentFilter::OPTIONS.iter().map(|c| c.label()).collect(),
        scale_options: ScaleMode::OPTIONS.iter().map(|s| s.label()).collect(),
        slider: SliderLayout {
            min: years.min,
            max: years.max,
            step: 1,
            marks: years.marks(),
        },
        fixed_scale_max: dashboard.settings.fixed_scale_max,
        fallback_country: dashboard.settings.fallback_country.clone(),
        initial_state: DashboardState::initial(years),
    })
}
