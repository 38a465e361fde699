//! Map, timeline and boundary endpoints

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::{ContentFilter, ScaleMode};
use crate::figures::{BarFigure, MapFigure};
use crate::AppState;

/// Query parameters for the map; missing values use the initial state
#[derive(Debug, Deserialize)]
pub struct MapQuery {
    #[serde(default)]
    pub content: ContentFilter,
    pub year: Option<i32>,
    #[serde(default)]
    pub scale: ScaleMode,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    /// `null` when there is no data for the year
    pub figure: Option<MapFigure>,
}

/// GET /api/map
pub async fn get_map(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Json<MapResponse> {
    let dashboard = &state.dashboard;
    let year = query.year.unwrap_or(dashboard.year_range().max);

    Json(MapResponse {
        figure: dashboard.map(query.content, year, query.scale),
    })
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    /// Defaults to the fallback country
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub country: String,
    pub figure: BarFigure,
}

/// GET /api/timeline
pub async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Json<TimelineResponse> {
    let figure = state.dashboard.timeline(query.country.as_deref());

    Json(TimelineResponse {
        country: figure.country.clone(),
        figure,
    })
}

/// GET /api/boundaries
///
/// The GeoJSON document exactly as loaded
pub async fn get_boundaries(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/geo+json")],
        state.dashboard.boundaries.document.clone(),
    )
        .into_response()
}
