//! Data table API with pagination
//!
//! Rows keep source order; pages are clamped to the valid range.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::ContentFilter;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{paginate, PAGE_SIZE};
use crate::table::TableRow;
use crate::AppState;

/// Query parameters for the table
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub country: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub content: ContentFilter,
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub country: String,
    pub year: i32,
    pub content: ContentFilter,
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

/// GET /api/table
pub async fn get_table(
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> ApiResult<Json<TableResponse>> {
    let country = query.country.trim();
    if country.is_empty() {
        return Err(ApiError::BadRequest("Empty country".to_string()));
    }

    let dashboard = &state.dashboard;
    let year = query.year.unwrap_or(dashboard.year_range().max);
    let table = dashboard.table(country, year, query.content);

    let (p, rows) = paginate(&table.rows, query.page);

    Ok(Json(TableResponse {
        total_rows: table.rows.len(),
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        rows: rows.to_vec(),
        country: table.country,
        year: table.year,
        content: table.content,
        columns: table.columns,
    }))
}
