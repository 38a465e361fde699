//! Per-country totals across all years

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::CountryTotalStat;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TotalsQuery {
    /// Restrict to one country
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub year_min: i32,
    pub year_max: i32,
    pub totals: Vec<CountryTotalStat>,
}

/// GET /api/totals
pub async fn get_totals(
    State(state): State<AppState>,
    Query(query): Query<TotalsQuery>,
) -> ApiResult<Json<TotalsResponse>> {
    let dashboard = &state.dashboard;
    let years = dashboard.year_range();

    let totals = match query.country.as_deref() {
        Some(country) => {
            let total = dashboard
                .aggregates
                .total(country)
                .ok_or_else(|| ApiError::NotFound(format!("Unknown country: {}", country)))?;
            vec![total.clone()]
        }
        None => dashboard.aggregates.totals.clone(),
    };

    Ok(Json(TotalsResponse {
        year_min: years.min,
        year_max: years.max,
        totals,
    }))
}
