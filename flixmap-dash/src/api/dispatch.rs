//! Reactive dispatch endpoint
//!
//! The page posts its current control state with the event that changed it
//! and applies the returned updates.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::wiring::{dispatch, DashboardState, Dispatched, UiEvent};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub state: DashboardState,
    pub event: UiEvent,
}

/// POST /api/dispatch
pub async fn post_dispatch(
    State(state): State<AppState>,
    Json(request): Json<DispatchRequest>,
) -> ApiResult<Json<Dispatched>> {
    debug!("Dispatch {:?}", request.event);
    let result = dispatch(&state.dashboard, request.state, request.event)?;
    Ok(Json(result))
}
