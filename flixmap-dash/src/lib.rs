//! flixmap-dash library - catalogue origins dashboard
//!
//! Loads the catalogue and boundary files once, aggregates them into an
//! immutable [`Dashboard`], and serves the page plus the JSON endpoints the
//! page's reactive wiring calls.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod figures;
pub mod pagination;
pub mod table;
pub mod wiring;

pub use dashboard::{Dashboard, DashboardSettings};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only aggregates, built once at start-up
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    /// Create new application state
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/events", get(api::event_stream))
        .route("/api/layout", get(api::get_layout))
        .route("/api/boundaries", get(api::get_boundaries))
        .route("/api/map", get(api::get_map))
        .route("/api/timeline", get(api::get_timeline))
        .route("/api/table", get(api::get_table))
        .route("/api/totals", get(api::get_totals))
        .route("/api/dispatch", post(api::post_dispatch));

    let ui = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/dashboard.css", get(api::serve_css))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(ui)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
