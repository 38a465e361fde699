//! HTTP API handlers for flixmap-dash

pub mod buildinfo;
pub mod dispatch;
pub mod figures;
pub mod health;
pub mod layout;
pub mod sse;
pub mod table;
pub mod totals;
pub mod ui;

pub use buildinfo::get_build_info;
pub use dispatch::post_dispatch;
pub use figures::{get_boundaries, get_map, get_timeline};
pub use health::health_routes;
pub use layout::get_layout;
pub use sse::event_stream;
pub use table::get_table;
pub use totals::get_totals;
pub use ui::{serve_app_js, serve_css, serve_index};
