//! Server-Sent Events (SSE) utilities
//!
//! The dashboard has no domain events to push; the page only needs to know
//! whether the server is still reachable.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info};

/// Interval between heartbeats
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Create a heartbeat-only SSE stream for connection status monitoring
///
/// The first event is `ConnectionStatus: connected`; afterwards only comment
/// heartbeats are sent.
///
/// # Example
/// ```rust,ignore
/// pub async fn event_stream(
///     State(_state): State<AppState>,
/// ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
///     flixmap_common::sse::create_heartbeat_sse_stream("flixmap-dash")
/// }
/// ```
pub fn create_heartbeat_sse_stream(
    service_name: &'static str,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {}", service_name);

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            tokio::time::sleep(HEARTBEAT_INTERVAL).await;
            debug!("SSE: Sending heartbeat");
            yield Ok(Event::default().comment("heartbeat"));
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(HEARTBEAT_INTERVAL)
            .text("heartbeat"),
    )
}
