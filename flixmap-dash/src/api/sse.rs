//! Server-Sent Events (SSE) for connection status

use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /api/events - SSE event stream for connection status
///
/// Streams events:
/// - ConnectionStatus (once, on connect)
/// - heartbeat comments every 15 seconds
pub async fn event_stream() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    flixmap_common::sse::create_heartbeat_sse_stream("flixmap-dash")
}
