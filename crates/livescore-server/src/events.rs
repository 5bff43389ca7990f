//! Live update stream.
//!
//! Clients subscribe via server-sent events and receive the complete
//! match list as one JSON array per event: once immediately on connect,
//! then again after every mutation. Between mutations the hub emits
//! keep-alive comments so idle connections are noticed when they die.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use livescore_core::HubEvent;

use crate::error::ApiError;
use crate::AppState;

/// Renders one hub event as an SSE frame.
///
/// Snapshots become data events carrying the full match array.
/// Heartbeats become comment lines, which `EventSource` clients never
/// see but which keep the connection from idling out.
fn to_sse_event(event: HubEvent) -> Option<Event> {
    match event {
        HubEvent::Snapshot(snapshot) => match Event::default().json_data(snapshot.as_ref()) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize snapshot");
                None
            }
        },
        HubEvent::Heartbeat => Some(Event::default().comment("keep-alive")),
    }
}

/// Subscribe to live match updates.
///
/// The subscription ends when the client disconnects, when the hub
/// drops the subscriber as unresponsive, or when the server shuts down.
///
/// # Endpoint
///
/// `GET /events`
///
/// # Response
///
/// - `200 OK`: a `text/event-stream` body; the first event carries the
///   current match list, and every mutation pushes a fresh one
/// - `503 Service Unavailable`: the server is shutting down
pub async fn events(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let subscription = state.board.subscribe()?;
    tracing::debug!(subscriber = %subscription.id(), "Event stream opened");

    let stream = futures_util::stream::unfold(subscription, |mut subscription| async move {
        subscription
            .recv()
            .await
            .map(|event| (event, subscription))
    })
    .filter_map(|event| async move { to_sse_event(event).map(Ok::<_, Infallible>) });

    Ok(Sse::new(stream))
}
