//! Session event stream over Server-Sent Events.
//!
//! A new subscriber first receives a `state_changed` event carrying the
//! current state, then every event the controller broadcasts from then on.
//! Each event is sent as one JSON `data:` line.

use crate::AppState;
use axum::{
    extract::Extension,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::Stream;
use std::{convert::Infallible, sync::Arc};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use voicebook_client::BookingApi;
use voicebook_session::SessionEvent;

/// Handler for `GET /events`.
pub async fn get_session_stream_handler<A: BookingApi>(
    Extension(state): Extension<Arc<AppState<A>>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before reading the state so no transition falls between them.
    let rx = state.controller.subscribe();
    let current = match state.controller.state() {
        Ok(current) => Some(SessionEvent::StateChanged { state: current }),
        Err(e) => {
            tracing::warn!(error = %e, "could not read session state for new subscriber");
            None
        }
    };

    let events = tokio_stream::iter(current.map(Ok)).chain(BroadcastStream::new(rx));

    let stream = events.filter_map(|result| match result {
        Ok(event) => to_sse_event(&event).map(Ok),
        Err(lagged) => {
            tracing::warn!(
                error = %lagged,
                "session event subscriber fell behind; skipped events"
            );
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &SessionEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(data) => Some(Event::default().data(data)),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode session event");
            None
        }
    }
}
