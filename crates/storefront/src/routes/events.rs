//! Live header updates over server-sent events.
//!
//! Each connection subscribes to its session's store and receives one
//! `store` event per update, carrying the header summary as JSON. The
//! subscription lives inside the stream, so it ends when the client
//! disconnects.

use std::convert::Infallible;

use axum::response::{
    Sse,
    sse::{Event, KeepAlive},
};
use tokio::sync::mpsc;

use crate::middleware::CurrentStore;
use crate::views::HeaderView;

/// Stream store updates for the current session.
///
/// GET /events
pub async fn events(
    CurrentStore(store): CurrentStore,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<HeaderView>();

    // Listeners run synchronously inside dispatch; hand off to the stream.
    let subscription = store.subscribe(move |snapshot| {
        let _ = tx.send(HeaderView::from(snapshot));
    });
    tracing::debug!(subscribers = store.subscriber_count(), "Event stream opened");

    let stream = async_stream::stream! {
        let _subscription = subscription;
        while let Some(header) = rx.recv().await {
            match Event::default().event("store").json_data(&header) {
                Ok(event) => yield Ok::<Event, Infallible>(event),
                Err(e) => tracing::warn!(error = %e, "Failed to encode store event"),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
