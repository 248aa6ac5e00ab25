use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    dao::session_store::{SessionSignal, SessionStream},
    dto::sse::{EVENT_MISSING, EVENT_SNAPSHOT, ServerEvent},
};

/// Render a store subscription as an SSE event for the wire.
fn render(signal: SessionSignal) -> Option<ServerEvent> {
    match signal {
        SessionSignal::Snapshot(record) => {
            ServerEvent::json(EVENT_SNAPSHOT.to_string(), &record).ok()
        }
        SessionSignal::Missing => Some(ServerEvent::new(
            EVENT_MISSING.to_string(),
            "null".to_string(),
        )),
    }
}

/// Convert a session subscription into an SSE response, forwarding signals
/// until the client disconnects or the subscription ends.
pub fn to_sse_stream(
    mut signals: SessionStream,
    code: String,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from the subscription and pushes into mpsc
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                signal = signals.next() => {
                    let Some(signal) = signal else {
                        break;
                    };
                    let Some(payload) = render(signal) else {
                        continue;
                    };

                    let mut event = Event::default().data(payload.data);
                    if let Some(name) = payload.event {
                        event = event.event(name);
                    }

                    if tx.send(Ok(event)).await.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!(code, "session watch stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::dao::models::SessionEntity;

    fn record() -> SessionEntity {
        SessionEntity {
            members: vec!["Zany Fox".into()],
            member_names: IndexMap::new(),
            creator: "Zany Fox".into(),
            started: false,
            theme: "random".into(),
            word_index: 0,
            odd_members: vec![],
            odd_count: 1,
            last_word: None,
        }
    }

    #[test]
    fn snapshots_render_as_snapshot_events() {
        let event = render(SessionSignal::Snapshot(record())).unwrap();
        assert_eq!(event.event.as_deref(), Some(EVENT_SNAPSHOT));
        assert!(event.data.contains("\"creator\":\"Zany Fox\""));
    }

    #[test]
    fn missing_renders_as_a_null_missing_event() {
        let event = render(SessionSignal::Missing).unwrap();
        assert_eq!(event.event.as_deref(), Some(EVENT_MISSING));
        assert_eq!(event.data, "null");
    }
}
