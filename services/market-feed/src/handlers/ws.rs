//! Subscriber WebSocket endpoint
//!
//! On connect the subscriber joins the hub and immediately receives one
//! full-depth `snapshot` per cached key, then throttled `book_update`s. The
//! connection task drains the subscriber's own queue, so a stalled socket
//! affects only this subscriber.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};
use types::wire::WireMessage;

use crate::hub::SubscriberId;
use crate::state::AppState;

/// Outbound queue depth per subscriber. Sized to absorb a full snapshot
/// seed plus bursts across all tracked keys.
const SUBSCRIBER_QUEUE_CAPACITY: usize = 256;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Queue the complete current state for a joining subscriber: one
/// full-depth `snapshot` per cached key, nothing trimmed.
fn seed_snapshots(state: &AppState, id: SubscriberId) {
    for book in state.cache.all() {
        state.hub.send_to(id, WireMessage::snapshot(book));
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (id, mut outbound) = state.hub.join(SUBSCRIBER_QUEUE_CAPACITY);
    seed_snapshots(&state, id);

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            queued = outbound.recv() => {
                let Some(msg) = queued else { break };
                let payload = match serde_json::to_string(&msg) {
                    Ok(payload) => payload,
                    Err(err) => {
                        warn!(subscriber = id, error = %err, "failed to encode outbound message");
                        continue;
                    }
                };
                if let Err(err) = sink.send(Message::Text(payload)).await {
                    debug!(subscriber = id, error = %err, "send failed, dropping subscriber");
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // inbound content is ignored
                    Some(Err(err)) => {
                        debug!(subscriber = id, error = %err, "socket error");
                        break;
                    }
                }
            }
        }
    }

    state.hub.leave(id);
}
