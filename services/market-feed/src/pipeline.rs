//! Ingestion pipeline consumer
//!
//! One task owns the ingest side of the shared state: every adapter
//! publishes normalized books onto a single channel, and this consumer
//! applies them to the cache, runs the throttle check, and fans eligible
//! updates out to subscribers. The cache is always updated; only the
//! outbound notification is throttled.

use tokio::sync::mpsc;
use tracing::debug;
use types::book::Book;
use types::wire::WireMessage;

use crate::state::AppState;

/// Consume normalized books until every adapter sender has dropped.
pub async fn run(mut rx: mpsc::Receiver<Book>, state: AppState) {
    while let Some(book) = rx.recv().await {
        apply(&state, book);
    }
    debug!("pipeline channel closed, consumer exiting");
}

/// Apply one normalized book: cache unconditionally, broadcast if eligible.
pub fn apply(state: &AppState, book: Book) {
    let key = book.key();
    state.cache.upsert(book.clone());

    if state.throttle.should_broadcast(&key) {
        let update = book.trimmed(state.config.broadcast_depth);
        debug!(key = %key, bids = update.bids.len(), asks = update.asks.len(), "broadcasting update");
        state.hub.broadcast(&WireMessage::book_update(update));
    }
}
