//! WebSocket message envelope
//!
//! JSON-tagged union delivered to subscribers. A `snapshot` carries a full
//! depth book (sent once per cached key when a subscriber joins); a
//! `book_update` carries a depth-trimmed book; `error` carries a message.

use serde::{Deserialize, Serialize};

use crate::book::Book;

/// Outbound message to a feed subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// Full-depth book state, sent once per cached key on join.
    Snapshot { data: Book },
    /// Depth-trimmed incremental book, subject to the broadcast throttle.
    BookUpdate { data: Book },
    /// Delivery-path error surfaced to the subscriber.
    Error { message: String },
}

impl WireMessage {
    pub fn snapshot(book: Book) -> Self {
        WireMessage::Snapshot { data: book }
    }

    pub fn book_update(book: Book) -> Self {
        WireMessage::BookUpdate { data: book }
    }
}
