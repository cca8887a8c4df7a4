//! Subscriber registry and non-blocking fan-out
//!
//! Each subscriber owns a bounded outbound queue drained by its own
//! connection task, decoupling slow consumers from the ingestion path: a
//! full or closed queue costs that subscriber one message, never delays the
//! others, and never blocks the pipeline. Subscribers leave the registry
//! only through their own disconnect path.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use types::wire::WireMessage;

/// Unique subscriber identifier, assigned on join.
pub type SubscriberId = u64;

/// Registry of connected subscribers.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    subscribers: DashMap<SubscriberId, mpsc::Sender<WireMessage>>,
    next_id: AtomicU64,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a subscriber with an outbound queue of `capacity` messages.
    /// The caller owns the receiving end and is responsible for draining it.
    pub fn join(&self, capacity: usize) -> (SubscriberId, mpsc::Receiver<WireMessage>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(capacity);
        self.subscribers.insert(id, tx);
        debug!(subscriber = id, total = self.subscribers.len(), "subscriber joined");
        (id, rx)
    }

    /// Remove a subscriber on its disconnect.
    pub fn leave(&self, id: SubscriberId) {
        self.subscribers.remove(&id);
        debug!(subscriber = id, total = self.subscribers.len(), "subscriber left");
    }

    /// Queue a message for a single subscriber.
    pub fn send_to(&self, id: SubscriberId, msg: WireMessage) {
        if let Some(tx) = self.subscribers.get(&id) {
            if let Err(err) = tx.try_send(msg) {
                warn!(subscriber = id, error = %err, "unicast send failed");
            }
        }
    }

    /// Deliver a message to every registered subscriber. A failure on one
    /// subscriber is logged and skipped; delivery to the others proceeds.
    pub fn broadcast(&self, msg: &WireMessage) {
        for entry in self.subscribers.iter() {
            match entry.value().try_send(msg.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = entry.key(), "subscriber queue full, dropping message");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    // Removal happens via the connection's own disconnect.
                    debug!(subscriber = entry.key(), "subscriber queue closed");
                }
            }
        }
    }

    /// Number of connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
