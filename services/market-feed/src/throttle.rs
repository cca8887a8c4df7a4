//! Per-key broadcast throttle
//!
//! Rate-limits outbound fan-out independently of cache freshness: the cache
//! is always updated, only the outbound notification is suppressed. An
//! update is eligible to broadcast when the elapsed time since that key's
//! last broadcast meets or exceeds the window.

use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::Instant;

/// Records the last broadcast instant per cache key.
#[derive(Debug)]
pub struct BroadcastThrottle {
    window: Duration,
    last_sent: DashMap<String, Instant>,
}

impl BroadcastThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_sent: DashMap::new(),
        }
    }

    /// Whether a broadcast for `key` is eligible now. Records the new stamp
    /// when it is, so the next eligibility starts from this broadcast.
    pub fn should_broadcast(&self, key: &str) -> bool {
        let now = Instant::now();
        match self.last_sent.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if now.duration_since(*occupied.get()) >= self.window {
                    occupied.insert(now);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_broadcast_always_eligible() {
        let throttle = BroadcastThrottle::new(Duration::from_millis(250));
        assert!(throttle.should_broadcast("binance:SOLUSDT"));
    }

    #[tokio::test(start_paused = true)]
    async fn second_broadcast_within_window_suppressed() {
        let throttle = BroadcastThrottle::new(Duration::from_millis(250));
        assert!(throttle.should_broadcast("binance:SOLUSDT"));

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!throttle.should_broadcast("binance:SOLUSDT"));
    }

    #[tokio::test(start_paused = true)]
    async fn broadcast_after_window_always_eligible() {
        let throttle = BroadcastThrottle::new(Duration::from_millis(250));
        assert!(throttle.should_broadcast("binance:SOLUSDT"));

        tokio::time::advance(Duration::from_millis(250)).await;
        assert!(throttle.should_broadcast("binance:SOLUSDT"));

        // Suppression window restarts from the accepted broadcast.
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!throttle.should_broadcast("binance:SOLUSDT"));
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_throttled_independently() {
        let throttle = BroadcastThrottle::new(Duration::from_millis(250));
        assert!(throttle.should_broadcast("binance:SOLUSDT"));
        // A different key is unaffected by the first key's stamp.
        assert!(throttle.should_broadcast("openbook:SOLUSDC"));
        assert!(!throttle.should_broadcast("binance:SOLUSDT"));
    }
}
