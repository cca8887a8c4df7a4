//! Shared application state
//!
//! The cache, hub, and throttle are constructed once at process start and
//! handed out as `Arc` handles: adapters hold the write path via the
//! pipeline channel, query and subscriber handlers hold read handles here.
//! No ambient globals.

use std::sync::Arc;
use std::time::Instant;

use types::pair::PairConfig;

use crate::cache::BookCache;
use crate::config::Config;
use crate::hub::BroadcastHub;
use crate::throttle::BroadcastThrottle;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<BookCache>,
    pub hub: Arc<BroadcastHub>,
    pub throttle: Arc<BroadcastThrottle>,
    pub pairs: Arc<Vec<PairConfig>>,
    pub config: Arc<Config>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, pairs: Vec<PairConfig>) -> Self {
        let throttle = BroadcastThrottle::new(std::time::Duration::from_millis(
            config.throttle_ms,
        ));
        Self {
            cache: Arc::new(BookCache::new()),
            hub: Arc::new(BroadcastHub::new()),
            throttle: Arc::new(throttle),
            pairs: Arc::new(pairs),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Seconds since process start, for the health probe.
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
