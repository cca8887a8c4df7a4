//! Venue adapters
//!
//! Each tracked pair gets its own adapter task feeding the shared pipeline
//! channel. The supervisor owns a single shutdown signal watched by every
//! adapter, so stopping the service stops all of them at once.

pub mod backoff;
pub mod binance;
pub mod openbook;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use types::book::Book;
use types::pair::{PairConfig, Venue};

use crate::config::Config;
use openbook::{SlabDecoder, SyntheticDecoder};

/// Owns the adapter tasks and the shutdown signal they watch.
pub struct VenueSupervisor {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl VenueSupervisor {
    /// Spawn one adapter task per pair, routed by venue.
    pub fn start(pairs: &[PairConfig], config: &Config, tx: mpsc::Sender<Book>) -> Self {
        let (shutdown, _) = watch::channel(false);
        let rpc_client = reqwest::Client::new();
        let decoder: Arc<dyn SlabDecoder> = Arc::new(SyntheticDecoder);
        let mut handles = Vec::with_capacity(pairs.len());

        for pair in pairs {
            let tx = tx.clone();
            let rx = shutdown.subscribe();

            let handle = match pair.venue {
                Venue::Binance => {
                    let adapter = binance::BinanceAdapter::new(pair.clone(), &config.binance_ws_base);
                    tokio::spawn(binance::run(adapter, tx, rx))
                }
                Venue::Openbook => {
                    let adapter = openbook::OpenBookAdapter::new(
                        pair.clone(),
                        &config.solana_rpc_url,
                        config.poll_interval_ms,
                        rpc_client.clone(),
                        Arc::clone(&decoder),
                    );
                    tokio::spawn(openbook::run(adapter, tx, rx))
                }
            };
            handles.push(handle);
        }

        info!(adapters = handles.len(), "venue adapters started");
        Self { shutdown, handles }
    }

    /// Signal shutdown and wait for every adapter task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "adapter task did not stop cleanly");
            }
        }
        info!("venue adapters stopped");
    }
}
