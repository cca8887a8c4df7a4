//! Polled venue adapter (OpenBook account state)
//!
//! One fixed-interval poller per tracked pair. Every cycle fetches the
//! market's account state over JSON-RPC, decodes it into levels, and
//! delivers a normalized book. Cycles are independent: any fetch or decode
//! failure is logged and the next cycle proceeds, with no backoff. Only
//! shutdown or a closed pipeline stops the poller.
//!
//! The venue encodes its book as a binary slab inside account data. That
//! layout is a pluggable dependency behind [`SlabDecoder`]; the default
//! [`SyntheticDecoder`] stands in with generated levels until a real slab
//! parser is integrated.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use types::book::{Book, Level};
use types::errors::FeedError;
use types::pair::{PairConfig, Venue};

use crate::normalize;

/// Decodes raw account bytes into bid/ask levels.
///
/// The real slab layout (tree nodes, lot-size price reconstruction) lives
/// behind this seam; the poller only depends on the contract.
pub trait SlabDecoder: Send + Sync {
    fn decode(&self, raw: Option<&[u8]>) -> Result<(Vec<Level>, Vec<Level>), FeedError>;
}

/// Stand-in decoder producing plausible levels around a reference price.
///
/// TODO: replace with a real slab parser: fetch the bids/asks slab
/// accounts referenced by the market account, walk the tree in order, and
/// convert lot-denominated prices via the market's base/quote lot sizes.
pub struct SyntheticDecoder;

impl SlabDecoder for SyntheticDecoder {
    fn decode(&self, _raw: Option<&[u8]>) -> Result<(Vec<Level>, Vec<Level>), FeedError> {
        let mut rng = rand::thread_rng();
        let base_price = 135.0 + (rng.gen::<f64>() - 0.5) * 2.0;
        let spread = 0.01;

        let mut bids = Vec::with_capacity(10);
        let mut asks = Vec::with_capacity(10);

        for i in 0..10 {
            let step = i as f64 * 0.02;
            let bid = base_price - spread - step - rng.gen::<f64>() * 0.01;
            let ask = base_price + spread + step + rng.gen::<f64>() * 0.01;
            let bid_size = 5.0 + rng.gen::<f64>() * 50.0;
            let ask_size = 5.0 + rng.gen::<f64>() * 50.0;

            bids.push(Level::new(to_decimal(bid, 4)?, to_decimal(bid_size, 2)?));
            asks.push(Level::new(to_decimal(ask, 4)?, to_decimal(ask_size, 2)?));
        }

        Ok((bids, asks))
    }
}

fn to_decimal(value: f64, dp: u32) -> Result<Decimal, FeedError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(dp))
        .ok_or_else(|| FeedError::Decode(format!("unrepresentable level value {value}")))
}

// JSON-RPC getAccountInfo response, base64 encoding requested.
#[derive(Debug, Deserialize)]
struct AccountInfoResponse {
    result: Option<RpcResult>,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    value: Option<AccountValue>,
}

#[derive(Debug, Deserialize)]
struct AccountValue {
    /// `[data, encoding]` tuple.
    data: Vec<String>,
}

pub struct OpenBookAdapter {
    pair: PairConfig,
    rpc_url: String,
    poll_interval_ms: u64,
    client: reqwest::Client,
    decoder: Arc<dyn SlabDecoder>,
}

impl OpenBookAdapter {
    pub fn new(
        pair: PairConfig,
        rpc_url: &str,
        poll_interval_ms: u64,
        client: reqwest::Client,
        decoder: Arc<dyn SlabDecoder>,
    ) -> Self {
        Self {
            pair,
            rpc_url: rpc_url.to_string(),
            poll_interval_ms,
            client,
            decoder,
        }
    }

    /// One poll cycle: fetch, decode, normalize.
    async fn poll_once(&self) -> Result<Book, FeedError> {
        let raw = self.fetch_account_data().await?;
        let (bids, asks) = self.decoder.decode(raw.as_deref())?;
        Ok(normalize::from_levels(
            Venue::Openbook,
            &self.pair.symbol,
            bids,
            asks,
        ))
    }

    /// Raw account bytes for the market, or `None` if the account is absent.
    async fn fetch_account_data(&self) -> Result<Option<Vec<u8>>, FeedError> {
        let market = self
            .pair
            .openbook_market
            .as_deref()
            .ok_or_else(|| FeedError::Decode("pair has no market address".to_string()))?;

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getAccountInfo",
            "params": [market, { "encoding": "base64" }],
        });

        let response: AccountInfoResponse = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let Some(value) = response.result.and_then(|r| r.value) else {
            return Ok(None);
        };
        let Some(encoded) = value.data.first() else {
            return Ok(None);
        };

        BASE64
            .decode(encoded)
            .map(Some)
            .map_err(|e| FeedError::Decode(format!("account data is not base64: {e}")))
    }
}

/// Run one poller until shutdown. The first poll fires immediately.
pub async fn run(
    adapter: OpenBookAdapter,
    tx: mpsc::Sender<Book>,
    mut shutdown: watch::Receiver<bool>,
) {
    let interval = std::time::Duration::from_millis(adapter.poll_interval_ms);
    let mut ticker = tokio::time::interval(interval);
    info!(symbol = %adapter.pair.symbol, ?interval, "polling started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match adapter.poll_once().await {
                    Ok(book) => {
                        if tx.send(book).await.is_err() {
                            warn!(symbol = %adapter.pair.symbol, "pipeline closed, stopping poller");
                            return;
                        }
                        debug!(symbol = %adapter.pair.symbol, "poll cycle delivered");
                    }
                    Err(err) => {
                        warn!(symbol = %adapter.pair.symbol, error = %err, "poll cycle failed, continuing");
                    }
                }
            }
            _ = shutdown.changed() => {
                info!(symbol = %adapter.pair.symbol, "polling stopped");
                return;
            }
        }
    }
}
