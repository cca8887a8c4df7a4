//! Streaming venue adapter (Binance depth channel)
//!
//! One persistent WebSocket per tracked pair to the venue's
//! `depth20@100ms` channel, which re-delivers the full top-20 book at a
//! fixed server cadence — no snapshot/delta reconciliation needed. The
//! connection self-heals with exponential backoff and shuts down
//! race-free: once shutdown is signaled, no retry can fire.

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use types::book::Book;
use types::pair::{PairConfig, Venue};

use crate::normalize;
use crate::venues::backoff::Backoff;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection lifecycle. `Closed` is terminal: it is entered only on
/// intentional shutdown and permanently suppresses reconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Disconnected,
    Connecting,
    Connected,
    Closed,
}

/// Per-connection state, one per tracked pair.
struct ConnectionState {
    symbol: String,
    liveness: Liveness,
}

impl ConnectionState {
    fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            liveness: Liveness::Disconnected,
        }
    }

    fn set(&mut self, next: Liveness) {
        if self.liveness != next {
            debug!(symbol = %self.symbol, from = ?self.liveness, to = ?next, "connection state");
            self.liveness = next;
        }
    }
}

/// Depth payload from the stream: `[price, qty]` string pairs. Other
/// message shapes on the channel leave both sides absent and are skipped.
#[derive(Debug, Deserialize)]
struct DepthMessage {
    bids: Option<Vec<[String; 2]>>,
    asks: Option<Vec<[String; 2]>>,
}

pub struct BinanceAdapter {
    pair: PairConfig,
    ws_base: String,
}

impl BinanceAdapter {
    pub fn new(pair: PairConfig, ws_base: &str) -> Self {
        Self {
            pair,
            ws_base: ws_base.to_string(),
        }
    }

    fn url(&self) -> String {
        let stream_symbol = self
            .pair
            .binance_symbol
            .as_deref()
            .unwrap_or(&self.pair.symbol);
        format!("{}/{}@depth20@100ms", self.ws_base, stream_symbol)
    }
}

/// Run one adapter until shutdown. Transient connection failures recover
/// through backoff and never surface to callers.
pub async fn run(
    adapter: BinanceAdapter,
    tx: mpsc::Sender<Book>,
    mut shutdown: watch::Receiver<bool>,
) {
    let url = adapter.url();
    let mut state = ConnectionState::new(&adapter.pair.symbol);
    let mut backoff = Backoff::default();

    loop {
        state.set(Liveness::Connecting);
        info!(symbol = %adapter.pair.symbol, url = %url, "connecting");

        let connected = tokio::select! {
            res = connect_async(url.as_str()) => res,
            _ = shutdown.changed() => {
                state.set(Liveness::Closed);
                return;
            }
        };

        match connected {
            Ok((ws, _response)) => {
                info!(symbol = %adapter.pair.symbol, "connected");
                state.set(Liveness::Connected);
                backoff.reset();

                if !read_stream(ws, &adapter, &tx, &mut shutdown).await {
                    state.set(Liveness::Closed);
                    return;
                }
                state.set(Liveness::Disconnected);
            }
            Err(err) => {
                warn!(symbol = %adapter.pair.symbol, error = %err, "connect failed");
                state.set(Liveness::Disconnected);
            }
        }

        if !wait_for_retry(&mut backoff, &mut shutdown).await {
            state.set(Liveness::Closed);
            return;
        }
    }
}

/// Read the live stream until it drops. Returns `false` when the adapter
/// must stop for good (shutdown requested, or the pipeline is gone), `true`
/// when the connection was lost and a reconnect should be scheduled.
async fn read_stream(
    ws: WsStream,
    adapter: &BinanceAdapter,
    tx: &mpsc::Sender<Book>,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    let symbol = &adapter.pair.symbol;
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<DepthMessage>(&text) {
                        Ok(DepthMessage { bids: Some(bids), asks: Some(asks) }) => {
                            let book = normalize::from_raw(Venue::Binance, symbol, &bids, &asks);
                            if tx.send(book).await.is_err() {
                                warn!(symbol = %symbol, "pipeline closed, stopping adapter");
                                return false;
                            }
                        }
                        // Not a depth refresh (e.g. a subscription ack); skip.
                        Ok(_) => {}
                        Err(err) => {
                            warn!(symbol = %symbol, error = %err, "malformed payload, skipping");
                        }
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    let _ = sink.send(Message::Pong(payload)).await;
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(symbol = %symbol, ?frame, "closed by server");
                    return true;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(symbol = %symbol, error = %err, "stream error");
                    return true;
                }
                None => {
                    info!(symbol = %symbol, "stream ended");
                    return true;
                }
            },
            _ = shutdown.changed() => {
                let _ = sink
                    .send(Message::Close(Some(CloseFrame {
                        code: CloseCode::Normal,
                        reason: "shutdown".into(),
                    })))
                    .await;
                return false;
            }
        }
    }
}

/// Wait out the backoff delay before the next attempt. Returns `false`
/// without consuming a delay if shutdown has been (or becomes) signaled —
/// a retry must never fire after shutdown has been requested.
pub(crate) async fn wait_for_retry(
    backoff: &mut Backoff,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    if *shutdown.borrow() {
        return false;
    }

    let delay = backoff.next_delay();
    debug!(?delay, "scheduling reconnect");

    tokio::select! {
        _ = sleep(delay) => true,
        _ = shutdown.changed() => false,
    }
}
