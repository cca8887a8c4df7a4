//! Runtime configuration and the supported pair set
//!
//! All options come from the environment with sensible defaults, so the
//! service runs with no configuration at all in development.

use std::env;

use types::pair::PairConfig;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;
/// Default Binance WebSocket base endpoint.
pub const DEFAULT_BINANCE_WS_BASE: &str = "wss://stream.binance.us:9443/ws";
/// Default Solana RPC endpoint for the polled venue.
pub const DEFAULT_SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
/// Minimum gap between two outbound broadcasts for the same key.
pub const DEFAULT_THROTTLE_MS: u64 = 250;
/// Levels per side carried by a `book_update`.
pub const DEFAULT_BROADCAST_DEPTH: usize = 10;
/// OpenBook account polling interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP/WS listen port (`PORT`).
    pub port: u16,
    /// Upstream WebSocket base for the streaming venue (`BINANCE_WS_BASE`).
    /// Binance global blocks US IPs; point this at binance.us for US
    /// deployments.
    pub binance_ws_base: String,
    /// Upstream RPC endpoint for the polled venue (`SOLANA_RPC_URL`).
    pub solana_rpc_url: String,
    /// Broadcast throttle window in milliseconds (`BROADCAST_THROTTLE_MS`).
    pub throttle_ms: u64,
    /// Trimmed depth for `book_update` messages (`BROADCAST_DEPTH`).
    pub broadcast_depth: usize,
    /// OpenBook poll interval in milliseconds (`POLL_INTERVAL_MS`).
    pub poll_interval_ms: u64,
    /// Allowed cross-origin caller (`CORS_ORIGIN`), `*` for any.
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            binance_ws_base: DEFAULT_BINANCE_WS_BASE.to_string(),
            solana_rpc_url: DEFAULT_SOLANA_RPC_URL.to_string(),
            throttle_ms: DEFAULT_THROTTLE_MS,
            broadcast_depth: DEFAULT_BROADCAST_DEPTH,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            cors_origin: "*".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            port: parsed_var("PORT").unwrap_or(defaults.port),
            binance_ws_base: env::var("BINANCE_WS_BASE").unwrap_or(defaults.binance_ws_base),
            solana_rpc_url: env::var("SOLANA_RPC_URL").unwrap_or(defaults.solana_rpc_url),
            throttle_ms: parsed_var("BROADCAST_THROTTLE_MS").unwrap_or(defaults.throttle_ms),
            broadcast_depth: parsed_var("BROADCAST_DEPTH").unwrap_or(defaults.broadcast_depth),
            poll_interval_ms: parsed_var("POLL_INTERVAL_MS").unwrap_or(defaults.poll_interval_ms),
            cors_origin: env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// The instruments tracked by this deployment, one entry per supported
/// instrument per venue.
pub fn supported_pairs() -> Vec<PairConfig> {
    vec![
        PairConfig::binance("SOLUSDT", "SOL/USDT", "solusdt"),
        PairConfig::binance("BTCUSDT", "BTC/USDT", "btcusdt"),
        PairConfig::binance("ETHUSDT", "ETH/USDT", "ethusdt"),
        PairConfig::openbook(
            "SOLUSDC",
            "SOL/USDC",
            "8BnEgHoWFysVcuFFX7QztDmzuH8r5ZFvyP3sYwn1XTh6",
        ),
    ]
}
