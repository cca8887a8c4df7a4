//! Venue tags and tradable instrument configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FeedError;

/// A trading venue tracked by the feed.
///
/// `Binance` delivers a continuous depth stream over WebSocket; `Openbook`
/// is an on-chain venue whose book is polled from account state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Binance,
    Openbook,
}

impl Venue {
    /// All supported venues, in display order.
    pub const ALL: [Venue; 2] = [Venue::Binance, Venue::Openbook];

    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Binance => "binance",
            Venue::Openbook => "openbook",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binance" => Ok(Venue::Binance),
            "openbook" => Ok(Venue::Openbook),
            other => Err(FeedError::UnknownVenue {
                venue: other.to_string(),
            }),
        }
    }
}

/// Configuration for one tradable instrument on one venue.
///
/// Loaded once at startup and never mutated. The venue-specific addressing
/// lives in `binance_symbol` (lowercase stream name) or `openbook_market`
/// (on-chain account address), depending on `venue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    /// Canonical symbol, e.g. "SOLUSDT".
    pub symbol: String,
    /// Human-readable name, e.g. "SOL/USDT".
    pub display_name: String,
    /// Venue this instrument is tracked on.
    pub venue: Venue,
    /// Lowercase Binance stream symbol, for streaming pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binance_symbol: Option<String>,
    /// On-chain market account address, for polled pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openbook_market: Option<String>,
}

impl PairConfig {
    /// Build a streaming (Binance) pair.
    pub fn binance(symbol: &str, display_name: &str, stream_symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            display_name: display_name.to_string(),
            venue: Venue::Binance,
            binance_symbol: Some(stream_symbol.to_string()),
            openbook_market: None,
        }
    }

    /// Build a polled (OpenBook) pair.
    pub fn openbook(symbol: &str, display_name: &str, market: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            display_name: display_name.to_string(),
            venue: Venue::Openbook,
            binance_symbol: None,
            openbook_market: Some(market.to_string()),
        }
    }
}
