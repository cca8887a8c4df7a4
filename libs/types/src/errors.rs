//! Error taxonomy for the feed
//!
//! Shared error types using thiserror. Venue-originated faults are contained
//! at the adapter boundary; these variants cover what can cross module
//! boundaries: bad query input, cache misses, transport and decode failures.

use thiserror::Error;

/// Top-level feed error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Invalid venue \"{venue}\". Must be one of: binance, openbook")]
    UnknownVenue { venue: String },

    #[error("Missing required query parameter: {param}")]
    MissingParam { param: &'static str },

    #[error("No snapshot available for {venue}:{symbol}")]
    NoSnapshot { venue: String, symbol: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}
