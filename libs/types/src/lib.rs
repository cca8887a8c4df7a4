//! Types library for the multi-venue order book feed
//!
//! This library provides the canonical data model shared by the feed service
//! and every downstream consumer of a `Book`, ensuring type safety and
//! deterministic behavior across the ingestion and query paths.
//!
//! # Modules
//! - `pair`: Venue tags and tradable instrument configuration
//! - `book`: Price levels and the canonical order book snapshot
//! - `wire`: WebSocket message envelope (snapshot / book_update / error)
//! - `errors`: Error taxonomy

// Public modules
pub mod book;
pub mod errors;
pub mod pair;
pub mod wire;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::book::*;
    pub use crate::errors::*;
    pub use crate::pair::*;
    pub use crate::wire::*;
}
