//! Market Feed Service
//!
//! Ingests live order book data from two independent venues, normalizes it
//! into the canonical `Book`, caches the latest state per `venue:symbol`,
//! and fans it out to WebSocket subscribers with per-key throttling.
//!
//! # Architecture
//!
//! ```text
//!  Binance WS (per pair)   OpenBook RPC poll (per pair)
//!         │                        │
//!         └────────┬───────────────┘
//!                  │  mpsc<Book>
//!              ┌───▼────┐
//!              │Pipeline│  ← upsert cache, throttle check
//!              └───┬────┘
//!          ┌───────┴────────┐
//!      ┌───▼───┐        ┌───▼───┐
//!      │ Cache │        │  Hub  │  ← per-subscriber bounded queues
//!      └───┬───┘        └───┬───┘
//!          │                │
//!     REST snapshot     WS fan-out
//! ```
//!
//! Slow subscribers never block ingestion: fan-out is `try_send` onto each
//! subscriber's own queue, and delivery failures are isolated per
//! subscriber.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod hub;
pub mod normalize;
pub mod pipeline;
pub mod router;
pub mod state;
pub mod throttle;
pub mod venues;

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
