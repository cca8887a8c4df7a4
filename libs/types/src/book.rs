//! Price levels and the canonical order book snapshot
//!
//! A `Book` is immutable once constructed: updates produce a new `Book`,
//! never mutate one in place. Construction goes through [`Book::normalized`],
//! which enforces the level invariants (positive price and size, bids sorted
//! descending, asks ascending) so every holder of a `Book` can rely on them.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pair::Venue;

/// A single price level: resting interest of `size` at `price`.
///
/// A level with non-positive price or size is invalid and never appears in
/// a `Book`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub price: Decimal,
    pub size: Decimal,
}

impl Level {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    /// Whether this level may appear in a normalized book.
    pub fn is_valid(&self) -> bool {
        self.price > Decimal::ZERO && self.size > Decimal::ZERO
    }

    /// Quote-currency value of the level (price x size).
    pub fn notional(&self) -> Decimal {
        self.price * self.size
    }
}

/// Full bid/ask state for one instrument on one venue at a point in time.
///
/// Invariants (enforced at construction):
/// - `bids` sorted non-increasing by price, `asks` non-decreasing
/// - every level has positive price and size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Normalization wall-clock time, Unix milliseconds.
    pub ts: i64,
    pub venue: Venue,
    pub symbol: String,
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

impl Book {
    /// Build a normalized book from raw levels.
    ///
    /// Invalid levels are silently dropped, bids sorted descending and asks
    /// ascending by price. The timestamp is the current wall clock, not any
    /// venue-supplied sequence number.
    pub fn normalized(
        venue: Venue,
        symbol: &str,
        mut bids: Vec<Level>,
        mut asks: Vec<Level>,
    ) -> Self {
        bids.retain(Level::is_valid);
        asks.retain(Level::is_valid);
        bids.sort_by(|a, b| b.price.cmp(&a.price)); // descending
        asks.sort_by(|a, b| a.price.cmp(&b.price)); // ascending

        Self {
            ts: Utc::now().timestamp_millis(),
            venue,
            symbol: symbol.to_string(),
            bids,
            asks,
        }
    }

    /// Cache key for this book: `venue:symbol`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.venue, self.symbol)
    }

    /// A new book carrying only the top `depth` levels per side.
    pub fn trimmed(&self, depth: usize) -> Self {
        Self {
            ts: self.ts,
            venue: self.venue,
            symbol: self.symbol.clone(),
            bids: self.bids.iter().take(depth).copied().collect(),
            asks: self.asks.iter().take(depth).copied().collect(),
        }
    }

    /// Best (highest) bid, if any.
    pub fn best_bid(&self) -> Option<&Level> {
        self.bids.first()
    }

    /// Best (lowest) ask, if any.
    pub fn best_ask(&self) -> Option<&Level> {
        self.asks.first()
    }

    /// Mid price: arithmetic mean of best bid and best ask.
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.best_bid()?.price;
        let ask = self.best_ask()?.price;
        Some((bid + ask) / Decimal::TWO)
    }

    /// Absolute spread: best ask minus best bid.
    pub fn spread_abs(&self) -> Option<Decimal> {
        let bid = self.best_bid()?.price;
        let ask = self.best_ask()?.price;
        Some(ask - bid)
    }

    /// Spread in basis points of mid.
    pub fn spread_bps(&self) -> Option<Decimal> {
        let mid = self.mid_price()?;
        if mid <= Decimal::ZERO {
            return None;
        }
        Some(self.spread_abs()? / mid * Decimal::from(10_000))
    }

    /// Microprice: size-weighted mid, biased toward the side with less
    /// resting size. Weights each side by the *other* side's size.
    pub fn microprice(&self) -> Option<Decimal> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        let total = bid.size + ask.size;
        if total <= Decimal::ZERO {
            return self.mid_price();
        }
        Some((bid.price * ask.size + ask.price * bid.size) / total)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::*;

    fn level(price: &str, size: &str) -> Level {
        Level::new(
            Decimal::from_str(price).unwrap(),
            Decimal::from_str(size).unwrap(),
        )
    }

    #[test]
    fn normalized_sorts_and_filters() {
        let book = Book::normalized(
            Venue::Binance,
            "SOLUSDT",
            vec![
                level("99", "1"),
                level("101", "2"),
                level("100", "0"), // dropped: zero size
                level("-5", "3"),  // dropped: negative price
            ],
            vec![level("103", "1"), level("102", "2")],
        );

        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[0].price, Decimal::from(101));
        assert_eq!(book.bids[1].price, Decimal::from(99));
        assert_eq!(book.asks[0].price, Decimal::from(102));
        assert_eq!(book.asks[1].price, Decimal::from(103));
    }

    #[test]
    fn key_concatenates_venue_and_symbol() {
        let book = Book::normalized(Venue::Openbook, "SOLUSDC", vec![], vec![]);
        assert_eq!(book.key(), "openbook:SOLUSDC");
    }

    #[test]
    fn trimmed_keeps_top_levels_per_side() {
        let book = Book::normalized(
            Venue::Binance,
            "BTCUSDT",
            (1..=20).map(|i| level(&i.to_string(), "1")).collect(),
            (21..=40).map(|i| level(&i.to_string(), "1")).collect(),
        );
        let trimmed = book.trimmed(10);

        assert_eq!(trimmed.bids.len(), 10);
        assert_eq!(trimmed.asks.len(), 10);
        // Top of book survives trimming.
        assert_eq!(trimmed.best_bid(), book.best_bid());
        assert_eq!(trimmed.best_ask(), book.best_ask());
        // The original retains full depth.
        assert_eq!(book.bids.len(), 20);
    }

    #[test]
    fn top_of_book_metrics() {
        let book = Book::normalized(
            Venue::Binance,
            "SOLUSDT",
            vec![level("99", "4")],
            vec![level("101", "1")],
        );

        assert_eq!(book.mid_price(), Some(Decimal::from(100)));
        assert_eq!(book.spread_abs(), Some(Decimal::TWO));
        assert_eq!(book.spread_bps(), Some(Decimal::from(200)));
        // microprice = (99*1 + 101*4) / 5 = 100.6
        assert_eq!(book.microprice(), Some(Decimal::from_str("100.6").unwrap()));
    }

    #[test]
    fn metrics_absent_on_empty_side() {
        let book = Book::normalized(Venue::Binance, "SOLUSDT", vec![level("99", "1")], vec![]);
        assert!(book.mid_price().is_none());
        assert!(book.spread_bps().is_none());
        assert!(book.microprice().is_none());
    }

    proptest! {
        #[test]
        fn normalized_invariants_hold(
            raw_bids in proptest::collection::vec((-1000i64..1000, -10i64..10), 0..50),
            raw_asks in proptest::collection::vec((-1000i64..1000, -10i64..10), 0..50),
        ) {
            let to_levels = |raw: &[(i64, i64)]| {
                raw.iter()
                    .map(|&(p, s)| Level::new(Decimal::from(p), Decimal::from(s)))
                    .collect::<Vec<_>>()
            };
            let book = Book::normalized(Venue::Binance, "SOLUSDT", to_levels(&raw_bids), to_levels(&raw_asks));

            prop_assert!(book.bids.iter().all(Level::is_valid));
            prop_assert!(book.asks.iter().all(Level::is_valid));
            prop_assert!(book.bids.windows(2).all(|w| w[0].price >= w[1].price));
            prop_assert!(book.asks.windows(2).all(|w| w[0].price <= w[1].price));
        }
    }
}
