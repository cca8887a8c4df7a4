//! Venue payload normalization
//!
//! Converts raw venue levels into a canonical `Book`. Never errors for
//! malformed input: a level that fails to parse, or carries a non-positive
//! price or size, is dropped rather than failing the whole normalization.

use std::str::FromStr;

use rust_decimal::Decimal;
use types::book::{Book, Level};
use types::pair::Venue;

/// Normalize numeric-string level pairs (`[price, size]`) as delivered by
/// the streaming venue's depth channel.
pub fn from_raw(venue: Venue, symbol: &str, bids: &[[String; 2]], asks: &[[String; 2]]) -> Book {
    Book::normalized(venue, symbol, parse_side(bids), parse_side(asks))
}

/// Normalize pre-parsed levels as produced by the polled venue's decoder.
pub fn from_levels(venue: Venue, symbol: &str, bids: Vec<Level>, asks: Vec<Level>) -> Book {
    Book::normalized(venue, symbol, bids, asks)
}

fn parse_side(raw: &[[String; 2]]) -> Vec<Level> {
    raw.iter()
        .filter_map(|[price, size]| {
            let price = Decimal::from_str(price).ok()?;
            let size = Decimal::from_str(size).ok()?;
            Some(Level::new(price, size))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn raw(levels: &[(&str, &str)]) -> Vec<[String; 2]> {
        levels
            .iter()
            .map(|(p, s)| [p.to_string(), s.to_string()])
            .collect()
    }

    #[test]
    fn parses_and_sorts_string_levels() {
        let book = from_raw(
            Venue::Binance,
            "SOLUSDT",
            &raw(&[("99.5", "1.0"), ("100.5", "2.0")]),
            &raw(&[("101.5", "1.0"), ("101.0", "3.0")]),
        );

        assert_eq!(book.bids[0].price, Decimal::from_str("100.5").unwrap());
        assert_eq!(book.asks[0].price, Decimal::from_str("101.0").unwrap());
        assert_eq!(book.venue, Venue::Binance);
    }

    #[test]
    fn malformed_levels_are_dropped_not_errored() {
        let book = from_raw(
            Venue::Binance,
            "SOLUSDT",
            &raw(&[("not-a-number", "1"), ("100", "1"), ("", "2")]),
            &raw(&[("101", "oops"), ("0", "1"), ("102", "-1")]),
        );

        assert_eq!(book.bids.len(), 1);
        assert!(book.asks.is_empty());
    }

    proptest! {
        #[test]
        fn output_never_contains_invalid_levels(
            bids in proptest::collection::vec(("[0-9.x-]{0,8}", "[0-9.x-]{0,8}"), 0..30),
        ) {
            let raw: Vec<[String; 2]> = bids.into_iter().map(|(p, s)| [p, s]).collect();
            let book = from_raw(Venue::Binance, "SOLUSDT", &raw, &[]);

            prop_assert!(book.bids.iter().all(|l| l.price > Decimal::ZERO && l.size > Decimal::ZERO));
            prop_assert!(book.bids.windows(2).all(|w| w[0].price >= w[1].price));
        }
    }
}
