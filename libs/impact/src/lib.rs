//! Impact simulation — fill estimation against an order book snapshot
//!
//! Estimates the price impact of a hypothetical market order by walking the
//! resting levels of a [`Book`]. All calculations are deterministic:
//! fixed-point `Decimal`, no system calls, no shared state. The same book
//! and inputs produce bit-identical results wherever the function runs, so
//! the producing service and any consumer holding a `Book` can cross-check
//! each other.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::book::Book;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Taker side of the simulated order.
///
/// A buy lifts asks (walked ascending by price); a sell hits bids (walked
/// descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Unit in which the order amount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountMode {
    /// Amount is a base-asset quantity to fill.
    Base,
    /// Amount is a quote notional to spend (buy) or receive (sell).
    Quote,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// A single fill produced while walking the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub price: Decimal,
    pub qty: Decimal,
}

/// Result of simulating one order. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactResult {
    /// Base quantity filled across all consumed levels.
    pub filled_base: Decimal,
    /// Quote notional spent (buy) or received (sell).
    pub spent_quote: Decimal,
    /// Volume-weighted average fill price; zero when nothing filled.
    pub avg_price: Decimal,
    /// Deviation of `avg_price` from the pre-trade mid, in basis points.
    /// Positive always means worse than mid for the taker, on either side.
    pub slippage_bps: Decimal,
    /// Per-level fills in consumption order.
    #[serde(rename = "perLevelFills")]
    pub fills: Vec<Fill>,
    /// Base quantity left unfilled. In quote mode, once depth is exhausted
    /// this is approximated as `remaining notional / mid` — deliberately not
    /// an exact inverse of the fill algorithm.
    pub unfilled_base: Decimal,
}

impl ImpactResult {
    /// All-zero result; `unfilled_base` carries the unservable request.
    fn zero(unfilled_base: Decimal) -> Self {
        Self {
            filled_base: Decimal::ZERO,
            spent_quote: Decimal::ZERO,
            avg_price: Decimal::ZERO,
            slippage_bps: Decimal::ZERO,
            fills: Vec::new(),
            unfilled_base,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

const BPS: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Simulate a market order against `book`.
///
/// The mid price is taken once from the top of book before any consumption.
/// A non-positive `amount` or an empty side yields the all-zero result with
/// `unfilled_base` equal to the requested amount in base mode (zero in quote
/// mode).
pub fn simulate(book: &Book, side: OrderSide, mode: AmountMode, amount: Decimal) -> ImpactResult {
    if amount <= Decimal::ZERO || book.bids.is_empty() || book.asks.is_empty() {
        let unfilled = match mode {
            AmountMode::Base => amount,
            AmountMode::Quote => Decimal::ZERO,
        };
        return ImpactResult::zero(unfilled);
    }

    // Both sides are non-empty here, so the mid always exists.
    let mid = book.mid_price().unwrap_or(Decimal::ZERO);

    // Levels are sorted by construction: asks ascending, bids descending.
    let levels = match side {
        OrderSide::Buy => &book.asks,
        OrderSide::Sell => &book.bids,
    };

    let mut filled_base = Decimal::ZERO;
    let mut spent_quote = Decimal::ZERO;
    let mut remaining = amount;
    let mut fills = Vec::new();

    for level in levels {
        if remaining <= Decimal::ZERO {
            break;
        }

        match mode {
            AmountMode::Base => {
                let qty = level.size.min(remaining);
                filled_base += qty;
                spent_quote += qty * level.price;
                remaining -= qty;
                fills.push(Fill {
                    price: level.price,
                    qty,
                });
            }
            AmountMode::Quote => {
                let level_notional = level.notional();
                if level_notional <= remaining {
                    filled_base += level.size;
                    spent_quote += level_notional;
                    remaining -= level_notional;
                    fills.push(Fill {
                        price: level.price,
                        qty: level.size,
                    });
                } else {
                    let qty = remaining / level.price;
                    filled_base += qty;
                    spent_quote += remaining;
                    remaining = Decimal::ZERO;
                    fills.push(Fill {
                        price: level.price,
                        qty,
                    });
                }
            }
        }
    }

    let avg_price = if filled_base > Decimal::ZERO {
        spent_quote / filled_base
    } else {
        Decimal::ZERO
    };

    let slippage_bps = if mid > Decimal::ZERO && avg_price > Decimal::ZERO {
        match side {
            OrderSide::Buy => (avg_price - mid) / mid * BPS,
            OrderSide::Sell => (mid - avg_price) / mid * BPS,
        }
    } else {
        Decimal::ZERO
    };

    let unfilled_base = match mode {
        AmountMode::Base => remaining.max(Decimal::ZERO),
        // Depth exhausted before the notional was spent: approximate the
        // unfilled base at mid. Not an exact inverse of the walk above.
        AmountMode::Quote => {
            if remaining > Decimal::ZERO && mid > Decimal::ZERO {
                remaining / mid
            } else {
                Decimal::ZERO
            }
        }
    };

    ImpactResult {
        filled_base,
        spent_quote,
        avg_price,
        slippage_bps,
        fills,
        unfilled_base,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use types::book::Level;
    use types::pair::Venue;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn level(price: &str, size: &str) -> Level {
        Level::new(dec(price), dec(size))
    }

    fn book(bids: Vec<Level>, asks: Vec<Level>) -> Book {
        Book::normalized(Venue::Binance, "SOLUSDT", bids, asks)
    }

    #[test]
    fn buy_base_walks_asks_ascending() {
        let book = book(
            vec![level("99", "5")],
            vec![level("100", "5"), level("101", "10")],
        );

        let result = simulate(&book, OrderSide::Buy, AmountMode::Base, dec("10"));

        assert_eq!(result.filled_base, dec("10"));
        // 5 x 100 + 5 x 101
        assert_eq!(result.spent_quote, dec("1005"));
        assert_eq!(result.avg_price, dec("100.5"));
        assert_eq!(result.fills.len(), 2);
        assert_eq!(result.fills[0], Fill { price: dec("100"), qty: dec("5") });
        assert_eq!(result.fills[1], Fill { price: dec("101"), qty: dec("5") });
        assert_eq!(result.unfilled_base, Decimal::ZERO);
    }

    #[test]
    fn buy_base_partial_when_depth_exhausted() {
        let book = book(vec![level("99", "1")], vec![level("100", "3")]);

        let result = simulate(&book, OrderSide::Buy, AmountMode::Base, dec("10"));

        assert_eq!(result.filled_base, dec("3"));
        assert_eq!(result.unfilled_base, dec("7"));
        assert_eq!(result.avg_price, dec("100"));
    }

    #[test]
    fn buy_quote_partial_fill_divides_remaining_notional() {
        let book = book(vec![level("99", "1")], vec![level("100", "5")]);

        let result = simulate(&book, OrderSide::Buy, AmountMode::Quote, dec("250"));

        assert_eq!(result.filled_base, dec("2.5"));
        assert_eq!(result.spent_quote, dec("250"));
        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].qty, dec("2.5"));
        assert_eq!(result.unfilled_base, Decimal::ZERO);
    }

    #[test]
    fn sell_quote_beyond_total_bid_notional() {
        let book = book(
            vec![level("100", "1"), level("99", "1")],
            vec![level("101", "1")],
        );

        // Total bid notional = 100 + 99 = 199; ask for 500.
        let result = simulate(&book, OrderSide::Sell, AmountMode::Quote, dec("500"));

        assert_eq!(result.filled_base, dec("2"));
        assert_eq!(result.spent_quote, dec("199"));
        // Mid = (100 + 101) / 2 = 100.5; unfilled approximated at mid.
        let mid = dec("100.5");
        assert_eq!(result.unfilled_base, dec("301") / mid);
        assert!(result.unfilled_base > Decimal::ZERO);
    }

    #[test]
    fn sell_base_walks_bids_descending() {
        let book = book(
            vec![level("100", "1"), level("98", "1")],
            vec![level("102", "1")],
        );

        let result = simulate(&book, OrderSide::Sell, AmountMode::Base, dec("2"));

        assert_eq!(result.fills[0].price, dec("100"));
        assert_eq!(result.fills[1].price, dec("98"));
        assert_eq!(result.avg_price, dec("99"));
        // Mid = 101; selling below mid is positive slippage for the taker.
        assert!(result.slippage_bps > Decimal::ZERO);
    }

    #[test]
    fn buy_above_mid_is_positive_slippage() {
        let book = book(
            vec![level("99", "5")],
            vec![level("100", "5"), level("101", "10")],
        );

        let result = simulate(&book, OrderSide::Buy, AmountMode::Base, dec("10"));

        // avg 100.5 vs mid 99.5
        let expected = (dec("100.5") - dec("99.5")) / dec("99.5") * dec("10000");
        assert_eq!(result.slippage_bps, expected);
        assert!(result.slippage_bps > Decimal::ZERO);
    }

    #[test]
    fn non_positive_amount_yields_zero_result() {
        let book = book(vec![level("99", "1")], vec![level("100", "1")]);

        let result = simulate(&book, OrderSide::Buy, AmountMode::Base, Decimal::ZERO);
        assert_eq!(result, ImpactResult::zero(Decimal::ZERO));

        let result = simulate(&book, OrderSide::Buy, AmountMode::Base, dec("-3"));
        assert_eq!(result.filled_base, Decimal::ZERO);
        assert_eq!(result.unfilled_base, dec("-3"));

        let result = simulate(&book, OrderSide::Sell, AmountMode::Quote, Decimal::ZERO);
        assert_eq!(result.unfilled_base, Decimal::ZERO);
    }

    #[test]
    fn empty_side_yields_zero_result_with_requested_amount() {
        let empty_asks = book(vec![level("99", "1")], vec![]);

        let result = simulate(&empty_asks, OrderSide::Buy, AmountMode::Base, dec("4"));
        assert_eq!(result.filled_base, Decimal::ZERO);
        assert_eq!(result.avg_price, Decimal::ZERO);
        assert_eq!(result.unfilled_base, dec("4"));

        let result = simulate(&empty_asks, OrderSide::Buy, AmountMode::Quote, dec("4"));
        assert_eq!(result.unfilled_base, Decimal::ZERO);
    }

    #[test]
    fn result_serializes_camel_case() {
        let book = book(vec![level("99", "1")], vec![level("100", "1")]);
        let result = simulate(&book, OrderSide::Buy, AmountMode::Base, dec("1"));
        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("filledBase").is_some());
        assert!(json.get("spentQuote").is_some());
        assert!(json.get("avgPrice").is_some());
        assert!(json.get("slippageBps").is_some());
        assert!(json.get("perLevelFills").is_some());
        assert!(json.get("unfilledBase").is_some());
        assert!(json.get("fills").is_none());
    }
}
