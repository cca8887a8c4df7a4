//! Latest-book cache keyed by `venue:symbol`
//!
//! Single source of truth for snapshot queries and subscriber seeding. No
//! history, no versioning beyond "latest": an incoming book always replaces
//! the prior entry for its key regardless of timestamp ordering — the feed
//! trusts arrival order from each adapter. Safe under concurrent adapter
//! writers and handler/broadcast readers; a read immediately following a
//! write for the same key observes that write.

use dashmap::DashMap;
use types::book::Book;
use types::pair::Venue;

/// Process-wide keyed store of the latest `Book` per `venue:symbol`.
#[derive(Debug, Default)]
pub struct BookCache {
    books: DashMap<String, Book>,
}

impl BookCache {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// Replace the entry at the book's key unconditionally (last write wins).
    pub fn upsert(&self, book: Book) {
        self.books.insert(book.key(), book);
    }

    /// Latest book for a venue and symbol, if any has arrived.
    pub fn get(&self, venue: Venue, symbol: &str) -> Option<Book> {
        self.books
            .get(&format!("{}:{}", venue, symbol))
            .map(|entry| entry.clone())
    }

    /// Every cached book, one per key. Used to seed a joining subscriber.
    pub fn all(&self) -> Vec<Book> {
        self.books.iter().map(|entry| entry.clone()).collect()
    }

    /// Number of distinct cached keys.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use types::book::Level;
    use rust_decimal::Decimal;

    use super::*;

    fn book_with_bid(symbol: &str, bid_price: i64) -> Book {
        Book::normalized(
            Venue::Binance,
            symbol,
            vec![Level::new(Decimal::from(bid_price), Decimal::ONE)],
            vec![Level::new(Decimal::from(bid_price + 1), Decimal::ONE)],
        )
    }

    #[test]
    fn upsert_is_last_write_wins_per_key() {
        let cache = BookCache::new();
        let first = book_with_bid("SOLUSDT", 100);
        let mut second = book_with_bid("SOLUSDT", 200);
        // Older timestamp must not matter; arrival order does.
        second.ts = first.ts - 10_000;

        cache.upsert(first);
        cache.upsert(second.clone());

        let got = cache.get(Venue::Binance, "SOLUSDT").unwrap();
        assert_eq!(got, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_are_distinct_per_venue_and_symbol() {
        let cache = BookCache::new();
        cache.upsert(book_with_bid("SOLUSDT", 100));
        cache.upsert(book_with_bid("BTCUSDT", 50_000));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(Venue::Binance, "SOLUSDT").is_some());
        assert!(cache.get(Venue::Openbook, "SOLUSDT").is_none());
        assert!(cache.get(Venue::Binance, "ETHUSDT").is_none());
    }

    #[test]
    fn all_returns_one_book_per_key() {
        let cache = BookCache::new();
        cache.upsert(book_with_bid("SOLUSDT", 100));
        cache.upsert(book_with_bid("SOLUSDT", 101));
        cache.upsert(book_with_bid("BTCUSDT", 50_000));

        let all = cache.all();
        assert_eq!(all.len(), 2);
    }
}
