//! Order book for a single instrument.
//!
//! ## Architecture
//!
//! Both sides are sorted maps keyed by price, with a FIFO queue per price
//! level:
//!
//! - **Bids** (buy orders): keyed by `Reverse(price)` so the best bid
//!   (highest price) is the first entry.
//! - **Asks** (sell orders): keyed by `price` so the best ask (lowest
//!   price) is the first entry.
//!
//! Best-price lookup and insertion are O(log n) in the number of price
//! levels; FIFO tie-break within a level is the queue order.
//!
//! ## Invariants
//!
//! - Bids descending, asks ascending; within a level, arrival order.
//! - No resting order has zero quantity; empty levels are removed.
//!
//! ## Example
//!
//! ```
//! use exchange_core::orderbook::OrderBook;
//! use exchange_core::types::{Side, UserId};
//!
//! let mut book = OrderBook::new();
//! book.insert(UserId::from("2"), Side::Ask, 140_090_000_000, 1_000_000_000);
//! book.insert(UserId::from("2"), Side::Ask, 150_100_000_000, 500_000_000);
//!
//! assert_eq!(book.best_ask(), Some(140_090_000_000));
//! assert!(book.best_bid().is_none());
//! ```

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::orderbook::PriceLevel;
use crate::types::{Order, Side, UserId};

/// Depth aggregation for one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    /// Which side of the book the level rests on
    pub side: Side,
    /// Sum of resting quantities at this exact price (fixed-point)
    pub quantity: u64,
}

/// Point-in-time per-price aggregation of both sides of the book.
///
/// One entry per distinct resting price. A price can only appear on one
/// side: crossing orders always match, so the book is never crossed.
pub type DepthSnapshot = BTreeMap<u64, DepthLevel>;

/// Price-time priority order book.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Bid price levels (best = highest price first)
    bids: BTreeMap<Reverse<u64>, PriceLevel>,

    /// Ask price levels (best = lowest price first)
    asks: BTreeMap<u64, PriceLevel>,

    /// Next arrival sequence number
    next_seq: u64,
}

impl OrderBook {
    /// Create a new empty order book
    pub fn new() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            next_seq: 1,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Total number of resting orders
    pub fn order_count(&self) -> usize {
        self.bids.values().map(PriceLevel::order_count).sum::<usize>()
            + self.asks.values().map(PriceLevel::order_count).sum::<usize>()
    }

    /// Check if the book is empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Number of bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask price levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    // ========================================================================
    // Order insertion
    // ========================================================================

    /// Rest an order on the book.
    ///
    /// The order is appended at the back of its price level, last among
    /// equals, which preserves the price-time sort invariant. Returns the
    /// arrival sequence number assigned to the order.
    ///
    /// Callers must not insert zero-quantity orders; the matcher only rests
    /// a remainder when it is positive.
    pub fn insert(&mut self, user: UserId, side: Side, price: u64, quantity: u64) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let order = Order::new(seq, user, side, price, quantity);
        match side {
            Side::Bid => {
                self.bids
                    .entry(Reverse(price))
                    .or_insert_with(PriceLevel::new)
                    .push_back(order);
            }
            Side::Ask => {
                self.asks
                    .entry(price)
                    .or_insert_with(PriceLevel::new)
                    .push_back(order);
            }
        }

        seq
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Best bid price (highest buy price), or None if no bids rest
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.keys().next().map(|r| r.0)
    }

    /// Best ask price (lowest sell price), or None if no asks rest
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    /// Best price on the given side
    pub fn best_price(&self, side: Side) -> Option<u64> {
        match side {
            Side::Bid => self.best_bid(),
            Side::Ask => self.best_ask(),
        }
    }

    /// Best bid price level, mutable (for the matcher)
    pub fn best_bid_level_mut(&mut self) -> Option<(u64, &mut PriceLevel)> {
        self.bids.iter_mut().next().map(|(r, level)| (r.0, level))
    }

    /// Best ask price level, mutable (for the matcher)
    pub fn best_ask_level_mut(&mut self) -> Option<(u64, &mut PriceLevel)> {
        self.asks.iter_mut().next().map(|(price, level)| (*price, level))
    }

    /// Remove an empty bid price level
    pub fn remove_bid_level(&mut self, price: u64) {
        self.bids.remove(&Reverse(price));
    }

    /// Remove an empty ask price level
    pub fn remove_ask_level(&mut self, price: u64) {
        self.asks.remove(&price);
    }

    // ========================================================================
    // Depth
    // ========================================================================

    /// Per-price-level aggregation across both sides.
    ///
    /// Reports, for each distinct resting price, the side tag and the sum
    /// of resting quantities. The caller (the exchange worker) serializes
    /// this against mutations, so the view is always consistent: no partial
    /// sums are ever observable.
    pub fn depth(&self) -> DepthSnapshot {
        let mut snapshot = DepthSnapshot::new();

        for (Reverse(price), level) in &self.bids {
            snapshot.insert(
                *price,
                DepthLevel {
                    side: Side::Bid,
                    quantity: level.total_quantity(),
                },
            );
        }
        for (price, level) in &self.asks {
            snapshot.insert(
                *price,
                DepthLevel {
                    side: Side::Ask,
                    quantity: level.total_quantity(),
                },
            );
        }

        snapshot
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
