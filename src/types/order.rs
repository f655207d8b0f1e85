//! Order types for the matching engine.
//!
//! ## Fixed-Point Representation
//!
//! Prices and quantities are stored as u64 scaled by 10^8 (see
//! [`crate::types::price::SCALE`]). This provides 8 decimal places of
//! precision without floating-point errors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: bid (buy) or ask (sell)
///
/// Serialized as the lowercase strings `"bid"` / `"ask"` on the wire.
/// Unrecognized side strings fail deserialization and surface as a
/// validation error at the wire layer; the core never sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order - wants to purchase the traded unit
    Bid,
    /// Sell order - wants to sell the traded unit
    Ask,
}

impl Side {
    /// Returns the opposite side (the side an incoming order matches against)
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Wire-format name of this side
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order in the book.
///
/// Immutable except `quantity`, which decreases as the order is filled.
/// Orders with zero quantity never rest on the book: they are removed by
/// the matcher the moment they are exhausted.
///
/// ## Example
///
/// ```
/// use exchange_core::types::{Order, Side, UserId};
///
/// // A bid for 1 unit at 1400.10
/// let order = Order::new(
///     1,                      // arrival sequence (assigned by the book)
///     UserId::from("1"),
///     Side::Bid,
///     140_010_000_000,        // price: 1400.1
///     100_000_000,            // quantity: 1
/// );
/// assert!(!order.is_filled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Arrival sequence number (assigned by the book, strictly increasing)
    ///
    /// Ties at equal price are broken by arrival: lower seq matches first.
    pub seq: u64,

    /// Owning user/account
    pub user: UserId,

    /// Order side
    pub side: Side,

    /// Limit price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Remaining quantity in fixed-point (scaled by 10^8)
    /// Decremented as the order is matched
    pub quantity: u64,
}

impl Order {
    /// Create a new limit order
    pub fn new(seq: u64, user: UserId, side: Side, price: u64, quantity: u64) -> Self {
        Self {
            seq,
            user,
            side,
            price,
            quantity,
        }
    }

    /// Check if the order is fully filled
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Fill a portion of this order
    ///
    /// # Returns
    ///
    /// The actual quantity filled (may be less than requested if the order
    /// does not have enough remaining)
    pub fn fill(&mut self, fill_qty: u64) -> u64 {
        let actual_fill = fill_qty.min(self.quantity);
        self.quantity -= actual_fill;
        actual_fill
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
