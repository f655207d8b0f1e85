//! Trade type representing an executed match between two orders.
//!
//! Trades are ephemeral: they are produced by the matcher, applied to the
//! ledger within the same submit call, returned to the caller, and logged.
//! Nothing persists them (audit trails are out of scope).

use rust_decimal::Decimal;

use crate::types::price::notional;
use crate::types::UserId;

/// A trade is a single match between a resting (maker) order and an
/// incoming (taker) order.
///
/// ## Price Discovery
///
/// The trade always executes at the resting order's price: the aggressor
/// never pays worse than its limit and receives the better resting price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    /// Trade sequence number (assigned by the matcher)
    pub id: u64,

    /// Execution price in fixed-point (scaled by 10^8)
    /// Always the resting order's price
    pub price: u64,

    /// Executed quantity in fixed-point (scaled by 10^8)
    pub quantity: u64,

    /// User receiving the traded unit
    pub buyer: UserId,

    /// User receiving the funding currency
    pub seller: UserId,
}

impl Trade {
    /// Create a new trade
    pub fn new(id: u64, price: u64, quantity: u64, buyer: UserId, seller: UserId) -> Self {
        Self {
            id,
            price,
            quantity,
            buyer,
            seller,
        }
    }

    /// Exact notional value of this trade (price * quantity)
    ///
    /// This is the funding-currency amount moved from buyer to seller.
    pub fn notional(&self) -> Decimal {
        notional(self.price, self.quantity)
    }
}
