//! Order matching.
//!
//! ## Matching Rules
//!
//! - **Bids** match against asks (lowest price first)
//! - **Asks** match against bids (highest price first)
//! - Within a price level, earliest-arrived resting orders match first
//! - Fills execute at the **resting** order's price (price improvement:
//!   the aggressor never pays worse than its limit)
//! - Partial fills are supported; an unfilled remainder rests on the book
//!
//! Each fill is settled against the ledger inside the same submit call, so
//! no caller can ever observe a trade without its balance movement.
//!
//! ## Example
//!
//! ```
//! use exchange_core::engine::MatchingEngine;
//! use exchange_core::ledger::{Balances, Ledger};
//! use exchange_core::orderbook::OrderBook;
//! use exchange_core::types::{Side, UserId};
//! use rust_decimal::Decimal;
//!
//! let mut book = OrderBook::new();
//! let mut ledger = Ledger::with_accounts([
//!     (UserId::from("1"), Balances::new(Decimal::from(10), Decimal::from(50000))),
//!     (UserId::from("2"), Balances::new(Decimal::from(10), Decimal::from(50000))),
//! ]);
//! let mut engine = MatchingEngine::new();
//!
//! // Resting ask, then a crossing bid
//! engine.submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, 140_090_000_000, 1_000_000_000).unwrap();
//! let report = engine.submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, 150_200_000_000, 200_000_000).unwrap();
//!
//! assert_eq!(report.filled, 200_000_000);
//! assert_eq!(report.remaining, 0);
//! ```

use tracing::debug;

use crate::error::ValidationError;
use crate::ledger::Ledger;
use crate::orderbook::OrderBook;
use crate::types::{Side, Trade, UserId};

/// Result of submitting an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Quantity matched immediately (fixed-point)
    pub filled: u64,

    /// Unfilled quantity now resting on the book (fixed-point)
    pub remaining: u64,

    /// Fills produced by this submission, in execution order
    pub trades: Vec<Trade>,
}

/// The matcher. Holds only the trade sequence counter; book and ledger are
/// owned by the caller (the exchange worker) and borrowed per submission.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    next_trade_id: u64,
}

impl MatchingEngine {
    /// Create a new matching engine
    pub fn new() -> Self {
        Self { next_trade_id: 1 }
    }

    /// Submit a limit order: match what crosses, rest the remainder.
    ///
    /// Validation happens before any mutation; a rejected order changes
    /// nothing. Settlement uses the resting order's price for every fill.
    ///
    /// Self-trading (incoming owner equal to resting owner) is not
    /// prevented; the reference behavior allows it.
    pub fn submit(
        &mut self,
        book: &mut OrderBook,
        ledger: &mut Ledger,
        user: UserId,
        side: Side,
        price: u64,
        quantity: u64,
    ) -> Result<SubmitReport, ValidationError> {
        if price == 0 {
            return Err(ValidationError::NonPositivePrice);
        }
        if quantity == 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }

        let mut remaining = quantity;
        let mut trades = Vec::new();

        while remaining > 0 {
            // Best price on the opposite side, if it crosses the limit
            let resting_price = match side {
                Side::Bid => match book.best_ask() {
                    Some(ask) if ask <= price => ask,
                    _ => break,
                },
                Side::Ask => match book.best_bid() {
                    Some(bid) if bid >= price => bid,
                    _ => break,
                },
            };

            let (_, level) = match side {
                Side::Bid => book.best_ask_level_mut(),
                Side::Ask => book.best_bid_level_mut(),
            }
            .expect("crossing side is non-empty");

            let resting = level.front().expect("levels are never left empty");
            let fill_qty = resting.quantity.min(remaining);
            let resting_user = resting.user.clone();

            let (buyer, seller) = match side {
                Side::Bid => (user.clone(), resting_user),
                Side::Ask => (resting_user, user.clone()),
            };

            // Settle at the resting order's price. Unknown parties make the
            // settlement a documented no-op; the trade itself still happens.
            ledger.transfer(&seller, &buyer, fill_qty, resting_price);

            let trade_id = self.next_trade_id;
            self.next_trade_id += 1;
            debug!(
                trade_id,
                price = resting_price,
                quantity = fill_qty,
                %buyer,
                %seller,
                "trade executed"
            );
            trades.push(Trade::new(trade_id, resting_price, fill_qty, buyer, seller));

            level.fill_front(fill_qty);
            let level_drained = level.is_empty();
            remaining -= fill_qty;

            if level_drained {
                match side {
                    Side::Bid => book.remove_ask_level(resting_price),
                    Side::Ask => book.remove_bid_level(resting_price),
                }
            }
        }

        if remaining > 0 {
            book.insert(user, side, price, remaining);
        }

        Ok(SubmitReport {
            filled: quantity - remaining,
            remaining,
            trades,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Balances;
    use crate::types::price::to_fixed;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fixture() -> (OrderBook, Ledger, MatchingEngine) {
        let ledger = Ledger::with_accounts([
            (UserId::from("1"), Balances::new(dec("10"), dec("50000"))),
            (UserId::from("2"), Balances::new(dec("10"), dec("50000"))),
        ]);
        (OrderBook::new(), ledger, MatchingEngine::new())
    }

    fn fx(s: &str) -> u64 {
        to_fixed(s).unwrap()
    }

    #[test]
    fn test_validation_rejects_before_mutation() {
        let (mut book, mut ledger, mut engine) = fixture();

        let err = engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, 0, fx("1"))
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositivePrice);

        let err = engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, fx("10"), 0)
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveQuantity);

        assert!(book.is_empty());
        assert_eq!(ledger.balance_of(&UserId::from("1")).quote, dec("50000"));
    }

    #[test]
    fn test_non_crossing_order_rests() {
        let (mut book, mut ledger, mut engine) = fixture();

        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, fx("1501"), fx("5"))
            .unwrap();
        let report = engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, fx("1400.1"), fx("1"))
            .unwrap();

        assert_eq!(report.filled, 0);
        assert_eq!(report.remaining, fx("1"));
        assert!(report.trades.is_empty());
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn test_fill_settles_at_resting_price() {
        let (mut book, mut ledger, mut engine) = fixture();

        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, fx("1400.9"), fx("10"))
            .unwrap();

        // Aggressor bids 1502 but pays the resting 1400.9
        let report = engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, fx("1502"), fx("2"))
            .unwrap();

        assert_eq!(report.filled, fx("2"));
        assert_eq!(report.remaining, 0);
        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].price, fx("1400.9"));

        let buyer = ledger.balance_of(&UserId::from("1"));
        assert_eq!(buyer.base, dec("12"));
        assert_eq!(buyer.quote, dec("47198.2"));

        let seller = ledger.balance_of(&UserId::from("2"));
        assert_eq!(seller.base, dec("8"));
        assert_eq!(seller.quote, dec("52801.8"));
    }

    #[test]
    fn test_price_priority_over_arrival() {
        let (mut book, mut ledger, mut engine) = fixture();

        // Worse price arrives first
        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, fx("1501"), fx("5"))
            .unwrap();
        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, fx("1400.9"), fx("1"))
            .unwrap();

        // Crossing bid takes the better-priced ask first, then the worse
        let report = engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, fx("1502"), fx("3"))
            .unwrap();

        assert_eq!(report.trades.len(), 2);
        assert_eq!(report.trades[0].price, fx("1400.9"));
        assert_eq!(report.trades[0].quantity, fx("1"));
        assert_eq!(report.trades[1].price, fx("1501"));
        assert_eq!(report.trades[1].quantity, fx("2"));
    }

    #[test]
    fn test_time_priority_within_level() {
        let (mut book, mut ledger, mut engine) = fixture();

        engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Ask, fx("1500"), fx("2"))
            .unwrap();
        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, fx("1500"), fx("2"))
            .unwrap();

        // Fills the earlier arrival completely before touching the later one
        let report = engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Bid, fx("1500"), fx("3"))
            .unwrap();

        assert_eq!(report.trades.len(), 2);
        assert_eq!(report.trades[0].seller, UserId::from("1"));
        assert_eq!(report.trades[0].quantity, fx("2"));
        assert_eq!(report.trades[1].seller, UserId::from("2"));
        assert_eq!(report.trades[1].quantity, fx("1"));
    }

    #[test]
    fn test_partial_fill_rests_remainder() {
        let (mut book, mut ledger, mut engine) = fixture();

        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, fx("1400"), fx("1"))
            .unwrap();
        let report = engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, fx("1400"), fx("3"))
            .unwrap();

        assert_eq!(report.filled, fx("1"));
        assert_eq!(report.remaining, fx("2"));

        // Remainder rests on the bid side at the limit price
        assert_eq!(book.best_bid(), Some(fx("1400")));
        assert!(book.best_ask().is_none());
    }

    #[test]
    fn test_partially_filled_resting_order_keeps_priority() {
        let (mut book, mut ledger, mut engine) = fixture();

        engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Ask, fx("1500"), fx("5"))
            .unwrap();
        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, fx("1500"), fx("5"))
            .unwrap();

        // Bite 2 off the first resting order
        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Bid, fx("1500"), fx("2"))
            .unwrap();

        // Next bid still hits the first order's remaining 3 before the second order
        let report = engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Bid, fx("1500"), fx("4"))
            .unwrap();

        assert_eq!(report.trades[0].seller, UserId::from("1"));
        assert_eq!(report.trades[0].quantity, fx("3"));
        assert_eq!(report.trades[1].seller, UserId::from("2"));
        assert_eq!(report.trades[1].quantity, fx("1"));
    }

    #[test]
    fn test_traded_unit_conserved_across_matches() {
        let (mut book, mut ledger, mut engine) = fixture();

        engine
            .submit(&mut book, &mut ledger, UserId::from("2"), Side::Ask, fx("1400.9"), fx("10"))
            .unwrap();
        engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, fx("1502"), fx("7"))
            .unwrap();
        engine
            .submit(&mut book, &mut ledger, UserId::from("1"), Side::Bid, fx("1502"), fx("3"))
            .unwrap();

        let b1 = ledger.balance_of(&UserId::from("1"));
        let b2 = ledger.balance_of(&UserId::from("2"));
        assert_eq!(b1.base + b2.base, dec("20"));
        assert_eq!(b1.quote + b2.quote, dec("100000"));
    }

    #[test]
    fn test_self_trade_not_prevented() {
        let (mut book, mut ledger, mut engine) = fixture();
        let user = UserId::from("1");

        engine
            .submit(&mut book, &mut ledger, user.clone(), Side::Ask, fx("1500"), fx("1"))
            .unwrap();
        let report = engine
            .submit(&mut book, &mut ledger, user.clone(), Side::Bid, fx("1500"), fx("1"))
            .unwrap();

        // The order matches against its owner's own resting order and the
        // two settlement legs cancel out
        assert_eq!(report.filled, fx("1"));
        let balances = ledger.balance_of(&user);
        assert_eq!(balances.base, dec("10"));
        assert_eq!(balances.quote, dec("50000"));
    }
}
