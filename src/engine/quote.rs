//! Top-of-book price estimation.
//!
//! The quote is deliberately single-level: `best opposite price * quantity`,
//! even when the top level's resting quantity cannot cover the requested
//! size. Walking deeper levels (VWAP quoting) is out of scope.

use rust_decimal::Decimal;

use crate::orderbook::OrderBook;
use crate::types::price::notional;
use crate::types::Side;

/// Estimate the cost of `quantity` at the top of the opposite book.
///
/// For `Side::Bid` (caller wants to buy) this is `best ask * quantity`;
/// for `Side::Ask` it is `best bid * quantity`. An empty opposite side
/// quotes zero rather than failing - a documented reference behavior, kept
/// as-is (an explicit "no liquidity" outcome is an open redesign question).
pub fn quote(book: &OrderBook, side: Side, quantity: u64) -> Decimal {
    match book.best_price(side.opposite()) {
        Some(top) => notional(top, quantity),
        None => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::to_fixed;
    use crate::types::UserId;
    use std::str::FromStr;

    fn fx(s: &str) -> u64 {
        to_fixed(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_quote_uses_best_opposite_level() {
        let mut book = OrderBook::new();
        book.insert(UserId::from("2"), Side::Ask, fx("1400.9"), fx("10"));
        book.insert(UserId::from("2"), Side::Ask, fx("1501"), fx("5"));

        assert_eq!(quote(&book, Side::Bid, fx("2")), dec("2801.8"));
    }

    #[test]
    fn test_quote_does_not_walk_deeper_levels() {
        let mut book = OrderBook::new();
        book.insert(UserId::from("2"), Side::Ask, fx("1400.9"), fx("1"));
        book.insert(UserId::from("2"), Side::Ask, fx("1501"), fx("100"));

        // Requested size exceeds the top level; still top price * quantity
        assert_eq!(quote(&book, Side::Bid, fx("50")), dec("70045"));
    }

    #[test]
    fn test_quote_ask_side_uses_best_bid() {
        let mut book = OrderBook::new();
        book.insert(UserId::from("1"), Side::Bid, fx("1400.1"), fx("1"));
        book.insert(UserId::from("1"), Side::Bid, fx("1399"), fx("9"));

        assert_eq!(quote(&book, Side::Ask, fx("3")), dec("4200.3"));
    }

    #[test]
    fn test_quote_empty_book_is_zero() {
        let book = OrderBook::new();
        assert_eq!(quote(&book, Side::Bid, fx("2")), Decimal::ZERO);
        assert_eq!(quote(&book, Side::Ask, fx("2")), Decimal::ZERO);
    }
}
