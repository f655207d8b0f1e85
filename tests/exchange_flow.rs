//! End-to-end flows through the public `Exchange` handle.
//!
//! These exercise the full path a transport layer would take: wire-shaped
//! inputs, the engine thread, and the observable responses.

use std::str::FromStr;
use std::thread;

use rust_decimal::Decimal;

use exchange_core::types::price::to_fixed;
use exchange_core::wire::{DepthResponse, SubmitOrderRequest};
use exchange_core::{
    ApplyOutcome, Balances, Exchange, ExchangeConfig, ExchangeError, FreshnessPolicy,
    FundingEvent, Side, UserId,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn fx(s: &str) -> u64 {
    to_fixed(s).unwrap()
}

fn seeded_exchange() -> Exchange {
    Exchange::start(ExchangeConfig {
        freshness: FreshnessPolicy::default(),
        accounts: vec![
            (UserId::from("1"), Balances::new(dec("10"), dec("50000"))),
            (UserId::from("2"), Balances::new(dec("10"), dec("50000"))),
        ],
    })
}

fn event(id: &str, user: &str, amount: &str, ts: u64) -> FundingEvent {
    FundingEvent {
        id: id.to_owned(),
        user: UserId::from(user),
        amount: dec(amount),
        timestamp_ms: ts,
    }
}

#[test]
fn full_trading_session() {
    let exchange = seeded_exchange();

    // Seller rests liquidity on two levels
    exchange
        .submit_order(UserId::from("2"), Side::Ask, fx("1400.9"), fx("10"))
        .unwrap();
    exchange
        .submit_order(UserId::from("2"), Side::Ask, fx("1501"), fx("5"))
        .unwrap();

    // A quote for 2 prices the best ask only
    assert_eq!(exchange.quote(Side::Bid, fx("2")).unwrap(), dec("2801.8"));

    // Aggressive bid above both levels fills entirely at the best ask
    let report = exchange
        .submit_order(UserId::from("1"), Side::Bid, fx("1502"), fx("2"))
        .unwrap();
    assert_eq!(report.filled, fx("2"));
    assert_eq!(report.remaining, 0);
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].price, fx("1400.9"));

    // Settlement at the resting price, not the bid's limit
    let buyer = exchange.balance_of(UserId::from("1")).unwrap();
    assert_eq!(buyer.base, dec("12"));
    assert_eq!(buyer.quote, dec("47198.2"));
    let seller = exchange.balance_of(UserId::from("2")).unwrap();
    assert_eq!(seller.base, dec("8"));
    assert_eq!(seller.quote, dec("52801.8"));

    // Depth reflects the partial consumption of the best level
    let depth = exchange.depth().unwrap();
    assert_eq!(depth.get(&fx("1400.9")).unwrap().quantity, fx("8"));
    assert_eq!(depth.get(&fx("1501")).unwrap().quantity, fx("5"));

    // And serializes with trimmed decimal keys
    let response = serde_json::to_value(DepthResponse::from(&depth)).unwrap();
    assert_eq!(response["depth"]["1400.9"]["quantity"], 8.0);
    assert_eq!(response["depth"]["1501"]["type"], "ask");
}

#[test]
fn wire_request_drives_the_engine() {
    let exchange = seeded_exchange();

    let body = r#"{"side":"ask","price":1501,"quantity":5,"userId":"2"}"#;
    let request: SubmitOrderRequest = serde_json::from_str(body).unwrap();
    let (user, side, price, quantity) = request.parse().unwrap();

    let report = exchange.submit_order(user, side, price, quantity).unwrap();
    assert_eq!(report.filled, 0);
    assert_eq!(report.remaining, fx("5"));

    let depth = exchange.depth().unwrap();
    assert_eq!(depth.get(&fx("1501")).unwrap().quantity, fx("5"));
}

#[test]
fn funding_event_acknowledged_then_applied() {
    let exchange = seeded_exchange();

    let body =
        r#"{"id":"evt1","type":"payment.succeeded","data":{"userId":"1","amount":2000}}"#;
    let evt = FundingEvent::from_webhook(body, 1_000).unwrap();

    // Admission succeeds synchronously; the credit lands asynchronously
    let ticket = exchange.submit_funding_event_at(evt.clone(), 1_000).unwrap();
    assert_eq!(ticket.wait().unwrap(), ApplyOutcome::Credited);
    assert_eq!(
        exchange.balance_of(UserId::from("1")).unwrap().quote,
        dec("52000")
    );

    // Redelivery of the same id is acknowledged but applies nothing
    let ticket = exchange.submit_funding_event_at(evt, 2_000).unwrap();
    assert_eq!(ticket.wait().unwrap(), ApplyOutcome::Duplicate);
    assert_eq!(
        exchange.balance_of(UserId::from("1")).unwrap().quote,
        dec("52000")
    );
}

#[test]
fn stale_funding_event_never_reaches_the_ledger() {
    let exchange = seeded_exchange();

    let err = exchange
        .submit_funding_event_at(event("evt-old", "1", "2000", 0), 600_000)
        .unwrap_err();
    assert!(matches!(err, ExchangeError::StaleEvent { .. }));
    assert_eq!(
        exchange.balance_of(UserId::from("1")).unwrap().quote,
        dec("50000")
    );
}

#[test]
fn concurrent_redeliveries_credit_exactly_once() {
    let exchange = seeded_exchange();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let exchange = exchange.clone();
        handles.push(thread::spawn(move || {
            exchange
                .submit_funding_event_at(event("evt-race", "1", "2000", 1_000), 1_000)
                .unwrap()
                .wait()
                .unwrap()
        }));
    }

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let credited = outcomes
        .iter()
        .filter(|o| **o == ApplyOutcome::Credited)
        .count();
    assert_eq!(credited, 1, "exactly one delivery may credit");
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, ApplyOutcome::Credited | ApplyOutcome::Duplicate)));

    assert_eq!(
        exchange.balance_of(UserId::from("1")).unwrap().quote,
        dec("52000")
    );
}

#[test]
fn balances_are_conserved_across_a_busy_session() {
    let exchange = seeded_exchange();

    // Interleaved crossing orders in both directions
    for i in 0..20u64 {
        let (maker, taker) = if i % 2 == 0 { ("1", "2") } else { ("2", "1") };
        let (maker_side, taker_side) = if i % 2 == 0 {
            (Side::Bid, Side::Ask)
        } else {
            (Side::Ask, Side::Bid)
        };
        let price = fx("100") + i * fx("0.5");

        exchange
            .submit_order(UserId::from(maker), maker_side, price, fx("3"))
            .unwrap();
        exchange
            .submit_order(UserId::from(taker), taker_side, price, fx("2"))
            .unwrap();
    }

    let b1 = exchange.balance_of(UserId::from("1")).unwrap();
    let b2 = exchange.balance_of(UserId::from("2")).unwrap();
    assert_eq!(b1.base + b2.base, dec("20"));
    assert_eq!(b1.quote + b2.quote, dec("100000"));
}

#[test]
fn unknown_user_reads_are_zero_and_create_nothing() {
    let exchange = seeded_exchange();

    let balances = exchange.balance_of(UserId::from("404")).unwrap();
    assert_eq!(balances, Balances::zero());

    // A funding event for the unknown user is a recorded no-op
    let outcome = exchange
        .submit_funding_event_at(event("evt-404", "404", "2000", 1_000), 1_000)
        .unwrap()
        .wait()
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::UnknownUser);
    assert_eq!(
        exchange.balance_of(UserId::from("404")).unwrap(),
        Balances::zero()
    );
}
