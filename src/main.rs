//! Exchange Core - Demo Binary
//!
//! Spins up the engine thread, runs a small trading session against it and
//! prints the resulting state. Set `RUST_LOG=exchange_core=debug` to watch
//! the engine's structured logs alongside the output.

use exchange_core::types::price::to_fixed;
use exchange_core::wire::{BalanceResponse, DepthResponse, QuoteResponse};
use exchange_core::{
    Balances, Exchange, ExchangeConfig, FreshnessPolicy, FundingEvent, Market, Side, UserId,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let market = Market::default();
    let exchange = Exchange::start(ExchangeConfig {
        freshness: FreshnessPolicy::default(),
        accounts: vec![
            (UserId::from("1"), seed_balances()),
            (UserId::from("2"), seed_balances()),
        ],
    });

    println!("===========================================");
    println!("  Exchange Core - {}/{}", market.base, market.quote);
    println!("===========================================");
    println!();

    let fx = |s: &str| to_fixed(s).expect("literal price");

    println!("Seller 2 rests 10 @ 1400.9 and 5 @ 1501...");
    exchange
        .submit_order(UserId::from("2"), Side::Ask, fx("1400.9"), fx("10"))
        .expect("engine running");
    exchange
        .submit_order(UserId::from("2"), Side::Ask, fx("1501"), fx("5"))
        .expect("engine running");

    let quote = exchange.quote(Side::Bid, fx("2")).expect("engine running");
    println!(
        "Quote to buy 2: {}",
        serde_json::to_string(&QuoteResponse::from(quote)).expect("serializable")
    );

    println!("Buyer 1 bids 2 @ 1502...");
    let report = exchange
        .submit_order(UserId::from("1"), Side::Bid, fx("1502"), fx("2"))
        .expect("engine running");
    println!(
        "Filled {} (settled at the resting price, 1400.9)",
        report.filled as f64 / 100_000_000.0
    );
    for trade in &report.trades {
        println!("  trade #{}: {} -> {}", trade.id, trade.seller, trade.buyer);
    }
    println!();

    println!("Funding webhook credits user 1 with 2000 USD...");
    let body = r#"{"id":"evt_demo","type":"payment.succeeded","data":{"userId":"1","amount":2000}}"#;
    let event = FundingEvent::from_webhook(body, unix_millis()).expect("recognized event");
    let ticket = exchange.submit_funding_event(event).expect("fresh event");
    // Acknowledged; now wait for the credit to land before reading balances
    let outcome = ticket.wait().expect("engine running");
    println!("Applied: {outcome:?}");
    println!();

    let depth = exchange.depth().expect("engine running");
    println!(
        "Depth: {}",
        serde_json::to_string_pretty(&DepthResponse::from(&depth)).expect("serializable")
    );

    for user in ["1", "2"] {
        let balances = exchange
            .balance_of(UserId::from(user))
            .expect("engine running");
        println!(
            "Balances for {user}: {}",
            serde_json::to_string(&BalanceResponse::new(&market, &balances))
                .expect("serializable")
        );
    }
}

fn seed_balances() -> Balances {
    Balances::new(Decimal::from(10), Decimal::from(50_000))
}

fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
