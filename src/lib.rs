//! # Exchange Core
//!
//! Single-instrument limit-order exchange: matching engine, balance ledger
//! and idempotent external-funding pipeline behind one single-writer facade.
//!
//! ## Architecture
//!
//! The core consists of:
//! - **Types**: Core data structures (Order, Trade, Market, fixed-point math)
//! - **OrderBook**: Price-time priority book with FIFO queues per level
//! - **Engine**: Matching and top-of-book quoting
//! - **Ledger**: Two-asset holdings with atomic trade settlement
//! - **Events**: Freshness-gated, exactly-once external funding credits
//! - **Exchange**: The engine thread and its cloneable handle
//! - **Wire**: JSON payload shapes for the transport layer
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: One engine thread owns all state; callers see
//!    consistent snapshots, never a half-applied submission
//! 2. **No Floating Point Internally**: Book math uses fixed-point
//!    arithmetic (10^8 scaling); ledger math uses exact decimals
//! 3. **Maker Price Settlement**: Fills always settle at the resting
//!    order's price
//! 4. **Explicit No-ops**: Unknown users and duplicate events are named
//!    outcomes, not errors

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Trade, Market, fixed-point math
pub mod types;

/// Order book: price-time priority levels
pub mod orderbook;

/// Matching engine and quoting
pub mod engine;

/// Balance ledger: two-asset holdings and settlement
pub mod ledger;

/// External funding events: admission and idempotent application
pub mod events;

/// Engine thread and caller-facing handle
pub mod exchange;

/// JSON payload shapes
pub mod wire;

/// Error taxonomy
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{MatchingEngine, SubmitReport};
pub use error::{ExchangeError, ValidationError};
pub use events::{ApplyOutcome, EventApplier, FreshnessPolicy, FundingEvent};
pub use exchange::{EventTicket, Exchange, ExchangeConfig};
pub use ledger::{Balances, Ledger};
pub use orderbook::{DepthSnapshot, OrderBook, PriceLevel};
pub use types::{Asset, Market, Order, Side, Trade, UserId};
