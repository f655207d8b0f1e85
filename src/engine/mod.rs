//! Matching and quoting.
//!
//! The matcher consumes incoming orders against the opposite side of the
//! book with price-time priority and settles every fill against the ledger;
//! the quote engine is its read-only top-of-book counterpart.

/// Order matching
pub mod matcher;

/// Top-of-book quoting
pub mod quote;

pub use matcher::{MatchingEngine, SubmitReport};
pub use quote::quote;
