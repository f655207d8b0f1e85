//! Error taxonomy for the exchange core.
//!
//! Three classes of failure exist, all rejected before any mutation:
//!
//! - [`ValidationError`]: bad side/price/quantity on submission or quote.
//! - Stale funding events (timestamp outside the freshness window).
//! - Authentication failures, produced by the collaborator that verifies
//!   webhook signatures before events reach the core.
//!
//! Unknown users, duplicate event ids and empty-book quotes are documented
//! no-ops by design, expressed as outcome enums in their modules, never as
//! errors.

use thiserror::Error;

/// Order/quote input validation failures.
///
/// Rejected before any mutation; no partial state change occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("price must be a positive number")]
    NonPositivePrice,

    #[error("quantity must be a positive number")]
    NonPositiveQuantity,

    #[error("unrecognized side: {0:?}")]
    UnknownSide(String),
}

/// Top-level error type for exchange operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Funding event timestamp is outside the freshness window.
    /// Rejected before any processing.
    #[error("stale event {event_id}: age {age_ms}ms exceeds window {window_ms}ms")]
    StaleEvent {
        event_id: String,
        age_ms: u64,
        window_ms: u64,
    },

    /// Signature mismatch, surfaced by the verifying collaborator.
    /// The core defines the variant but never produces it itself.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The engine thread has shut down and can no longer serve requests.
    #[error("exchange is closed")]
    Closed,
}
