//! External funding events: freshness admission and exactly-once application.
//!
//! ## Delivery model
//!
//! The payment source delivers at-least-once: the same event can arrive
//! again on retry, and replays of old traffic must be rejected outright.
//! Two mechanisms cover this:
//!
//! - [`FreshnessPolicy::admit`] rejects events whose timestamp is outside
//!   the freshness window, before any processing.
//! - [`EventApplier::apply`] records each event id before crediting, so a
//!   redelivered id is a silent no-op ([`ApplyOutcome::Duplicate`]).
//!
//! The processed-id set is bounded: an id is remembered only while
//! [`FreshnessPolicy::admit`] could still accept a redelivery of it, and is
//! pruned on insert afterwards instead of accumulating forever.
//!
//! Signature verification and transport parsing belong to the collaborator
//! in front of the core; [`FundingEvent::from_webhook`] only decodes the
//! already-authenticated body, ignoring unrecognized event types and
//! unparseable payloads without raising.

use std::collections::HashMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::ExchangeError;
use crate::ledger::{CreditOutcome, Ledger};
use crate::types::{Asset, UserId};

/// Default freshness window for external events: 5 minutes.
pub const DEFAULT_FRESHNESS_WINDOW_MS: u64 = 300_000;

/// The one webhook event type that carries a funding credit.
const PAYMENT_SUCCEEDED: &str = "payment.succeeded";

// ============================================================================
// FundingEvent
// ============================================================================

/// An authenticated external funding event.
///
/// By the time one of these exists, signature verification has already
/// happened upstream; the core only sees the `{id, userId, amount}` tuple
/// plus the original timestamp for the freshness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingEvent {
    /// Source-assigned event id; the idempotency key
    pub id: String,

    /// User to credit
    pub user: UserId,

    /// Funding-currency amount to credit
    pub amount: Decimal,

    /// Event timestamp in milliseconds (from the delivery headers)
    pub timestamp_ms: u64,
}

/// Raw webhook body shape: `{id, type, data: {userId, amount}}`.
#[derive(Debug, Deserialize)]
struct WebhookPayload {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    #[serde(rename = "userId")]
    user_id: String,
    amount: f64,
}

impl FundingEvent {
    /// Decode a webhook body into a funding event.
    ///
    /// Returns `None` for unparseable bodies and unrecognized event types;
    /// both are ignored without error per the delivery contract.
    pub fn from_webhook(body: &str, timestamp_ms: u64) -> Option<Self> {
        let payload: WebhookPayload = match serde_json::from_str(body) {
            Ok(payload) => payload,
            Err(error) => {
                debug!(%error, "ignoring unparseable webhook body");
                return None;
            }
        };

        if payload.kind != PAYMENT_SUCCEEDED {
            debug!(kind = %payload.kind, "ignoring unrecognized event type");
            return None;
        }

        let amount = Decimal::from_f64(payload.data.amount)?;
        if amount <= Decimal::ZERO {
            debug!(event_id = %payload.id, %amount, "ignoring non-positive funding amount");
            return None;
        }
        Some(Self {
            id: payload.id,
            user: UserId::from(payload.data.user_id),
            amount,
            timestamp_ms,
        })
    }
}

// ============================================================================
// Freshness admission
// ============================================================================

/// Freshness window policy for external events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    /// Maximum allowed |now - timestamp| in milliseconds
    pub window_ms: u64,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_FRESHNESS_WINDOW_MS,
        }
    }
}

impl FreshnessPolicy {
    /// Admit or reject an event by timestamp, with no state change either way.
    pub fn admit(&self, event_id: &str, timestamp_ms: u64, now_ms: u64) -> Result<(), ExchangeError> {
        let age_ms = now_ms.abs_diff(timestamp_ms);
        if age_ms > self.window_ms {
            return Err(ExchangeError::StaleEvent {
                event_id: event_id.to_owned(),
                age_ms,
                window_ms: self.window_ms,
            });
        }
        Ok(())
    }
}

// ============================================================================
// EventApplier
// ============================================================================

/// Outcome of applying a funding event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// First sighting of this id; the ledger was credited
    Credited,
    /// Id already recorded; nothing was applied (idempotent no-op)
    Duplicate,
    /// Id recorded, but the user has no account; credit was a no-op
    UnknownUser,
}

/// Idempotency-tracked application of funding events to the ledger.
#[derive(Debug)]
pub struct EventApplier {
    policy: FreshnessPolicy,
    /// Applied event ids keyed for pruning. The value is the later of the
    /// event timestamp and the apply time: admission accepts skew in both
    /// directions, so a future-stamped event must be remembered past its
    /// own timestamp, not just past its apply time.
    processed: HashMap<String, u64>,
}

impl EventApplier {
    /// Create an applier with the given freshness policy
    pub fn new(policy: FreshnessPolicy) -> Self {
        Self {
            policy,
            processed: HashMap::new(),
        }
    }

    /// Number of event ids currently remembered
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Apply a funding event to the ledger, exactly once per event id.
    ///
    /// The id is recorded before the credit, matching the reference order
    /// of effects: a redelivery of an id that credited an unknown user is
    /// still a duplicate, not a second attempt.
    pub fn apply(&mut self, ledger: &mut Ledger, event: &FundingEvent, now_ms: u64) -> ApplyOutcome {
        self.prune(now_ms);

        if self.processed.contains_key(&event.id) {
            debug!(event_id = %event.id, "duplicate funding event suppressed");
            return ApplyOutcome::Duplicate;
        }
        self.processed
            .insert(event.id.clone(), event.timestamp_ms.max(now_ms));

        match ledger.credit_external(&event.user, Asset::Quote, event.amount) {
            CreditOutcome::Credited => {
                debug!(event_id = %event.id, user = %event.user, amount = %event.amount, "funding credit applied");
                ApplyOutcome::Credited
            }
            CreditOutcome::UnknownUser => ApplyOutcome::UnknownUser,
        }
    }

    /// Forget ids whose retention key has aged past the freshness window.
    ///
    /// Any redelivery of such an id would be rejected by admission before
    /// reaching apply, so the ids can no longer collide with live traffic.
    fn prune(&mut self, now_ms: u64) {
        let horizon = now_ms.saturating_sub(self.policy.window_ms);
        self.processed.retain(|_, retained_ms| *retained_ms >= horizon);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
