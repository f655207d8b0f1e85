//! JSON request/response shapes for the transport layer.
//!
//! Numbers cross the wire as JSON numbers and are bridged to the internal
//! representations here: prices and quantities to fixed-point `u64`,
//! holdings and quotes back out through `f64`. Depth keys are decimal
//! strings with trailing zeros trimmed ("1400.9", not "1400.90000000").
//!
//! The HTTP/webhook surface itself lives outside this crate; these types
//! only pin down the payload shapes it exchanges with the core.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::SubmitReport;
use crate::error::ValidationError;
use crate::ledger::Balances;
use crate::orderbook::DepthSnapshot;
use crate::types::price::{f64_to_fixed, fixed_to_f64, from_fixed_trimmed};
use crate::types::{Market, Side, UserId};

// ============================================================================
// Order submission
// ============================================================================

/// `POST /order` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    pub side: String,
    pub price: f64,
    pub quantity: f64,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl SubmitOrderRequest {
    /// Validate and convert to the core's typed arguments.
    pub fn parse(&self) -> Result<(UserId, Side, u64, u64), ValidationError> {
        let side = parse_side(&self.side)?;
        let price = f64_to_fixed(self.price)
            .filter(|fixed| *fixed > 0)
            .ok_or(ValidationError::NonPositivePrice)?;
        let quantity = f64_to_fixed(self.quantity)
            .filter(|fixed| *fixed > 0)
            .ok_or(ValidationError::NonPositiveQuantity)?;
        Ok((UserId::from(self.user_id.as_str()), side, price, quantity))
    }
}

/// `POST /order` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderResponse {
    #[serde(rename = "filledQuantity")]
    pub filled_quantity: f64,
}

impl From<&SubmitReport> for SubmitOrderResponse {
    fn from(report: &SubmitReport) -> Self {
        Self {
            filled_quantity: fixed_to_f64(report.filled),
        }
    }
}

// ============================================================================
// Depth
// ============================================================================

/// One aggregated price level in the depth response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthLevelEntry {
    #[serde(rename = "type")]
    pub side: Side,
    pub quantity: f64,
}

/// `GET /depth` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthResponse {
    pub depth: BTreeMap<String, DepthLevelEntry>,
}

impl From<&DepthSnapshot> for DepthResponse {
    fn from(snapshot: &DepthSnapshot) -> Self {
        let depth = snapshot
            .iter()
            .map(|(price, level)| {
                let entry = DepthLevelEntry {
                    side: level.side,
                    quantity: fixed_to_f64(level.quantity),
                };
                (from_fixed_trimmed(*price), entry)
            })
            .collect();
        Self { depth }
    }
}

// ============================================================================
// Balances
// ============================================================================

/// `GET /balance` response body: holdings keyed by asset symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balances: BTreeMap<String, f64>,
}

impl BalanceResponse {
    /// Render holdings under the market's asset symbols.
    pub fn new(market: &Market, balances: &Balances) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(market.base.clone(), decimal_to_f64(balances.base));
        entries.insert(market.quote.clone(), decimal_to_f64(balances.quote));
        Self { balances: entries }
    }
}

// ============================================================================
// Quote
// ============================================================================

/// `POST /quote` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub side: String,
    pub quantity: f64,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl QuoteRequest {
    /// Validate and convert to the core's typed arguments.
    pub fn parse(&self) -> Result<(Side, u64), ValidationError> {
        let side = parse_side(&self.side)?;
        let quantity = f64_to_fixed(self.quantity)
            .filter(|fixed| *fixed > 0)
            .ok_or(ValidationError::NonPositiveQuantity)?;
        Ok((side, quantity))
    }
}

/// `POST /quote` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: f64,
}

impl From<Decimal> for QuoteResponse {
    fn from(quote: Decimal) -> Self {
        Self {
            quote: decimal_to_f64(quote),
        }
    }
}

fn parse_side(raw: &str) -> Result<Side, ValidationError> {
    match raw {
        "bid" => Ok(Side::Bid),
        "ask" => Ok(Side::Ask),
        other => Err(ValidationError::UnknownSide(other.to_owned())),
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

// ============================================================================
// Unit Tests
// ============================================================================
