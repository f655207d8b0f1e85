//! Fixed-point price and quantity utilities.
//!
//! ## Overview
//!
//! All prices and quantities in the book use fixed-point representation to
//! keep matching deterministic. Values are stored as u64 scaled by 10^8.
//!
//! Settlement amounts (notionals, ledger holdings) use `rust_decimal::Decimal`
//! instead: they must be exact and they may go negative.
//!
//! ## Scale Factor
//!
//! We use a scale factor of 10^8 (100,000,000), providing 8 decimal places.
//! This is sufficient for most financial applications.
//!
//! ## Examples
//!
//! ```
//! use exchange_core::types::price::{to_fixed, from_fixed_trimmed};
//!
//! let price = to_fixed("1400.9").unwrap();
//! assert_eq!(price, 140_090_000_000);
//! assert_eq!(from_fixed_trimmed(price), "1400.9");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
///
/// This provides 8 decimal places of precision.
pub const SCALE: u64 = 100_000_000;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// # Returns
///
/// * `Some(u64)` - The fixed-point representation
/// * `None` - If parsing fails, or the value is negative or out of range
///
/// # Example
///
/// ```
/// use exchange_core::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("1501"), Some(150_100_000_000));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64
///
/// Returns `None` for negative values and values out of u64 range.
/// Fractional digits beyond the 8th are rounded.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    let rounded = scaled.round_dp(0);
    rounded.to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert an f64 (wire-layer number) to fixed-point u64
///
/// Goes through `Decimal::from_f64` so 1400.9 on the wire becomes exactly
/// 140_090_000_000 rather than picking up binary-float noise.
pub fn f64_to_fixed(value: f64) -> Option<u64> {
    let decimal = Decimal::from_f64(value)?;
    decimal_to_fixed(decimal)
}

/// Convert fixed-point u64 to an f64 for the wire layer
pub fn fixed_to_f64(value: u64) -> f64 {
    fixed_to_decimal(value).to_f64().unwrap_or(0.0)
}

/// Convert fixed-point u64 to a human-readable string (trimmed trailing zeros)
///
/// Used for depth level keys, which are decimal price strings.
///
/// # Example
///
/// ```
/// use exchange_core::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(140_090_000_000), "1400.9");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    format!("{}", fixed_to_decimal(value).normalize())
}

/// Exact notional value of a fill: price * quantity, as a Decimal
///
/// # Example
///
/// ```
/// use exchange_core::types::price::{notional, to_fixed};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let price = to_fixed("1400.9").unwrap();
/// let quantity = to_fixed("2").unwrap();
/// assert_eq!(notional(price, quantity), Decimal::from_str("2801.8").unwrap());
/// ```
pub fn notional(price: u64, quantity: u64) -> Decimal {
    fixed_to_decimal(price) * fixed_to_decimal(quantity)
}

// ============================================================================
// Unit Tests
// ============================================================================
