//! Core data types: orders, trades, assets and fixed-point math.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset and market definitions
pub mod asset;

/// Order and side types
pub mod order;

/// Fixed-point price utilities
pub mod price;

/// Trade type
pub mod trade;

pub use asset::{Asset, Market};
pub use order::{Order, Side};
pub use trade::Trade;

/// User/account identifier.
///
/// Opaque string id; accounts are provisioned externally and the core only
/// looks them up, so the id carries no structure here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// View the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_owned())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
