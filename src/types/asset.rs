//! Asset and market definitions.
//!
//! The core trades exactly one instrument: a traded unit (base asset)
//! priced in a funding currency (quote asset). The `Market` struct carries
//! the two symbols; everything else in the crate refers to assets
//! structurally via [`Asset`].

use serde::{Deserialize, Serialize};

/// One of the two recognized assets of the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// The traded unit (e.g. "GOOGLE")
    Base,
    /// The funding currency (e.g. "USD")
    Quote,
}

/// Symbols for the single market this core serves.
///
/// Provisioned at construction; the core never creates markets.
///
/// # Example
///
/// ```
/// use exchange_core::types::{Asset, Market};
///
/// let market = Market::new("GOOGLE", "USD");
/// assert_eq!(market.symbol(Asset::Base), "GOOGLE");
/// assert_eq!(market.symbol(Asset::Quote), "USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Symbol of the traded unit
    pub base: String,
    /// Symbol of the funding currency
    pub quote: String,
}

impl Default for Market {
    /// The reference deployment's market
    fn default() -> Self {
        Self::new("GOOGLE", "USD")
    }
}

impl Market {
    /// Create a market from its two asset symbols
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Symbol for the given asset
    pub fn symbol(&self, asset: Asset) -> &str {
        match asset {
            Asset::Base => &self.base,
            Asset::Quote => &self.quote,
        }
    }
}
