//! Order book: price-ordered sides with FIFO price levels.

/// Order book for a single instrument
pub mod book;

/// Price level (FIFO queue of orders at one price)
pub mod level;

pub use book::{DepthLevel, DepthSnapshot, OrderBook};
pub use level::PriceLevel;
