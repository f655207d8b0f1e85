//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` holds every resting order at a single price point in a
//! FIFO queue: new orders are appended at the back, matching consumes from
//! the front. Together with the price-ordered maps in the book this gives
//! price-time priority.
//!
//! With no order cancellation in scope, nothing is ever removed from the
//! middle of the queue, so a plain `VecDeque` is all the structure needed.

use std::collections::VecDeque;

use crate::types::Order;

/// A price level containing orders at a single price.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// FIFO queue of resting orders (front = oldest = next to match)
    orders: VecDeque<Order>,

    /// Total remaining quantity at this level
    /// Updated as orders are added and filled
    total_quantity: u64,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of resting orders at this level
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Total remaining quantity at this level
    #[inline]
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Append an order at the back of the queue (time priority)
    pub fn push_back(&mut self, order: Order) {
        self.total_quantity = self.total_quantity.saturating_add(order.quantity);
        self.orders.push_back(order);
    }

    /// Peek at the front order (oldest, next to match)
    #[inline]
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Fill the front order by up to `fill_qty`.
    ///
    /// Removes the order from the queue when it is exhausted; a partially
    /// filled order stays at the front of its priority class.
    ///
    /// # Returns
    ///
    /// The filled (order) if it became fully filled and was removed,
    /// otherwise `None`. The actual fill amount is `fill_qty.min(front)`
    /// and the caller computes it the same way beforehand.
    pub fn fill_front(&mut self, fill_qty: u64) -> Option<Order> {
        let front = self.orders.front_mut()?;
        let filled = front.fill(fill_qty);
        self.total_quantity = self.total_quantity.saturating_sub(filled);

        if front.is_filled() {
            self.orders.pop_front()
        } else {
            None
        }
    }

    /// Iterate the resting orders in priority order (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
