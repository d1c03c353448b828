//! Order book queries
//!
//! The book is derived fresh from the order store's ACTIVE rows on every
//! query; no materialized book structure is kept. At marketplace scale a
//! listing carries a handful of live orders, so the derivation is cheap
//! and can never drift from the store.

use serde::Serialize;
use types::order::{Order, Side};

/// Point-in-time view of one listing's book.
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    /// All ACTIVE orders, sorted price-descending (display convention),
    /// FIFO within a price level.
    pub active_orders: Vec<Order>,
    /// Highest-priced active bid.
    pub best_bid: Option<Order>,
    /// Lowest-priced active ask.
    pub best_ask: Option<Order>,
}

impl BookView {
    /// Build a view from a listing's active orders.
    pub fn from_active(mut active_orders: Vec<Order>) -> Self {
        active_orders.sort_by(|a, b| b.price.cmp(&a.price).then(a.seq.cmp(&b.seq)));

        let best_bid = active_orders
            .iter()
            .filter(|o| o.side == Side::Bid)
            .max_by(|a, b| a.price.cmp(&b.price).then(b.seq.cmp(&a.seq)))
            .cloned();
        let best_ask = active_orders
            .iter()
            .filter(|o| o.side == Side::Ask)
            .min_by(|a, b| a.price.cmp(&b.price).then(a.seq.cmp(&b.seq)))
            .cloned();

        Self {
            active_orders,
            best_bid,
            best_ask,
        }
    }

    /// Both sides quoted and crossed or touching.
    pub fn is_crossed(&self) -> bool {
        match (&self.best_bid, &self.best_ask) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }
}
