//! Market event taxonomy for the journal
//!
//! One event per order-book state change. `MatchCommitted` carries the
//! full trade so replay can rebuild the ledger without re-running the
//! matching logic.

use serde::{Deserialize, Serialize};
use types::ids::OrderId;
use types::order::Order;
use types::trade::Trade;

/// A journaled order-book state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// A new order was accepted into the book (ACTIVE).
    OrderPlaced { order: Order },

    /// An active order was cancelled by its owner.
    OrderCancelled { order_id: OrderId, timestamp: i64 },

    /// A bid/ask pair settled: both orders MATCHED, one trade recorded.
    MatchCommitted {
        bid_order_id: OrderId,
        ask_order_id: OrderId,
        trade: Trade,
    },
}

impl MarketEvent {
    /// Event type tag stored alongside the payload for diagnostics.
    pub fn event_type(&self) -> &'static str {
        match self {
            MarketEvent::OrderPlaced { .. } => "OrderPlaced",
            MarketEvent::OrderCancelled { .. } => "OrderCancelled",
            MarketEvent::MatchCommitted { .. } => "MatchCommitted",
        }
    }

    /// The instant the event took effect, in Unix nanos.
    pub fn timestamp(&self) -> i64 {
        match self {
            MarketEvent::OrderPlaced { order } => order.created_at,
            MarketEvent::OrderCancelled { timestamp, .. } => *timestamp,
            MarketEvent::MatchCommitted { trade, .. } => trade.executed_at,
        }
    }
}
