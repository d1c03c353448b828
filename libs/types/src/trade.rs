//! Trade settlement types
//!
//! A trade is the immutable record of one completed match between a bid
//! and an ask. Trades are never mutated or deleted once created; a listing
//! may accumulate many over its lifetime as it is resold.

use crate::ids::{ListingId, OrderId, TradeId, UserId};
use crate::money::Price;
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// Immutable settlement record for one matched bid/ask pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    /// Ledger-monotonic sequence number.
    pub sequence: u64,
    pub listing_id: ListingId,

    pub buyer_id: UserId,
    pub seller_id: UserId,

    /// Settlement price: always the resting (maker) order's price.
    pub price: Price,

    // Back-references to the two orders, both MATCHED once this exists.
    pub bid_order_id: OrderId,
    pub ask_order_id: OrderId,

    /// Which side the newly submitted (taker) order was on.
    pub taker_side: Side,

    pub executed_at: i64, // Unix nanos
}

impl Trade {
    /// Create a new settlement record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        listing_id: ListingId,
        buyer_id: UserId,
        seller_id: UserId,
        price: Price,
        bid_order_id: OrderId,
        ask_order_id: OrderId,
        taker_side: Side,
        executed_at: i64,
    ) -> Self {
        Self {
            id: TradeId::new(),
            sequence,
            listing_id,
            buyer_id,
            seller_id,
            price,
            bid_order_id,
            ask_order_id,
            taker_side,
            executed_at,
        }
    }

    /// A trade between a user and themselves is an integrity violation.
    pub fn is_self_trade(&self) -> bool {
        self.buyer_id == self.seller_id
    }
}
