//! Order lifecycle types
//!
//! An order is a buy or sell intent on one listing: all-or-nothing,
//! unit-quantity, matched at most once.

use crate::errors::MarketError;
use crate::ids::{ListingId, OrderId, UserId};
use crate::money::Price;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller intent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order
    Bid,
    /// Sell order
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// Order lifecycle state.
///
/// Transitions are monotonic: `ACTIVE → {MATCHED | CANCELLED}`.
/// Terminal states never revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderState {
    /// Resting in the book, eligible for matching or cancellation
    Active,
    /// Settled into a trade (terminal)
    Matched,
    /// Withdrawn by its owner (terminal)
    Cancelled,
}

impl OrderState {
    /// Check if the state is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Matched | OrderState::Cancelled)
    }
}

/// A bid or ask resting in (or retired from) a listing's book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub listing_id: ListingId,
    pub owner_id: UserId,
    pub side: Side,
    pub price: Price,
    pub state: OrderState,
    /// Store-assigned submission sequence; FIFO tie-break within a price
    /// level, stable even when two orders share a timestamp.
    pub seq: u64,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
}

impl Order {
    /// Create a new active order.
    pub fn new(
        seq: u64,
        listing_id: ListingId,
        owner_id: UserId,
        side: Side,
        price: Price,
        timestamp: i64,
    ) -> Self {
        Self {
            id: OrderId::new(),
            listing_id,
            owner_id,
            side,
            price,
            state: OrderState::Active,
            seq,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Check if the order is still eligible for matching/cancellation.
    pub fn is_active(&self) -> bool {
        self.state == OrderState::Active
    }

    /// Transition to a terminal state.
    ///
    /// Errors with `InvalidOperation` if the order is not ACTIVE or the
    /// target state is not terminal; terminal states never revert.
    pub fn transition(&mut self, next: OrderState, timestamp: i64) -> Result<(), MarketError> {
        if !self.is_active() {
            return Err(MarketError::InvalidOperation {
                reason: format!("order {} is not active", self.id),
            });
        }
        if !next.is_terminal() {
            return Err(MarketError::InvalidOperation {
                reason: format!("cannot transition an active order to {:?}", next),
            });
        }
        self.state = next;
        self.updated_at = timestamp;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_754_000_000_000_000_000;

    fn sample_order(side: Side) -> Order {
        Order::new(
            1,
            ListingId::new(),
            UserId::new(),
            side,
            Price::from_u64(150),
            T0,
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn test_new_order_is_active() {
        let order = sample_order(Side::Bid);
        assert!(order.is_active());
        assert!(!order.state.is_terminal());
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_transition_to_matched() {
        let mut order = sample_order(Side::Bid);
        order.transition(OrderState::Matched, T0 + 1).unwrap();
        assert_eq!(order.state, OrderState::Matched);
        assert_eq!(order.updated_at, T0 + 1);
    }

    #[test]
    fn test_transition_to_cancelled() {
        let mut order = sample_order(Side::Ask);
        order.transition(OrderState::Cancelled, T0 + 1).unwrap();
        assert_eq!(order.state, OrderState::Cancelled);
    }

    #[test]
    fn test_terminal_states_never_revert() {
        let mut order = sample_order(Side::Bid);
        order.transition(OrderState::Matched, T0 + 1).unwrap();

        let err = order.transition(OrderState::Cancelled, T0 + 2).unwrap_err();
        assert!(matches!(err, MarketError::InvalidOperation { .. }));
        assert_eq!(order.state, OrderState::Matched);
    }

    #[test]
    fn test_active_is_not_a_transition_target() {
        let mut order = sample_order(Side::Bid);
        assert!(order.transition(OrderState::Active, T0 + 1).is_err());
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Bid).unwrap(), "\"BID\"");
        assert_eq!(serde_json::to_string(&Side::Ask).unwrap(), "\"ASK\"");
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&OrderState::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = sample_order(Side::Ask);
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
