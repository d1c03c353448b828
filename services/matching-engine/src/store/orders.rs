//! Order store
//!
//! Record of every bid/ask order with lifecycle state, indexed by listing
//! and by owner. All mutation goes through insert + compare-and-swap
//! transitions; the engine's per-listing critical section decides WHICH
//! transitions happen, the store guarantees each happens at most once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use types::errors::MarketError;
use types::ids::{ListingId, OrderId, UserId};
use types::money::Price;
use types::order::{Order, OrderState, Side};

#[derive(Default)]
struct Indexed {
    orders: HashMap<OrderId, Order>,
    by_listing: HashMap<ListingId, Vec<OrderId>>,
    by_owner: HashMap<UserId, Vec<OrderId>>,
}

/// Thread-safe order store.
#[derive(Default)]
pub struct OrderStore {
    inner: RwLock<Indexed>,
    next_seq: AtomicU64,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from recovered orders (journal replay).
    pub fn from_orders(orders: Vec<Order>) -> Self {
        let store = Self::new();
        let mut max_seq = 0;
        {
            let mut inner = store.write();
            for order in orders {
                max_seq = max_seq.max(order.seq);
                index_insert(&mut inner, order);
            }
        }
        store.next_seq.store(max_seq + 1, Ordering::SeqCst);
        store
    }

    // A poisoned lock means a writer panicked; the indexes are only
    // touched through complete, non-panicking updates, so the data is
    // still coherent and we keep serving.
    fn read(&self) -> RwLockReadGuard<'_, Indexed> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Indexed> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the next submission sequence number.
    pub fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Insert a freshly created order.
    pub fn insert(&self, order: Order) {
        let mut inner = self.write();
        index_insert(&mut inner, order);
    }

    /// Fetch a snapshot of one order.
    pub fn get(&self, order_id: OrderId) -> Option<Order> {
        self.read().orders.get(&order_id).cloned()
    }

    /// Compare-and-swap transition: succeeds only if the order is still
    /// ACTIVE at write time. Exactly-once settlement hinges on this.
    pub fn transition_if_active(
        &self,
        order_id: OrderId,
        next: OrderState,
        timestamp: i64,
    ) -> Result<Order, MarketError> {
        let mut inner = self.write();
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or(MarketError::OrderNotFound { order_id })?;
        order.transition(next, timestamp)?;
        Ok(order.clone())
    }

    /// True if an ACTIVE order with the identical
    /// (listing, owner, side, price) tuple exists.
    pub fn has_active_duplicate(
        &self,
        listing_id: ListingId,
        owner_id: UserId,
        side: Side,
        price: Price,
    ) -> bool {
        let inner = self.read();
        let found = iter_listing(&inner, listing_id).any(|o| {
            o.state == OrderState::Active
                && o.owner_id == owner_id
                && o.side == side
                && o.price == price
        });
        found
    }

    /// Best eligible counterpart for an incoming order: ACTIVE, opposite
    /// side, not owned by the submitter; best price first (lowest ask /
    /// highest bid), FIFO by submission sequence within a price level.
    pub fn best_counterpart(
        &self,
        listing_id: ListingId,
        incoming_side: Side,
        submitter: UserId,
    ) -> Option<Order> {
        let inner = self.read();
        let wanted = incoming_side.opposite();
        iter_listing(&inner, listing_id)
            .filter(|o| o.state == OrderState::Active && o.side == wanted && o.owner_id != submitter)
            .min_by(|a, b| match wanted {
                // Lowest ask is best; highest bid is best. Ties go to the
                // earlier submission.
                Side::Ask => a.price.cmp(&b.price).then(a.seq.cmp(&b.seq)),
                Side::Bid => b.price.cmp(&a.price).then(a.seq.cmp(&b.seq)),
            })
            .cloned()
    }

    /// All ACTIVE orders for a listing, unsorted.
    pub fn active_for_listing(&self, listing_id: ListingId) -> Vec<Order> {
        let inner = self.read();
        iter_listing(&inner, listing_id)
            .filter(|o| o.state == OrderState::Active)
            .cloned()
            .collect()
    }

    /// Every order a user has ever submitted, newest first.
    pub fn for_owner(&self, owner_id: UserId) -> Vec<Order> {
        let inner = self.read();
        let mut orders: Vec<Order> = inner
            .by_owner
            .get(&owner_id)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.orders.get(id))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.seq.cmp(&a.seq));
        orders
    }

    /// Total number of orders ever stored.
    pub fn len(&self) -> usize {
        self.read().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn index_insert(inner: &mut Indexed, order: Order) {
    inner
        .by_listing
        .entry(order.listing_id)
        .or_default()
        .push(order.id);
    inner
        .by_owner
        .entry(order.owner_id)
        .or_default()
        .push(order.id);
    inner.orders.insert(order.id, order);
}

fn iter_listing(inner: &Indexed, listing_id: ListingId) -> impl Iterator<Item = &Order> {
    inner
        .by_listing
        .get(&listing_id)
        .into_iter()
        .flatten()
        .filter_map(|id| inner.orders.get(id))
}
