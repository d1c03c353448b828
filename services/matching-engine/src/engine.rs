//! Matching engine core
//!
//! Single entry point for order submission, cancellation, and book/history
//! queries. Each mutating operation runs inside its listing's critical
//! section and commits its events to the write-ahead journal BEFORE any
//! in-memory state changes, so a failed commit leaves nothing behind and
//! a crash replays to a consistent book.

use crate::book::BookView;
use crate::crossing;
use crate::directory::ListingDirectory;
use crate::locks::ListingLocks;
use crate::store::trades::PriceHistory;
use crate::store::{OrderStore, TradeLedger};
use persistence::{recover, Journal, MarketEvent};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use types::errors::MarketError;
use types::ids::{ListingId, OrderId, UserId};
use types::listing::Listing;
use types::money::Price;
use types::order::{Order, OrderState, Side};
use types::trade::Trade;

/// Result of submitting an order.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The submitted order, in its post-submission state.
    pub order: Order,
    /// Whether the order settled immediately against a resting counterpart.
    pub matched: bool,
    /// The settlement record, present iff `matched`.
    pub trade: Option<Trade>,
}

enum JournalBackend {
    /// In-memory only (tests, simulation).
    Disabled,
    File(Mutex<Journal>),
}

impl JournalBackend {
    fn commit(&self, events: &[MarketEvent]) -> Result<(), MarketError> {
        match self {
            JournalBackend::Disabled => Ok(()),
            JournalBackend::File(journal) => journal
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .commit(events)
                .map_err(|e| {
                    warn!(error = %e, "journal commit failed; operation aborted");
                    MarketError::Internal {
                        reason: format!("journal commit failed: {}", e),
                    }
                }),
        }
    }
}

/// The order book and matching engine for the whole marketplace.
///
/// Cheap to share: wrap in an `Arc` and call from any thread/task.
pub struct MatchEngine {
    listings: Arc<dyn ListingDirectory>,
    orders: OrderStore,
    trades: TradeLedger,
    locks: ListingLocks,
    journal: JournalBackend,
}

impl MatchEngine {
    /// Engine without durability (tests, simulation).
    pub fn in_memory(listings: Arc<dyn ListingDirectory>) -> Self {
        Self {
            listings,
            orders: OrderStore::new(),
            trades: TradeLedger::new(),
            locks: ListingLocks::new(),
            journal: JournalBackend::Disabled,
        }
    }

    /// Engine journaling to `dir`, recovering any state already there.
    pub fn with_journal(
        listings: Arc<dyn ListingDirectory>,
        dir: &Path,
    ) -> Result<Self, MarketError> {
        let recovered = recover(dir).map_err(|e| MarketError::Internal {
            reason: format!("recovery failed: {}", e),
        })?;
        if !recovered.orders.is_empty() || recovered.discarded_tail_bytes > 0 {
            info!(
                orders = recovered.orders.len(),
                trades = recovered.trades.len(),
                discarded_tail_bytes = recovered.discarded_tail_bytes,
                "recovered order book from journal"
            );
        }
        let journal =
            Journal::open(dir, recovered.next_event_sequence).map_err(|e| MarketError::Internal {
                reason: format!("journal open failed: {}", e),
            })?;
        Ok(Self {
            listings,
            orders: OrderStore::from_orders(recovered.orders),
            trades: TradeLedger::from_trades(recovered.trades),
            locks: ListingLocks::new(),
            journal: JournalBackend::File(Mutex::new(journal)),
        })
    }

    /// Submit a bid (buy intent) on a listing.
    pub fn submit_bid(
        &self,
        owner_id: UserId,
        listing_id: ListingId,
        price: Price,
    ) -> Result<SubmitOutcome, MarketError> {
        self.submit(owner_id, listing_id, Side::Bid, price)
    }

    /// Submit an ask (sell intent) on a listing.
    pub fn submit_ask(
        &self,
        owner_id: UserId,
        listing_id: ListingId,
        price: Price,
    ) -> Result<SubmitOutcome, MarketError> {
        self.submit(owner_id, listing_id, Side::Ask, price)
    }

    fn submit(
        &self,
        owner_id: UserId,
        listing_id: ListingId,
        side: Side,
        price: Price,
    ) -> Result<SubmitOutcome, MarketError> {
        let listing = self
            .listings
            .get(listing_id)
            .ok_or(MarketError::ListingNotFound { listing_id })?;

        // Sellers cannot bid up their own listing. The ask path carries
        // no such check: the original marketplace lets a seller re-ask
        // their own item, and that behavior is preserved as-is pending
        // product-owner confirmation.
        if side == Side::Bid && owner_id == listing.seller_id {
            return Err(MarketError::InvalidOperation {
                reason: "cannot bid on your own listing".to_string(),
            });
        }

        // Everything from the duplicate check to the state application
        // happens inside the listing's critical section; submissions and
        // cancellations for other listings proceed untouched.
        let lock = self.locks.acquire(listing_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self
            .orders
            .has_active_duplicate(listing_id, owner_id, side, price)
        {
            return Err(MarketError::Conflict {
                reason: "an identical active order already exists".to_string(),
            });
        }

        let now = now_nanos();
        let order = Order::new(self.orders.next_seq(), listing_id, owner_id, side, price, now);

        let counterpart = self
            .orders
            .best_counterpart(listing_id, side, owner_id)
            .filter(|resting| crossing::crosses(side, price, resting.price));

        match counterpart {
            Some(resting) => self.settle(&listing, order, resting, now),
            None => {
                self.journal.commit(&[MarketEvent::OrderPlaced {
                    order: order.clone(),
                }])?;
                self.orders.insert(order.clone());
                info!(
                    order_id = %order.id,
                    listing_id = %listing_id,
                    side = ?side,
                    price = %price,
                    "order resting"
                );
                Ok(SubmitOutcome {
                    order,
                    matched: false,
                    trade: None,
                })
            }
        }
    }

    /// Match-and-settle: one atomic unit covering the taker's placement,
    /// both MATCHED transitions, and the trade record.
    ///
    /// Caller holds the listing lock and has verified the cross.
    fn settle(
        &self,
        listing: &Listing,
        taker: Order,
        maker: Order,
        now: i64,
    ) -> Result<SubmitOutcome, MarketError> {
        let (bid, ask) = match taker.side {
            Side::Bid => (&taker, &maker),
            Side::Ask => (&maker, &taker),
        };

        // Settlement at the resting order's price: the maker keeps their
        // quote, the taker never does worse than their own limit.
        let trade = Trade::new(
            self.trades.next_seq(),
            listing.id,
            bid.owner_id,
            ask.owner_id,
            maker.price,
            bid.id,
            ask.id,
            taker.side,
            now,
        );

        self.journal.commit(&[
            MarketEvent::OrderPlaced {
                order: taker.clone(),
            },
            MarketEvent::MatchCommitted {
                bid_order_id: bid.id,
                ask_order_id: ask.id,
                trade: trade.clone(),
            },
        ])?;

        // Apply. Both transitions target orders this critical section
        // just observed ACTIVE, so the CAS cannot fail here.
        self.orders.insert(taker.clone());
        let taker = self
            .orders
            .transition_if_active(taker.id, OrderState::Matched, now)?;
        self.orders
            .transition_if_active(maker.id, OrderState::Matched, now)?;
        self.trades.record(trade.clone());

        info!(
            trade_id = %trade.id,
            listing_id = %listing.id,
            price = %trade.price,
            buyer = %trade.buyer_id,
            seller = %trade.seller_id,
            "trade settled"
        );

        Ok(SubmitOutcome {
            order: taker,
            matched: true,
            trade: Some(trade),
        })
    }

    /// Cancel an active order. Only the owner may cancel, and only while
    /// the order is still ACTIVE; a concurrent match wins or loses the
    /// race atomically, never both.
    pub fn cancel(&self, caller_id: UserId, order_id: OrderId) -> Result<Order, MarketError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(MarketError::OrderNotFound { order_id })?;

        if order.owner_id != caller_id {
            return Err(MarketError::Forbidden {
                reason: "only the order owner may cancel it".to_string(),
            });
        }

        let lock = self.locks.acquire(order.listing_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Re-read under the lock: the order may have matched or been
        // cancelled while we were acquiring it.
        let current = self
            .orders
            .get(order_id)
            .ok_or(MarketError::OrderNotFound { order_id })?;
        if !current.is_active() {
            return Err(MarketError::InvalidOperation {
                reason: format!("order {} is not active", order_id),
            });
        }

        let now = now_nanos();
        self.journal.commit(&[MarketEvent::OrderCancelled {
            order_id,
            timestamp: now,
        }])?;
        let cancelled = self
            .orders
            .transition_if_active(order_id, OrderState::Cancelled, now)?;

        info!(order_id = %order_id, listing_id = %cancelled.listing_id, "order cancelled");
        Ok(cancelled)
    }

    /// Current book for a listing, derived fresh from the order store.
    /// Unknown listings yield an empty book.
    pub fn book(&self, listing_id: ListingId) -> BookView {
        BookView::from_active(self.orders.active_for_listing(listing_id))
    }

    /// All of a user's orders across listings, newest first.
    pub fn orders_for_owner(&self, owner_id: UserId) -> Vec<Order> {
        self.orders.for_owner(owner_id)
    }

    /// One order by id.
    pub fn order(&self, order_id: OrderId) -> Option<Order> {
        self.orders.get(order_id)
    }

    /// Settled-trade history for a listing.
    pub fn history(&self, listing_id: ListingId) -> PriceHistory {
        self.trades.history(listing_id)
    }

    /// The listing directory this engine resolves against.
    pub fn listings(&self) -> &Arc<dyn ListingDirectory> {
        &self.listings
    }
}

fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or_default()
}
