//! Trade ledger
//!
//! Immutable, append-only record of settled trades with per-listing
//! queries and price statistics for the history endpoint. Nothing here
//! is ever mutated or deleted once appended.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use types::ids::ListingId;
use types::money::Price;
use types::trade::Trade;

/// How many trades the history endpoint returns at most.
pub const HISTORY_CAP: usize = 50;

/// Aggregate price statistics over a listing's settled trades.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStats {
    pub count: u64,
    pub avg: Option<Decimal>,
    pub min: Option<Price>,
    pub max: Option<Price>,
}

impl TradeStats {
    fn empty() -> Self {
        Self {
            count: 0,
            avg: None,
            min: None,
            max: None,
        }
    }
}

/// Price history for one listing.
#[derive(Debug, Clone, Serialize)]
pub struct PriceHistory {
    /// Most recent first, capped at [`HISTORY_CAP`].
    pub trades: Vec<Trade>,
    pub stats: TradeStats,
    pub last_trade: Option<Trade>,
}

#[derive(Default)]
struct Indexed {
    trades: Vec<Trade>,
    by_listing: HashMap<ListingId, Vec<usize>>,
}

/// Thread-safe append-only trade ledger.
#[derive(Default)]
pub struct TradeLedger {
    inner: RwLock<Indexed>,
    next_sequence: AtomicU64,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from recovered trades (journal replay).
    pub fn from_trades(trades: Vec<Trade>) -> Self {
        let ledger = Self::new();
        let mut max_sequence = 0;
        {
            let mut inner = ledger.write();
            for trade in trades {
                max_sequence = max_sequence.max(trade.sequence);
                index_append(&mut inner, trade);
            }
        }
        ledger.next_sequence.store(max_sequence + 1, Ordering::SeqCst);
        ledger
    }

    fn read(&self) -> RwLockReadGuard<'_, Indexed> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Indexed> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the next ledger sequence number.
    pub fn next_seq(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::SeqCst)
    }

    /// Append a settled trade.
    pub fn record(&self, trade: Trade) {
        let mut inner = self.write();
        index_append(&mut inner, trade);
    }

    /// Price history for a listing: recent trades (newest first, capped),
    /// aggregate stats over ALL of the listing's trades, and the most
    /// recent trade. Unknown listings yield an empty history.
    pub fn history(&self, listing_id: ListingId) -> PriceHistory {
        let inner = self.read();
        let indices = match inner.by_listing.get(&listing_id) {
            Some(indices) => indices,
            None => {
                return PriceHistory {
                    trades: Vec::new(),
                    stats: TradeStats::empty(),
                    last_trade: None,
                }
            }
        };

        let all: Vec<&Trade> = indices.iter().map(|&i| &inner.trades[i]).collect();

        let count = all.len() as u64;
        let sum: Decimal = all.iter().map(|t| t.price.as_decimal()).sum();
        let avg = (count > 0).then(|| {
            (sum / Decimal::from(count))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        });
        let min = all.iter().map(|t| t.price).min();
        let max = all.iter().map(|t| t.price).max();

        // Appended in settlement order, so the newest is the last index.
        let trades: Vec<Trade> = all.iter().rev().take(HISTORY_CAP).map(|t| (*t).clone()).collect();
        let last_trade = trades.first().cloned();

        PriceHistory {
            trades,
            stats: TradeStats {
                count,
                avg,
                min,
                max,
            },
            last_trade,
        }
    }

    /// All trades ever settled, in settlement order.
    pub fn all(&self) -> Vec<Trade> {
        self.read().trades.clone()
    }

    /// Total number of settled trades.
    pub fn len(&self) -> usize {
        self.read().trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn index_append(inner: &mut Indexed, trade: Trade) {
    let idx = inner.trades.len();
    inner.by_listing.entry(trade.listing_id).or_default().push(idx);
    inner.trades.push(trade);
}
