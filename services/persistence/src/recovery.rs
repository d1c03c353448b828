//! Crash recovery: journal replay into order/trade state
//!
//! Reads the journal sequentially, verifying the CRC32C checksum of every
//! entry. A torn or corrupted tail (crash mid-write) is discarded with a
//! warning and the valid prefix wins; corruption in the middle of the
//! file aborts recovery instead, since silently skipping committed events
//! would replay an inconsistent book.

use crate::events::MarketEvent;
use crate::journal::{JournalEntry, JournalError, JOURNAL_FILE};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;
use types::ids::OrderId;
use types::order::{Order, OrderState};
use types::trade::Trade;

#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("corrupt entry before journal tail at byte offset {offset}: {detail}")]
    MidFileCorruption { offset: u64, detail: String },

    #[error("replay error at sequence {sequence}: {detail}")]
    Replay { sequence: u64, detail: String },
}

/// State rebuilt from the journal's valid prefix.
#[derive(Debug, Default)]
pub struct RecoveredState {
    /// Every order ever placed, in placement order, with its final state.
    pub orders: Vec<Order>,
    /// Every settled trade, in settlement order.
    pub trades: Vec<Trade>,
    /// Sequence the journal writer should continue from.
    pub next_event_sequence: u64,
    /// Number of tail bytes discarded as a torn write (0 when clean).
    pub discarded_tail_bytes: u64,
}

/// Replay the journal in `dir`. A missing journal file yields an empty
/// state, so first boot and recovery share one code path.
pub fn recover(dir: &Path) -> Result<RecoveredState, RecoveryError> {
    let path = dir.join(JOURNAL_FILE);
    if !path.exists() {
        return Ok(RecoveredState::default());
    }

    let data = fs::read(&path)?;
    let mut state = RecoveredState::default();
    let mut orders_by_id: HashMap<OrderId, usize> = HashMap::new();
    let mut pos: usize = 0;

    while pos < data.len() {
        let (entry, consumed) = match JournalEntry::from_bytes(&data[pos..]) {
            Ok(ok) => ok,
            Err(JournalError::Corrupt { detail, .. }) => {
                // A torn final write is expected after a crash; anything
                // before the tail is real corruption.
                state.discarded_tail_bytes = (data.len() - pos) as u64;
                warn!(
                    offset = pos,
                    discarded = state.discarded_tail_bytes,
                    %detail,
                    "discarding corrupt journal tail"
                );
                break;
            }
            Err(other) => return Err(other.into()),
        };

        if !entry.verify_checksum() {
            if is_tail_entry(&data, pos + consumed) {
                state.discarded_tail_bytes = (data.len() - pos) as u64;
                warn!(
                    offset = pos,
                    sequence = entry.sequence,
                    "discarding journal tail entry with bad checksum"
                );
                break;
            }
            return Err(RecoveryError::MidFileCorruption {
                offset: pos as u64,
                detail: format!("checksum mismatch at sequence {}", entry.sequence),
            });
        }

        apply(&mut state, &mut orders_by_id, &entry)?;
        state.next_event_sequence = entry.sequence + 1;
        pos += consumed;
    }

    Ok(state)
}

/// True when no complete entry follows `pos`, i.e. the current entry is
/// the last thing in the file and may legitimately be torn.
fn is_tail_entry(data: &[u8], pos: usize) -> bool {
    pos >= data.len() || JournalEntry::from_bytes(&data[pos..]).is_err()
}

fn apply(
    state: &mut RecoveredState,
    orders_by_id: &mut HashMap<OrderId, usize>,
    entry: &JournalEntry,
) -> Result<(), RecoveryError> {
    let replay_err = |detail: String| RecoveryError::Replay {
        sequence: entry.sequence,
        detail,
    };

    match entry.event().map_err(RecoveryError::Journal)? {
        MarketEvent::OrderPlaced { order } => {
            if orders_by_id.contains_key(&order.id) {
                return Err(replay_err(format!("order {} placed twice", order.id)));
            }
            orders_by_id.insert(order.id, state.orders.len());
            state.orders.push(order);
        }
        MarketEvent::OrderCancelled {
            order_id,
            timestamp,
        } => {
            let idx = *orders_by_id
                .get(&order_id)
                .ok_or_else(|| replay_err(format!("cancel of unknown order {}", order_id)))?;
            state.orders[idx]
                .transition(OrderState::Cancelled, timestamp)
                .map_err(|e| replay_err(e.to_string()))?;
        }
        MarketEvent::MatchCommitted {
            bid_order_id,
            ask_order_id,
            trade,
        } => {
            for order_id in [bid_order_id, ask_order_id] {
                let idx = *orders_by_id
                    .get(&order_id)
                    .ok_or_else(|| replay_err(format!("match of unknown order {}", order_id)))?;
                state.orders[idx]
                    .transition(OrderState::Matched, trade.executed_at)
                    .map_err(|e| replay_err(e.to_string()))?;
            }
            state.trades.push(trade);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Journal;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::TempDir;
    use types::ids::{ListingId, UserId};
    use types::money::Price;
    use types::order::Side;

    fn order(seq: u64, side: Side, price: u64) -> Order {
        Order::new(
            seq,
            ListingId::new(),
            UserId::new(),
            side,
            Price::from_u64(price),
            1_754_000_000_000_000_000 + seq as i64,
        )
    }

    fn trade_for(bid: &Order, ask: &Order, sequence: u64) -> Trade {
        Trade::new(
            sequence,
            bid.listing_id,
            bid.owner_id,
            ask.owner_id,
            ask.price,
            bid.id,
            ask.id,
            Side::Bid,
            bid.created_at + 1,
        )
    }

    #[test]
    fn test_recover_missing_journal_is_empty() {
        let tmp = TempDir::new().unwrap();
        let state = recover(tmp.path()).unwrap();
        assert!(state.orders.is_empty());
        assert!(state.trades.is_empty());
        assert_eq!(state.next_event_sequence, 0);
    }

    #[test]
    fn test_recover_replays_placements_and_cancel() {
        let tmp = TempDir::new().unwrap();
        let placed = order(1, Side::Bid, 150);
        {
            let mut journal = Journal::open(tmp.path(), 0).unwrap();
            journal
                .commit(&[MarketEvent::OrderPlaced {
                    order: placed.clone(),
                }])
                .unwrap();
            journal
                .commit(&[MarketEvent::OrderCancelled {
                    order_id: placed.id,
                    timestamp: placed.created_at + 5,
                }])
                .unwrap();
        }

        let state = recover(tmp.path()).unwrap();
        assert_eq!(state.orders.len(), 1);
        assert_eq!(state.orders[0].state, OrderState::Cancelled);
        assert_eq!(state.orders[0].updated_at, placed.created_at + 5);
        assert_eq!(state.next_event_sequence, 2);
        assert_eq!(state.discarded_tail_bytes, 0);
    }

    #[test]
    fn test_recover_replays_match() {
        let tmp = TempDir::new().unwrap();
        let ask = order(1, Side::Ask, 150);
        let mut bid = order(2, Side::Bid, 150);
        bid.listing_id = ask.listing_id;
        let trade = trade_for(&bid, &ask, 1);

        {
            let mut journal = Journal::open(tmp.path(), 0).unwrap();
            journal
                .commit(&[MarketEvent::OrderPlaced { order: ask.clone() }])
                .unwrap();
            journal
                .commit(&[
                    MarketEvent::OrderPlaced { order: bid.clone() },
                    MarketEvent::MatchCommitted {
                        bid_order_id: bid.id,
                        ask_order_id: ask.id,
                        trade: trade.clone(),
                    },
                ])
                .unwrap();
        }

        let state = recover(tmp.path()).unwrap();
        assert_eq!(state.orders.len(), 2);
        assert!(state.orders.iter().all(|o| o.state == OrderState::Matched));
        assert_eq!(state.trades, vec![trade]);
        assert_eq!(state.next_event_sequence, 3);
    }

    #[test]
    fn test_recover_discards_torn_tail() {
        let tmp = TempDir::new().unwrap();
        {
            let mut journal = Journal::open(tmp.path(), 0).unwrap();
            journal
                .commit(&[MarketEvent::OrderPlaced {
                    order: order(1, Side::Bid, 150),
                }])
                .unwrap();
        }
        // Simulate a crash mid-write: append half an entry.
        let path = tmp.path().join(JOURNAL_FILE);
        let torn = JournalEntry::from_event(
            1,
            &MarketEvent::OrderPlaced {
                order: order(2, Side::Ask, 200),
            },
        )
        .unwrap()
        .to_bytes();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&torn[..torn.len() / 2]).unwrap();

        let state = recover(tmp.path()).unwrap();
        assert_eq!(state.orders.len(), 1);
        assert!(state.discarded_tail_bytes > 0);
        assert_eq!(state.next_event_sequence, 1);
    }

    #[test]
    fn test_recover_rejects_mid_file_corruption() {
        let tmp = TempDir::new().unwrap();
        {
            let mut journal = Journal::open(tmp.path(), 0).unwrap();
            journal
                .commit(&[
                    MarketEvent::OrderPlaced {
                        order: order(1, Side::Bid, 150),
                    },
                    MarketEvent::OrderPlaced {
                        order: order(2, Side::Ask, 200),
                    },
                ])
                .unwrap();
        }
        // Flip a payload byte inside the FIRST entry; the second entry
        // is still intact behind it.
        let path = tmp.path().join(JOURNAL_FILE);
        let mut data = fs::read(&path).unwrap();
        data[40] ^= 0xFF;
        fs::write(&path, &data).unwrap();

        let result = recover(tmp.path());
        assert!(matches!(
            result,
            Err(RecoveryError::MidFileCorruption { .. })
        ));
    }

    #[test]
    fn test_recovered_sequence_continues_journal() {
        let tmp = TempDir::new().unwrap();
        {
            let mut journal = Journal::open(tmp.path(), 0).unwrap();
            journal
                .commit(&[MarketEvent::OrderPlaced {
                    order: order(1, Side::Bid, 150),
                }])
                .unwrap();
        }

        let state = recover(tmp.path()).unwrap();
        let journal = Journal::open(tmp.path(), state.next_event_sequence).unwrap();
        assert_eq!(journal.next_sequence(), 1);
    }
}
