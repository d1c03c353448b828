//! Persistence service for the order-book core
//!
//! Write-ahead journal of market events with per-entry CRC32C checksums,
//! plus a corrupted-tail-tolerant reader and a recovery replay that
//! rebuilds order and trade state from the journal's valid prefix.
//!
//! Write-ahead ordering is the atomicity mechanism for match-and-settle:
//! events are committed to disk before any in-memory state is touched, so
//! a failed commit leaves no partial state and a crash mid-write is
//! detected and discarded on replay.

pub mod events;
pub mod journal;
pub mod recovery;

pub use events::MarketEvent;
pub use journal::{Journal, JournalEntry, JournalError};
pub use recovery::{recover, RecoveredState, RecoveryError};
