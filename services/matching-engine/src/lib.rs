//! Matching engine for the sneaker marketplace
//!
//! Accepts bid/ask submissions, maintains per-listing order books, detects
//! and executes matches under price-compatibility rules, and records the
//! resulting trades.
//!
//! **Key invariants:**
//! - Price-time priority: best price wins, FIFO within a price level
//! - Settlement price is always the resting (maker) order's price
//! - No self-trades; no duplicate active orders per (listing, owner, side, price)
//! - Exactly-once settlement: an order leaves ACTIVE at most once
//! - Per-listing serialization; listings never contend with each other

pub mod book;
pub mod crossing;
pub mod directory;
pub mod engine;
pub mod locks;
pub mod store;

pub use book::BookView;
pub use directory::{InMemoryListings, ListingDirectory};
pub use engine::{MatchEngine, SubmitOutcome};
pub use store::trades::{PriceHistory, TradeStats};
