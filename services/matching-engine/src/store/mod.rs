//! Durable-through-journal state: order store and trade ledger.

pub mod orders;
pub mod trades;

pub use orders::OrderStore;
pub use trades::TradeLedger;
