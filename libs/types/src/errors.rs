//! Error taxonomy for the order-book core
//!
//! Every business-rule rejection carries a machine-distinguishable kind
//! and a human-readable message. Rejections are detected before any
//! mutation; the only post-validation failure point is the journal
//! commit, which aborts atomically and surfaces as `Internal`.

use crate::ids::{ListingId, OrderId};
use thiserror::Error;

/// Top-level error for every engine and store operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// Malformed or out-of-range input; never reaches the engine.
    #[error("invalid request: {reason}")]
    Validation { reason: String },

    #[error("listing not found: {listing_id}")]
    ListingNotFound { listing_id: ListingId },

    #[error("order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// Ownership mismatch (e.g. cancelling someone else's order).
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// An identical active order already exists.
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// Self-trade attempt, cancel of a non-active order, and similar
    /// state-machine violations.
    #[error("invalid operation: {reason}")]
    InvalidOperation { reason: String },

    /// Store or journal failure; nothing partial was persisted and the
    /// operation is safe to retry.
    #[error("internal failure: {reason}")]
    Internal { reason: String },
}

impl MarketError {
    /// Stable machine code for the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketError::Validation { .. } => "VALIDATION",
            MarketError::ListingNotFound { .. } | MarketError::OrderNotFound { .. } => "NOT_FOUND",
            MarketError::Forbidden { .. } => "FORBIDDEN",
            MarketError::Conflict { .. } => "CONFLICT",
            MarketError::InvalidOperation { .. } => "INVALID_OPERATION",
            MarketError::Internal { .. } => "INTERNAL",
        }
    }
}
