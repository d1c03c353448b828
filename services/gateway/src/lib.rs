//! Gateway API for the sneaker marketplace
//!
//! HTTP surface over the matching engine: order submission and
//! cancellation, public book and price-history reads, and the caller's
//! own-order listing. Authentication is a bearer-JWT capability; the
//! core only ever sees a resolved user id.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rate_limit;
pub mod router;
pub mod seed;
pub mod state;

pub use router::create_router;
pub use state::AppState;
