//! Shared application state.

use crate::auth::AuthKeys;
use crate::rate_limit::RateLimiter;
use matching_engine::{InMemoryListings, MatchEngine};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchEngine>,
    pub listings: Arc<InMemoryListings>,
    pub rate_limiter: Arc<RateLimiter>,
    pub auth: AuthKeys,
}

impl AppState {
    pub fn new(engine: MatchEngine, listings: Arc<InMemoryListings>, auth: AuthKeys) -> Self {
        Self {
            engine: Arc::new(engine),
            listings,
            rate_limiter: Arc::new(RateLimiter::new()),
            auth,
        }
    }
}
