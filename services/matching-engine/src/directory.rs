//! Listing collaborator seam
//!
//! Listings are owned by an external service; the engine only consumes a
//! narrow lookup. The trait keeps that boundary explicit and lets tests
//! and the simulation plug in an in-memory directory.

use dashmap::DashMap;
use types::ids::ListingId;
use types::listing::Listing;

/// Read access to the external listing catalog.
pub trait ListingDirectory: Send + Sync {
    /// Resolve a listing by id, or None if it does not exist.
    fn get(&self, id: ListingId) -> Option<Listing>;
}

/// In-memory listing directory (gateway seeding, tests, simulation).
#[derive(Default)]
pub struct InMemoryListings {
    listings: DashMap<ListingId, Listing>,
}

impl InMemoryListings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a listing.
    pub fn insert(&self, listing: Listing) {
        self.listings.insert(listing.id, listing);
    }

    /// All listings, in no particular order.
    pub fn all(&self) -> Vec<Listing> {
        self.listings.iter().map(|e| e.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl ListingDirectory for InMemoryListings {
    fn get(&self, id: ListingId) -> Option<Listing> {
        self.listings.get(&id).map(|e| e.value().clone())
    }
}
