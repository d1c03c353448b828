//! Startup seeding of the demo catalog
//!
//! Listings and users are external collaborators; until the real services
//! are wired in, the gateway seeds a small sneaker catalog and a couple
//! of demo accounts, and logs ready-to-use bearer tokens for them.

use crate::auth::AuthKeys;
use matching_engine::InMemoryListings;
use std::time::Duration;
use tracing::info;
use types::ids::{ListingId, UserId};
use types::listing::Listing;
use types::money::Price;

/// A seeded demo account with a usable bearer token.
pub struct DemoUser {
    pub user_id: UserId,
    pub username: &'static str,
    pub token: String,
}

const DEMO_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);

const CATALOG: &[(&str, u64)] = &[
    ("Air Jordan 1 Retro High OG Chicago", 170),
    ("Yeezy Boost 350 V2 Zebra", 220),
    ("Nike Dunk Low Panda", 100),
    ("New Balance 550 White Green", 110),
    ("Air Force 1 Low White", 90),
    ("Jordan 4 Retro Bred", 200),
    ("Nike SB Dunk Low Travis Scott", 150),
    ("Adidas Samba OG White", 100),
];

/// Seed demo users and the sneaker catalog. Returns the demo accounts so
/// callers (and the logs) can exercise the API immediately.
pub fn seed_demo_data(listings: &InMemoryListings, auth: &AuthKeys) -> Vec<DemoUser> {
    let users: Vec<DemoUser> = ["sneakerhead", "kicksdealer", "solecollector"]
        .iter()
        .map(|&username| {
            let user_id = UserId::new();
            DemoUser {
                user_id,
                username,
                token: auth.issue(user_id, username, DEMO_TOKEN_TTL),
            }
        })
        .collect();

    for (i, &(name, retail)) in CATALOG.iter().enumerate() {
        // Alternate sellers across the catalog like the original demo data.
        let seller = &users[i % 2];
        listings.insert(Listing::new(
            ListingId::new(),
            seller.user_id,
            name,
            Some(Price::from_u64(retail)),
        ));
    }

    for user in &users {
        info!(username = user.username, token = %user.token, "seeded demo user");
    }
    info!(listings = listings.len(), "seeded demo catalog");

    users
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_catalog_and_users() {
        let listings = InMemoryListings::new();
        let auth = AuthKeys::new("test-secret");
        let users = seed_demo_data(&listings, &auth);

        assert_eq!(users.len(), 3);
        assert_eq!(listings.len(), CATALOG.len());

        // Tokens resolve back to their users.
        for user in &users {
            let claims = auth.verify(&user.token).unwrap();
            assert_eq!(claims.user_id, user.user_id);
        }
    }

    #[test]
    fn test_every_listing_has_a_seeded_seller() {
        let listings = InMemoryListings::new();
        let auth = AuthKeys::new("test-secret");
        let users = seed_demo_data(&listings, &auth);
        let seller_ids: Vec<_> = users.iter().map(|u| u.user_id).collect();

        for listing in listings.all() {
            assert!(seller_ids.contains(&listing.seller_id));
            assert!(listing.retail_price.is_some());
        }
    }
}
