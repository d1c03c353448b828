//! Journal-backed engine: durability across restarts.

use matching_engine::{InMemoryListings, MatchEngine};
use std::sync::Arc;
use tempfile::TempDir;
use types::errors::MarketError;
use types::ids::{ListingId, UserId};
use types::listing::Listing;
use types::money::Price;
use types::order::OrderState;

fn directory_with_listing() -> (Arc<InMemoryListings>, Listing, UserId) {
    let directory = Arc::new(InMemoryListings::new());
    let seller = UserId::new();
    let listing = Listing::new(
        ListingId::new(),
        seller,
        "Nike SB Dunk Low Travis Scott",
        Some(Price::from_u64(150)),
    );
    directory.insert(listing.clone());
    (directory, listing, seller)
}

#[test]
fn restart_restores_resting_orders() {
    let tmp = TempDir::new().unwrap();
    let (directory, listing, seller) = directory_with_listing();
    let buyer = UserId::new();

    {
        let engine = MatchEngine::with_journal(directory.clone(), tmp.path()).unwrap();
        engine
            .submit_ask(seller, listing.id, Price::from_u64(200))
            .unwrap();
        engine
            .submit_bid(buyer, listing.id, Price::from_u64(150))
            .unwrap();
    }

    let engine = MatchEngine::with_journal(directory, tmp.path()).unwrap();
    let book = engine.book(listing.id);
    assert_eq!(book.active_orders.len(), 2);
    assert_eq!(book.best_ask.unwrap().price, Price::from_u64(200));
    assert_eq!(book.best_bid.unwrap().price, Price::from_u64(150));
}

#[test]
fn restart_restores_matches_and_trades() {
    let tmp = TempDir::new().unwrap();
    let (directory, listing, seller) = directory_with_listing();
    let buyer = UserId::new();
    let original_trade;

    {
        let engine = MatchEngine::with_journal(directory.clone(), tmp.path()).unwrap();
        engine
            .submit_ask(seller, listing.id, Price::from_u64(120))
            .unwrap();
        let outcome = engine
            .submit_bid(buyer, listing.id, Price::from_u64(140))
            .unwrap();
        original_trade = outcome.trade.unwrap();
    }

    let engine = MatchEngine::with_journal(directory, tmp.path()).unwrap();
    let history = engine.history(listing.id);
    assert_eq!(history.stats.count, 1);
    assert_eq!(history.last_trade, Some(original_trade.clone()));
    assert_eq!(
        engine.order(original_trade.bid_order_id).unwrap().state,
        OrderState::Matched
    );
    assert_eq!(
        engine.order(original_trade.ask_order_id).unwrap().state,
        OrderState::Matched
    );
    assert!(engine.book(listing.id).active_orders.is_empty());
}

#[test]
fn restart_preserves_duplicate_and_cancel_semantics() {
    let tmp = TempDir::new().unwrap();
    let (directory, listing, _) = directory_with_listing();
    let buyer = UserId::new();
    let bid_id;

    {
        let engine = MatchEngine::with_journal(directory.clone(), tmp.path()).unwrap();
        bid_id = engine
            .submit_bid(buyer, listing.id, Price::from_u64(140))
            .unwrap()
            .order
            .id;
    }

    let engine = MatchEngine::with_journal(directory, tmp.path()).unwrap();

    // The recovered order still blocks duplicates…
    let err = engine
        .submit_bid(buyer, listing.id, Price::from_u64(140))
        .unwrap_err();
    assert!(matches!(err, MarketError::Conflict { .. }));

    // …and is still cancellable by its owner.
    let cancelled = engine.cancel(buyer, bid_id).unwrap();
    assert_eq!(cancelled.state, OrderState::Cancelled);

    // The cancel survives another restart, even with an empty catalog:
    // the journal carries the orders themselves.
    drop(engine);
    let engine =
        MatchEngine::with_journal(Arc::new(InMemoryListings::new()), tmp.path()).unwrap();
    assert_eq!(
        engine.order(bid_id).unwrap().state,
        OrderState::Cancelled
    );
}

#[test]
fn matching_continues_after_restart() {
    let tmp = TempDir::new().unwrap();
    let (directory, listing, seller) = directory_with_listing();

    {
        let engine = MatchEngine::with_journal(directory.clone(), tmp.path()).unwrap();
        engine
            .submit_ask(seller, listing.id, Price::from_u64(150))
            .unwrap();
    }

    let engine = MatchEngine::with_journal(directory, tmp.path()).unwrap();
    let outcome = engine
        .submit_bid(UserId::new(), listing.id, Price::from_u64(150))
        .unwrap();
    assert!(outcome.matched, "recovered ask is still matchable");
    assert_eq!(outcome.trade.unwrap().price, Price::from_u64(150));
}
