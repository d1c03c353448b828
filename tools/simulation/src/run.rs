//! Scenario runner
//!
//! Seeds a sneaker catalog, spawns collector and reseller bots, and
//! drives the engine round-robin for a configured number of rounds.
//! Duplicate rejections are expected traffic (bots re-quote the same
//! dollar figure often) and are counted, not failed.

use crate::bots::TraderBot;
use crate::metrics::SimMetrics;
use matching_engine::{InMemoryListings, ListingDirectory, MatchEngine};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use types::errors::MarketError;
use types::ids::{ListingId, UserId};
use types::listing::Listing;
use types::money::Price;

/// Simulation parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    pub seed: u64,
    pub rounds: u64,
    pub collectors: usize,
    pub resellers: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rounds: 200,
            collectors: 4,
            resellers: 3,
        }
    }
}

/// JSON-exportable outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub config: SimConfig,
    pub listings: usize,
    pub metrics: SimMetrics,
    pub match_rate: f64,
    /// Average settlement price as a multiple of retail, per settled
    /// trade, across the whole run.
    pub avg_settlement_vs_retail: Option<f64>,
}

const CATALOG: &[(&str, u64)] = &[
    ("Air Jordan 1 Retro High OG Chicago", 170),
    ("Yeezy Boost 350 V2 Zebra", 220),
    ("Nike Dunk Low Panda", 100),
    ("Jordan 4 Retro Bred", 200),
    ("Adidas Samba OG White", 100),
];

/// Run a full simulation and produce the report.
pub fn run(config: SimConfig) -> SimReport {
    let directory = Arc::new(InMemoryListings::new());
    let catalog_seller = UserId::new();
    let mut listing_ids = Vec::new();
    for &(name, retail) in CATALOG {
        let listing = Listing::new(
            ListingId::new(),
            catalog_seller,
            name,
            Some(Price::from_u64(retail)),
        );
        listing_ids.push(listing.id);
        directory.insert(listing);
    }

    let engine = MatchEngine::in_memory(directory.clone());
    let mut metrics = SimMetrics::new();

    let mut bots: Vec<TraderBot> = Vec::new();
    for i in 0..config.collectors {
        bots.push(TraderBot::collector(config.seed.wrapping_add(i as u64)));
    }
    for i in 0..config.resellers {
        bots.push(TraderBot::reseller(
            config.seed.wrapping_add(1_000 + i as u64),
        ));
    }

    let mut settlement_ratios: Vec<f64> = Vec::new();

    for round in 0..config.rounds {
        let listing_id = listing_ids[(round % listing_ids.len() as u64) as usize];
        let listing = directory
            .get(listing_id)
            .expect("seeded listing is always resolvable");

        for bot in &mut bots {
            let Some(quote) = bot.quote(&listing) else {
                continue;
            };
            let result = match quote.side {
                types::order::Side::Bid => {
                    engine.submit_bid(bot.user_id, listing_id, quote.price)
                }
                types::order::Side::Ask => {
                    engine.submit_ask(bot.user_id, listing_id, quote.price)
                }
            };
            match result {
                Ok(outcome) if outcome.matched => {
                    metrics.record_settled();
                    if let (Some(trade), Some(retail)) = (&outcome.trade, listing.retail_price) {
                        let ratio = (trade.price.as_decimal() / retail.as_decimal())
                            .to_f64()
                            .unwrap_or(1.0);
                        settlement_ratios.push(ratio);
                    }
                }
                Ok(_) => metrics.record_rested(),
                Err(MarketError::Conflict { .. }) => metrics.record_duplicate(),
                Err(err) => {
                    // Bots never self-trade or hit missing listings; any
                    // other rejection is a harness bug worth surfacing.
                    panic!("unexpected rejection during simulation: {}", err);
                }
            }
        }
    }

    let avg_settlement_vs_retail = if settlement_ratios.is_empty() {
        None
    } else {
        Some(settlement_ratios.iter().sum::<f64>() / settlement_ratios.len() as f64)
    };

    SimReport {
        listings: listing_ids.len(),
        match_rate: metrics.match_rate(),
        metrics,
        avg_settlement_vs_retail,
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_produces_traffic() {
        let report = run(SimConfig::default());
        assert!(report.metrics.orders_submitted > 0);
        assert!(
            report.metrics.trades_settled > 0,
            "overlapping price bands must settle some trades"
        );
        assert!(report.match_rate > 0.0 && report.match_rate < 1.0);
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = run(SimConfig::default());
        let b = run(SimConfig::default());
        assert_eq!(
            serde_json::to_value(&a.metrics).unwrap(),
            serde_json::to_value(&b.metrics).unwrap()
        );
        assert_eq!(a.avg_settlement_vs_retail, b.avg_settlement_vs_retail);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = run(SimConfig::default());
        let b = run(SimConfig {
            seed: 7,
            ..SimConfig::default()
        });
        // Astronomically unlikely to coincide on every counter.
        assert_ne!(
            serde_json::to_value(&a.metrics).unwrap(),
            serde_json::to_value(&b.metrics).unwrap()
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = run(SimConfig {
            rounds: 10,
            ..SimConfig::default()
        });
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("match_rate"));
    }
}
