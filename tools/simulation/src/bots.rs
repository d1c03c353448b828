//! Trader bots with deterministic seeded RNG
//!
//! Collectors bid between 80% and 130% of retail; resellers ask between
//! 90% and 160%. Overlapping bands produce a realistic mix of immediate
//! matches and resting orders.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use types::ids::UserId;
use types::listing::Listing;
use types::money::Price;
use types::order::Side;

/// An order intent produced by a bot.
#[derive(Debug, Clone)]
pub struct BotOrder {
    pub side: Side,
    pub price: Price,
}

/// A simulated trader with a deterministic RNG stream.
pub struct TraderBot {
    pub user_id: UserId,
    pub side: Side,
    orders_generated: usize,
    rng: ChaCha8Rng,
}

impl TraderBot {
    /// A collector: bids on listings.
    pub fn collector(seed: u64) -> Self {
        Self::new(Side::Bid, seed)
    }

    /// A reseller: asks on listings.
    pub fn reseller(seed: u64) -> Self {
        Self::new(Side::Ask, seed)
    }

    fn new(side: Side, seed: u64) -> Self {
        Self {
            user_id: UserId::new(),
            side,
            orders_generated: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate an order intent around the listing's retail price.
    ///
    /// Prices land on whole dollars, like the original demo flow.
    pub fn quote(&mut self, listing: &Listing) -> Option<BotOrder> {
        let retail = listing
            .retail_price
            .map(|p| p.as_decimal())
            .unwrap_or_else(|| Decimal::from(100));
        let retail = retail.to_f64()?;

        let factor: f64 = match self.side {
            Side::Bid => self.rng.gen_range(0.80..=1.30),
            Side::Ask => self.rng.gen_range(0.90..=1.60),
        };
        let dollars = (retail * factor).round().max(1.0) as u64;

        self.orders_generated += 1;
        Some(BotOrder {
            side: self.side,
            price: Price::from_u64(dollars.min(types::money::MAX_PRICE)),
        })
    }

    /// Number of quotes generated so far.
    pub fn orders_generated(&self) -> usize {
        self.orders_generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::ListingId;

    fn listing(retail: u64) -> Listing {
        Listing::new(
            ListingId::new(),
            UserId::new(),
            "Nike Dunk Low Panda",
            Some(Price::from_u64(retail)),
        )
    }

    #[test]
    fn test_same_seed_same_quotes() {
        let listing = listing(100);
        let mut a = TraderBot::collector(42);
        let mut b = TraderBot::collector(42);
        for _ in 0..20 {
            assert_eq!(
                a.quote(&listing).unwrap().price,
                b.quote(&listing).unwrap().price
            );
        }
    }

    #[test]
    fn test_collector_bids_within_band() {
        let listing = listing(100);
        let mut bot = TraderBot::collector(7);
        for _ in 0..100 {
            let quote = bot.quote(&listing).unwrap();
            assert_eq!(quote.side, Side::Bid);
            let dollars = quote.price.as_decimal();
            assert!(dollars >= rust_decimal::Decimal::from(80));
            assert!(dollars <= rust_decimal::Decimal::from(130));
        }
    }

    #[test]
    fn test_reseller_asks_within_band() {
        let listing = listing(200);
        let mut bot = TraderBot::reseller(7);
        for _ in 0..100 {
            let quote = bot.quote(&listing).unwrap();
            assert_eq!(quote.side, Side::Ask);
            let dollars = quote.price.as_decimal();
            assert!(dollars >= rust_decimal::Decimal::from(180));
            assert!(dollars <= rust_decimal::Decimal::from(320));
        }
    }

    #[test]
    fn test_listing_without_retail_uses_default() {
        let listing = Listing::new(ListingId::new(), UserId::new(), "Mystery Pair", None);
        let mut bot = TraderBot::collector(1);
        assert!(bot.quote(&listing).is_some());
        assert_eq!(bot.orders_generated(), 1);
    }
}
