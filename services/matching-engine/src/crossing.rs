//! Crossing detection
//!
//! Determines when an incoming order is price-compatible with a resting
//! counterpart. The settlement price is decided elsewhere (always the
//! resting order's price); this module only answers "can they trade".

use types::money::Price;
use types::order::Side;

/// Check whether an incoming order crosses a resting opposite-side order.
///
/// - incoming BID matches a resting ask when `ask.price ≤ bid.price`
/// - incoming ASK matches a resting bid when `bid.price ≥ ask.price`
pub fn crosses(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Bid => resting_price <= incoming_price,
        Side::Ask => resting_price >= incoming_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_crosses_cheaper_ask() {
        assert!(crosses(Side::Bid, Price::from_u64(140), Price::from_u64(120)));
    }

    #[test]
    fn test_bid_crosses_equal_ask() {
        assert!(crosses(Side::Bid, Price::from_u64(150), Price::from_u64(150)));
    }

    #[test]
    fn test_bid_does_not_cross_pricier_ask() {
        assert!(!crosses(Side::Bid, Price::from_u64(150), Price::from_u64(200)));
    }

    #[test]
    fn test_ask_crosses_higher_bid() {
        assert!(crosses(Side::Ask, Price::from_u64(140), Price::from_u64(150)));
    }

    #[test]
    fn test_ask_does_not_cross_lower_bid() {
        assert!(!crosses(Side::Ask, Price::from_u64(160), Price::from_u64(150)));
    }
}
