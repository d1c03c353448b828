//! Request/response DTOs
//!
//! Request bodies are statically validated: explicit required fields and
//! explicit numeric coercion with bounds, applied before the engine is
//! ever invoked.

use crate::error::ApiError;
use matching_engine::{BookView, PriceHistory, SubmitOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::ListingId;
use types::money::Price;
use types::order::Order;
use types::trade::Trade;

/// Body of `POST /orders/bid` and `POST /orders/ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub listing_id: ListingId,
    /// Accepted as a JSON number; coerced and bounds-checked explicitly.
    pub price: f64,
}

impl PlaceOrderRequest {
    /// Coerce the raw price into the validated domain.
    pub fn price(&self) -> Result<Price, ApiError> {
        let decimal = Decimal::try_from(self.price)
            .map_err(|_| ApiError::BadRequest(format!("price is not a number: {}", self.price)))?;
        Price::try_new(decimal).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Response of both order-placement endpoints.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order: Order,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade: Option<Trade>,
}

impl From<SubmitOutcome> for PlaceOrderResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            order: outcome.order,
            matched: outcome.matched,
            trade: outcome.trade,
        }
    }
}

/// Response of `DELETE /orders/{id}`.
#[derive(Debug, Serialize)]
pub struct CancelOrderResponse {
    pub order: Order,
}

/// Response of `GET /orders/listing/{listing_id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub active_orders: Vec<Order>,
    pub best_bid: Option<Order>,
    pub best_ask: Option<Order>,
}

impl From<BookView> for BookResponse {
    fn from(view: BookView) -> Self {
        Self {
            active_orders: view.active_orders,
            best_bid: view.best_bid,
            best_ask: view.best_ask,
        }
    }
}

/// One row of `GET /orders/mine`: the order joined with the listing's
/// display name.
#[derive(Debug, Serialize)]
pub struct MineEntry {
    #[serde(flatten)]
    pub order: Order,
    pub listing_name: Option<String>,
}

/// Response of `GET /listings/{id}/history`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub trades: Vec<Trade>,
    pub stats: StatsBody,
    pub last_trade: Option<Trade>,
}

#[derive(Debug, Serialize)]
pub struct StatsBody {
    pub count: u64,
    pub avg: Option<Decimal>,
    pub min: Option<Price>,
    pub max: Option<Price>,
}

impl From<PriceHistory> for HistoryResponse {
    fn from(history: PriceHistory) -> Self {
        Self {
            trades: history.trades,
            stats: StatsBody {
                count: history.stats.count,
                avg: history.stats.avg,
                min: history.stats.min,
                max: history.stats.max,
            },
            last_trade: history.last_trade,
        }
    }
}
