//! Order lifecycle endpoints: place bid/ask, cancel, own orders.

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{CancelOrderResponse, MineEntry, PlaceOrderRequest, PlaceOrderResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use matching_engine::ListingDirectory;
use types::ids::OrderId;

const PLACEMENTS_PER_MINUTE: u32 = 30;
const CANCELS_PER_MINUTE: u32 = 60;

/// `POST /orders/bid`
pub async fn place_bid(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), ApiError> {
    state.rate_limiter.check_rate_limit(
        &format!("{}:order_placement", user.user_id),
        PLACEMENTS_PER_MINUTE,
        PLACEMENTS_PER_MINUTE as f64 / 60.0,
    )?;

    let price = payload.price()?;
    let outcome = state
        .engine
        .submit_bid(user.user_id, payload.listing_id, price)?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// `POST /orders/ask`
pub async fn place_ask(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), ApiError> {
    state.rate_limiter.check_rate_limit(
        &format!("{}:order_placement", user.user_id),
        PLACEMENTS_PER_MINUTE,
        PLACEMENTS_PER_MINUTE as f64 / 60.0,
    )?;

    let price = payload.price()?;
    let outcome = state
        .engine
        .submit_ask(user.user_id, payload.listing_id, price)?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// `DELETE /orders/{id}`
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<OrderId>,
) -> Result<Json<CancelOrderResponse>, ApiError> {
    state.rate_limiter.check_rate_limit(
        &format!("{}:order_cancel", user.user_id),
        CANCELS_PER_MINUTE,
        CANCELS_PER_MINUTE as f64 / 60.0,
    )?;

    let order = state.engine.cancel(user.user_id, order_id)?;
    Ok(Json(CancelOrderResponse { order }))
}

/// `GET /orders/mine`: the caller's orders across all listings, newest
/// first, joined with the listing display name.
pub async fn my_orders(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<MineEntry>>, ApiError> {
    let entries = state
        .engine
        .orders_for_owner(user.user_id)
        .into_iter()
        .map(|order| {
            let listing_name = state
                .listings
                .get(order.listing_id)
                .map(|listing| listing.name);
            MineEntry {
                order,
                listing_name,
            }
        })
        .collect();
    Ok(Json(entries))
}
