//! Route table and middleware stack.

use crate::handlers::{book, history, orders};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/orders/bid", post(orders::place_bid))
        .route("/orders/ask", post(orders::place_ask))
        .route("/orders/:id", delete(orders::cancel_order))
        .route("/orders/listing/:listing_id", get(book::get_book))
        .route("/orders/mine", get(orders::my_orders))
        .route("/listings/:id/history", get(history::get_history))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
