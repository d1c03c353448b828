//! Public order-book read.

use crate::error::ApiError;
use crate::models::BookResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use types::ids::ListingId;

/// `GET /orders/listing/{listing_id}`: no auth; derived fresh from the
/// order store. An unknown listing is simply an empty book.
pub async fn get_book(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
) -> Result<Json<BookResponse>, ApiError> {
    Ok(Json(state.engine.book(listing_id).into()))
}
