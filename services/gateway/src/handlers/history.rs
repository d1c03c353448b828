//! Public price-history read over settled trades.

use crate::error::ApiError;
use crate::models::HistoryResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use types::ids::ListingId;

/// `GET /listings/{id}/history`: no auth; recent trades (newest first,
/// capped), aggregate stats, and the most recent settlement.
pub async fn get_history(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
) -> Result<Json<HistoryResponse>, ApiError> {
    Ok(Json(state.engine.history(listing_id).into()))
}
