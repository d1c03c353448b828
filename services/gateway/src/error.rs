//! Central error type for the gateway
//!
//! Every rejection leaves the service as a JSON envelope with a stable
//! machine code and a human-readable message; nothing is silently
//! swallowed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::MarketError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::RateLimitExceeded(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "VALIDATION", msg),
            ApiError::Market(err) => (market_status(&err), err.kind(), err.to_string()),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}

fn market_status(err: &MarketError) -> StatusCode {
    match err {
        MarketError::Validation { .. } => StatusCode::BAD_REQUEST,
        MarketError::ListingNotFound { .. } | MarketError::OrderNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        MarketError::Forbidden { .. } => StatusCode::FORBIDDEN,
        MarketError::Conflict { .. } => StatusCode::CONFLICT,
        MarketError::InvalidOperation { .. } => StatusCode::BAD_REQUEST,
        MarketError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{ListingId, OrderId};

    #[test]
    fn test_market_error_status_mapping() {
        assert_eq!(
            market_status(&MarketError::ListingNotFound {
                listing_id: ListingId::new()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            market_status(&MarketError::OrderNotFound {
                order_id: OrderId::new()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            market_status(&MarketError::Forbidden {
                reason: "x".into()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            market_status(&MarketError::Conflict { reason: "x".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            market_status(&MarketError::InvalidOperation {
                reason: "x".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            market_status(&MarketError::Internal { reason: "x".into() }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
