//! Bearer-token identity resolution
//!
//! Authentication itself is an external capability; the gateway only
//! verifies the bearer JWT and hands the resolved `UserId` to handlers.
//! Tokens are HS256 with the shared secret from configuration.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use types::ids::UserId;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Display name of the token holder.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
    pub user_id: UserId,
}

/// Key pair for issuing and verifying tokens.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for a user (startup seeding and tests; real tokens
    /// come from the external identity service sharing this secret).
    pub fn issue(&self, user_id: UserId, username: &str, ttl: Duration) -> String {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as usize
            + ttl.as_secs() as usize;
        let claims = Claims {
            sub: username.to_string(),
            exp,
            user_id,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .expect("HS256 token encoding cannot fail with a valid secret")
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| ApiError::Unauthorized(format!("invalid token: {}", e)))
    }
}

/// Extractor for handlers that require a resolved caller identity.
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;
        let header = header
            .to_str()
            .map_err(|_| ApiError::Unauthorized("invalid Authorization header".to_string()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".to_string()))?;

        let claims = state.auth.verify(token)?;
        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            username: claims.sub,
        })
    }
}
