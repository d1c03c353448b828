//! Validated price domain
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point
//! errors). Prices are normalized to two decimal places with half-up
//! rounding and bounded to the marketplace's accepted range, so an
//! in-range `Price` is the only kind that can exist.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on any order or retail price, in dollars.
pub const MAX_PRICE: u64 = 1_000_000;

/// Errors raised when constructing a [`Price`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("price must be greater than zero, got {0}")]
    NotPositive(Decimal),

    #[error("price must be at most {MAX_PRICE}, got {0}")]
    AboveMaximum(Decimal),

    #[error("price is not a valid decimal: {0}")]
    Unparseable(String),
}

/// A validated settlement/order price.
///
/// Invariant: `0 < price ≤ 1_000_000`, at most two decimal places.
/// Serialized as a decimal string (e.g. `"150.00"`), matching the
/// SQL-numeric-over-JSON behavior downstream consumers already expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Validate and normalize a decimal into a `Price`.
    ///
    /// The value is rounded to two decimal places half-up (midpoint away
    /// from zero) before the bounds check, so `0.004` rounds to `0.00`
    /// and is rejected as non-positive.
    pub fn try_new(value: Decimal) -> Result<Self, PriceError> {
        let normalized = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if normalized <= Decimal::ZERO {
            return Err(PriceError::NotPositive(value));
        }
        if normalized > Decimal::from(MAX_PRICE) {
            return Err(PriceError::AboveMaximum(value));
        }
        Ok(Self(normalized))
    }

    /// Construct from whole dollars.
    ///
    /// # Panics
    /// Panics if `value` is zero or above [`MAX_PRICE`].
    pub fn from_u64(value: u64) -> Self {
        Self::try_new(Decimal::from(value)).expect("whole-dollar price out of range")
    }

    /// Get the inner decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str_exact(s.trim())
            .map_err(|_| PriceError::Unparseable(s.to_string()))?;
        Self::try_new(value)
    }
}
