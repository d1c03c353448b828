//! External listing collaborator record
//!
//! Listings are owned by an external service; the order-book core only
//! needs existence, the seller, a display name, and the retail price.

use crate::ids::{ListingId, UserId};
use crate::money::Price;
use serde::{Deserialize, Serialize};

/// The slice of a listing the order-book core consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub seller_id: UserId,
    pub name: String,
    pub retail_price: Option<Price>,
}

impl Listing {
    pub fn new(
        id: ListingId,
        seller_id: UserId,
        name: impl Into<String>,
        retail_price: Option<Price>,
    ) -> Self {
        Self {
            id,
            seller_id,
            name: name.into(),
            retail_price,
        }
    }
}
