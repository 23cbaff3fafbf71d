//! Fixed-price listing model: orders and the offers made against them.
//!
//! An `Order` exists only while its asset is held in custody. Terminal
//! transitions (buy, cancel) remove the record entirely — the event log is
//! the history, not the order map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, CurrencyId, EscrowId, ListingKey};

/// A live fixed-price listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub seller: AccountId,
    pub key: ListingKey,
    pub currency: CurrencyId,
    /// Asking price. Always > 0.
    pub price: Amount,
    pub created_at: DateTime<Utc>,
    /// Creation sequence, monotonically increasing across all orders.
    /// Queries iterate in this order so pagination is stable.
    pub sequence: u64,
}

/// A live counter-offer against an order.
///
/// At most one per `(listing key, proposer)`. The escrowed amount is held by
/// the settlement plane under `escrow_id` until accept, reject, or cancel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub proposer: AccountId,
    /// Escrowed amount. Invariant: `0 < amount <= order.price` at creation.
    pub amount: Amount,
    pub escrow_id: EscrowId,
    pub created_at: DateTime<Utc>,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(price: Amount) -> Self {
        use crate::{AssetId, CollectionId};
        Self {
            seller: AccountId::new(),
            key: ListingKey::new(CollectionId::new(), AssetId(rand::random::<u64>())),
            currency: CurrencyId::new(),
            price,
            created_at: Utc::now(),
            sequence: 0,
        }
    }
}
