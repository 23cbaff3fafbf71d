//! Time-boxed auction model.
//!
//! An `Auction` exists only while its asset is held in custody, and is
//! removed on win or cancel. Expiry is never enforced by a timer — every
//! operation checks the injected clock against `ends_at()` lazily, so an
//! expired-but-unsettled auction can sit in storage indefinitely and the
//! model distinguishes "time-live" from "merely present".

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, CurrencyId, EscrowId, ListingKey};

/// A competitive-bidding listing with a fixed time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auction {
    pub seller: AccountId,
    pub key: ListingKey,
    pub currency: CurrencyId,
    /// Floor for the first bid. Always > 0.
    pub start_price: Amount,
    pub start_at: DateTime<Utc>,
    #[serde(with = "duration_seconds")]
    pub duration: Duration,
    /// Creation sequence, monotonically increasing across all auctions.
    pub sequence: u64,
    /// Append-only bid history. Only the last entry's escrow is ACTIVE;
    /// every earlier bidder was refunded when outbid.
    pub bids: Vec<Bid>,
}

/// One accepted bid. Prices are strictly increasing along `Auction::bids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: AccountId,
    pub price: Amount,
    pub placed_at: DateTime<Utc>,
    pub escrow_id: EscrowId,
}

impl Auction {
    /// The instant the bidding window closes.
    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.start_at + self.duration
    }

    /// Whether the bidding window is open at `now`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at()
    }

    /// The current highest bid, if any.
    #[must_use]
    pub fn highest_bid(&self) -> Option<&Bid> {
        self.bids.last()
    }

    /// Highest bid price, or the start price when no bids have been placed.
    /// This is the value queries filter price ranges against.
    #[must_use]
    pub fn current_price(&self) -> Amount {
        self.highest_bid().map_or(self.start_price, |bid| bid.price)
    }

    /// Whether any bid has been placed. An auction with bids is irrevocable
    /// by the seller.
    #[must_use]
    pub fn has_bids(&self) -> bool {
        !self.bids.is_empty()
    }
}

/// Serialize `chrono::Duration` as whole seconds.
mod duration_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(de)?;
        Ok(Duration::seconds(secs))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Auction {
    pub fn dummy(start_price: Amount, duration: Duration) -> Self {
        use crate::{AssetId, CollectionId};
        Self {
            seller: AccountId::new(),
            key: crate::ListingKey::new(CollectionId::new(), AssetId(rand::random::<u64>())),
            currency: CurrencyId::native(),
            start_price,
            start_at: Utc::now(),
            duration,
            sequence: 0,
            bids: Vec::new(),
        }
    }
}
