//! Audit-trail events.
//!
//! One variant per successful state transition, emitted exactly once per
//! transition and never on failure. External indexers rely on this log as
//! the durable history; terminal listings are removed from storage, so the
//! events are the only record that they existed.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, CurrencyId, ListingKey};

/// A successful state transition in the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    OrderCreated {
        key: ListingKey,
        seller: AccountId,
        currency: CurrencyId,
        price: Amount,
    },
    OrderEdited {
        key: ListingKey,
        old_price: Amount,
        new_price: Amount,
    },
    OrderCanceled {
        key: ListingKey,
        seller: AccountId,
        offers_refunded: usize,
        refunds_failed: usize,
    },
    OrderBought {
        key: ListingKey,
        seller: AccountId,
        buyer: AccountId,
        price: Amount,
        fee: Amount,
    },
    OfferCreated {
        key: ListingKey,
        proposer: AccountId,
        amount: Amount,
    },
    OfferCanceled {
        key: ListingKey,
        proposer: AccountId,
        amount: Amount,
    },
    OfferAccepted {
        key: ListingKey,
        seller: AccountId,
        proposer: AccountId,
        amount: Amount,
        fee: Amount,
    },
    OfferRejected {
        key: ListingKey,
        proposer: AccountId,
        amount: Amount,
    },
    AuctionCreated {
        key: ListingKey,
        seller: AccountId,
        currency: CurrencyId,
        start_price: Amount,
    },
    AuctionCanceled {
        key: ListingKey,
        seller: AccountId,
    },
    BidPlaced {
        key: ListingKey,
        bidder: AccountId,
        price: Amount,
        outbid_refunded: Option<AccountId>,
    },
    AuctionWon {
        key: ListingKey,
        seller: AccountId,
        winner: AccountId,
        price: Amount,
        fee: Amount,
    },
}

impl MarketEvent {
    /// The listing key this event concerns.
    #[must_use]
    pub fn key(&self) -> ListingKey {
        match self {
            Self::OrderCreated { key, .. }
            | Self::OrderEdited { key, .. }
            | Self::OrderCanceled { key, .. }
            | Self::OrderBought { key, .. }
            | Self::OfferCreated { key, .. }
            | Self::OfferCanceled { key, .. }
            | Self::OfferAccepted { key, .. }
            | Self::OfferRejected { key, .. }
            | Self::AuctionCreated { key, .. }
            | Self::AuctionCanceled { key, .. }
            | Self::BidPlaced { key, .. }
            | Self::AuctionWon { key, .. } => *key,
        }
    }

    /// Short machine-friendly label, stable across versions.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::OrderCreated { .. } => "order_created",
            Self::OrderEdited { .. } => "order_edited",
            Self::OrderCanceled { .. } => "order_canceled",
            Self::OrderBought { .. } => "order_bought",
            Self::OfferCreated { .. } => "offer_created",
            Self::OfferCanceled { .. } => "offer_canceled",
            Self::OfferAccepted { .. } => "offer_accepted",
            Self::OfferRejected { .. } => "offer_rejected",
            Self::AuctionCreated { .. } => "auction_created",
            Self::AuctionCanceled { .. } => "auction_canceled",
            Self::BidPlaced { .. } => "bid_placed",
            Self::AuctionWon { .. } => "auction_won",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetId, CollectionId};

    #[test]
    fn event_key_extraction() {
        let key = ListingKey::new(CollectionId::new(), AssetId(1));
        let event = MarketEvent::OrderCreated {
            key,
            seller: AccountId::new(),
            currency: CurrencyId::native(),
            price: 5,
        };
        assert_eq!(event.key(), key);
        assert_eq!(event.label(), "order_created");
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = MarketEvent::BidPlaced {
            key: ListingKey::new(CollectionId::new(), AssetId(3)),
            bidder: AccountId::new(),
            price: 4,
            outbid_refunded: Some(AccountId::new()),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: MarketEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
