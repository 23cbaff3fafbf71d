//! Auction lifecycle: creation, bidding, cancellation, and settlement.
//!
//! State machine per listing key: `NoAuction → Live → {Won, Canceled}`,
//! with `Live` qualified by the time window. Expiry is enforced lazily:
//! each call compares the injected clock against `start_at + duration`, so
//! an expired auction nobody settled stays in storage (still holding the
//! asset) until a `win_bid` call resolves it.
//!
//! Single-held-escrow invariant: at any moment at most one bidder's funds
//! are escrowed per auction. An incoming bid first proves it can pay, then
//! refunds the previous highest bidder, then escrows — so a rejected bid
//! changes nothing and an accepted one never holds two escrows.

use chrono::Duration;
use gavel_types::{
    AccountId, Amount, AssetId, Auction, Bid, CollectionId, CurrencyId, ListingKey, MarketError,
    MarketEvent, Result,
};

use gavel_ledger::{AssetLedger, CurrencyLedger};

use crate::Marketplace;

impl Marketplace {
    /// Open a time-boxed auction. Locks the asset in custody and stamps
    /// `start_at` from the injected clock.
    ///
    /// # Errors
    /// `InvalidPrice`, `InvalidDuration`, `CurrencyNotAllowed`,
    /// `CollectionNotAllowed`, `AlreadyListed`, `InvalidAsset`, `NotOwner`.
    #[allow(clippy::too_many_arguments)]
    pub fn create_auction(
        &mut self,
        assets: &mut dyn AssetLedger,
        caller: AccountId,
        collection: CollectionId,
        asset_id: AssetId,
        currency: CurrencyId,
        start_price: Amount,
        duration: Duration,
    ) -> Result<()> {
        let key = ListingKey::new(collection, asset_id);
        if start_price == 0 {
            return Err(MarketError::InvalidPrice {
                reason: "auction start price must be greater than zero".into(),
            });
        }
        if duration <= Duration::zero() {
            return Err(MarketError::InvalidDuration {
                reason: "auction duration must be positive".into(),
            });
        }
        self.ensure_allowed(collection, currency)?;
        self.ensure_not_listed(key)?;

        self.custody.lock(assets, collection, asset_id, caller)?;

        let sequence = self.auction_seq;
        self.auction_seq += 1;
        let start_at = self.now();
        self.auctions.insert(
            key,
            Auction {
                seller: caller,
                key,
                currency,
                start_price,
                start_at,
                duration,
                sequence,
                bids: Vec::new(),
            },
        );
        self.emit(MarketEvent::AuctionCreated {
            key,
            seller: caller,
            currency,
            start_price,
        });
        Ok(())
    }

    /// Place a bid. The first bid must be at least the start price; every
    /// later bid must be strictly greater than the current highest — an
    /// equal price is rejected, ties do not win.
    ///
    /// The previous highest bidder's escrow is refunded before the new
    /// escrow is taken, after the incoming payment has been validated.
    ///
    /// # Errors
    /// `AuctionNotLive`, `BidderIsSeller`, `BidTooLow`, `InsufficientFunds`.
    pub fn bid(
        &mut self,
        funds: &mut dyn CurrencyLedger,
        caller: AccountId,
        key: ListingKey,
        price: Amount,
        attached: Amount,
    ) -> Result<()> {
        let now = self.now();
        let (currency, prev) = {
            let auction = self
                .auctions
                .get(&key)
                .ok_or(MarketError::AuctionNotLive { key })?;
            if !auction.is_live(now) {
                return Err(MarketError::AuctionNotLive { key });
            }
            if caller == auction.seller {
                return Err(MarketError::BidderIsSeller { key });
            }
            match auction.highest_bid() {
                None => {
                    if price < auction.start_price {
                        return Err(MarketError::BidTooLow {
                            bid: price,
                            floor: auction.start_price,
                        });
                    }
                }
                Some(highest) => {
                    if price <= highest.price {
                        return Err(MarketError::BidTooLow {
                            bid: price,
                            floor: highest.price,
                        });
                    }
                }
            }
            (
                auction.currency,
                auction
                    .highest_bid()
                    .map(|b| (b.bidder, b.price, b.escrow_id)),
            )
        };

        // A bidder raising their own highest bid gets the old escrow back
        // first; count it toward what they can afford.
        let credit = match prev {
            Some((bidder, amount, _)) if bidder == caller => amount,
            _ => 0,
        };
        self.settlement
            .ensure_can_escrow(funds, caller, currency, price, attached, credit)?;

        let outbid_refunded = if let Some((prev_bidder, _, prev_escrow)) = prev {
            self.settlement.refund(funds, prev_escrow)?;
            Some(prev_bidder)
        } else {
            None
        };
        let escrow_id = self.settlement.escrow(funds, caller, currency, price, attached)?;

        if let Some(auction) = self.auctions.get_mut(&key) {
            auction.bids.push(Bid {
                bidder: caller,
                price,
                placed_at: now,
                escrow_id,
            });
        }
        self.emit(MarketEvent::BidPlaced {
            key,
            bidder: caller,
            price,
            outbid_refunded,
        });
        Ok(())
    }

    /// Cancel an auction that has no bids. The asset returns to the seller
    /// with no fund movement. An auction with any bid is irrevocable by the
    /// seller — the highest bidder's commitment is locked in.
    ///
    /// # Errors
    /// `AuctionNotLive`, `NotSeller`, `HasBids`.
    pub fn cancel_auction(
        &mut self,
        assets: &mut dyn AssetLedger,
        caller: AccountId,
        key: ListingKey,
    ) -> Result<()> {
        let now = self.now();
        {
            let auction = self
                .auctions
                .get(&key)
                .ok_or(MarketError::AuctionNotLive { key })?;
            if auction.seller != caller {
                return Err(MarketError::NotSeller { key });
            }
            if !auction.is_live(now) {
                return Err(MarketError::AuctionNotLive { key });
            }
            if auction.has_bids() {
                return Err(MarketError::HasBids { key });
            }
        }

        self.custody
            .release(assets, key.collection, key.asset_id, caller)?;
        self.auctions.remove(&key);
        self.emit(MarketEvent::AuctionCanceled {
            key,
            seller: caller,
        });
        Ok(())
    }

    /// Settle an auction. Permissionless: any caller may trigger it.
    ///
    /// With at least one bid, the highest bid settles with the fee split
    /// and the asset goes to the highest bidder. Whether the time window
    /// must have elapsed first is `MarketConfig::settle_requires_expiry`.
    /// With zero bids, settlement is only meaningful once the window has
    /// closed: the asset returns to the seller, no fee is taken, and an
    /// `AuctionCanceled` event records the outcome.
    ///
    /// # Errors
    /// `AuctionNotLive` for a nonexistent or already-resolved key, or when
    /// the required expiry has not been reached.
    pub fn win_bid(
        &mut self,
        assets: &mut dyn AssetLedger,
        funds: &mut dyn CurrencyLedger,
        caller: AccountId,
        key: ListingKey,
    ) -> Result<()> {
        let now = self.now();
        let (seller, is_live, highest) = {
            let auction = self
                .auctions
                .get(&key)
                .ok_or(MarketError::AuctionNotLive { key })?;
            (
                auction.seller,
                auction.is_live(now),
                auction
                    .highest_bid()
                    .map(|b| (b.bidder, b.price, b.escrow_id)),
            )
        };

        match highest {
            Some((winner, price, escrow_id)) => {
                if self.config.settle_requires_expiry && is_live {
                    return Err(MarketError::AuctionNotLive { key });
                }
                let split = self
                    .settlement
                    .settle_with_fee(funds, escrow_id, seller, &self.config)?;
                self.custody
                    .release(assets, key.collection, key.asset_id, winner)?;
                self.auctions.remove(&key);
                tracing::debug!(%key, trigger = %caller, %winner, "auction settled");
                self.emit(MarketEvent::AuctionWon {
                    key,
                    seller,
                    winner,
                    price,
                    fee: split.fee,
                });
            }
            None => {
                if is_live {
                    return Err(MarketError::AuctionNotLive { key });
                }
                self.custody
                    .release(assets, key.collection, key.asset_id, seller)?;
                self.auctions.remove(&key);
                tracing::debug!(%key, trigger = %caller, "expired auction returned to seller");
                self.emit(MarketEvent::AuctionCanceled { key, seller });
            }
        }
        Ok(())
    }
}
