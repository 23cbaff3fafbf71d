//! Fixed-price order lifecycle and the offers negotiated against it.
//!
//! State machine per listing key: `NoOrder → Live → {Sold, Canceled}`.
//! Terminal transitions remove the order record — a later listing of the
//! same key starts from `NoOrder` again, and the event log carries the
//! history.
//!
//! Transition structure: every fallible check runs before the first
//! mutation, so a rejected call leaves zero observable change. The one
//! deliberate exception is the blanket offer-refund loop on cancel/settle,
//! where each refund is fault-isolated (see [`Marketplace::refund_offers`]).

use gavel_types::{
    AccountId, Amount, AssetId, CollectionId, CurrencyId, ListingKey, MarketError, MarketEvent,
    Offer, Order, Result,
};

use gavel_ledger::{AssetLedger, CurrencyLedger};

use crate::Marketplace;

impl Marketplace {
    /// List an asset at a fixed price. Locks the asset in custody.
    ///
    /// # Errors
    /// `InvalidPrice`, `CurrencyNotAllowed`, `CollectionNotAllowed`,
    /// `AlreadyListed`, `InvalidAsset`, `NotOwner`.
    pub fn create_order(
        &mut self,
        assets: &mut dyn AssetLedger,
        caller: AccountId,
        collection: CollectionId,
        asset_id: AssetId,
        currency: CurrencyId,
        price: Amount,
    ) -> Result<()> {
        let key = ListingKey::new(collection, asset_id);
        if price == 0 {
            return Err(MarketError::InvalidPrice {
                reason: "order price must be greater than zero".into(),
            });
        }
        self.ensure_allowed(collection, currency)?;
        self.ensure_not_listed(key)?;

        self.custody.lock(assets, collection, asset_id, caller)?;

        let sequence = self.order_seq;
        self.order_seq += 1;
        let created_at = self.now();
        self.orders.insert(
            key,
            Order {
                seller: caller,
                key,
                currency,
                price,
                created_at,
                sequence,
            },
        );
        self.emit(MarketEvent::OrderCreated {
            key,
            seller: caller,
            currency,
            price,
        });
        Ok(())
    }

    /// Change the asking price of a live order.
    ///
    /// Rejected while any offer is pending — an offer was escrowed against
    /// the price it undercut, and repricing underneath it would invalidate
    /// that comparison.
    ///
    /// # Errors
    /// `NotLive`, `NotSeller`, `InvalidPrice`, `HasPendingOffers`.
    pub fn edit_order(
        &mut self,
        caller: AccountId,
        key: ListingKey,
        new_price: Amount,
    ) -> Result<()> {
        let (seller, old_price) = {
            let order = self.orders.get(&key).ok_or(MarketError::NotLive { key })?;
            (order.seller, order.price)
        };
        if seller != caller {
            return Err(MarketError::NotSeller { key });
        }
        if new_price == 0 {
            return Err(MarketError::InvalidPrice {
                reason: "order price must be greater than zero".into(),
            });
        }
        if self.offers.get(&key).is_some_and(|m| !m.is_empty()) {
            return Err(MarketError::HasPendingOffers { key });
        }

        if let Some(order) = self.orders.get_mut(&key) {
            order.price = new_price;
        }
        self.emit(MarketEvent::OrderEdited {
            key,
            old_price,
            new_price,
        });
        Ok(())
    }

    /// Cancel a live order: refund every pending offer, return the asset to
    /// the seller.
    ///
    /// # Errors
    /// `NotLive`, `NotSeller`; `CustodyViolation` only on a broken
    /// invariant.
    pub fn cancel_order(
        &mut self,
        assets: &mut dyn AssetLedger,
        funds: &mut dyn CurrencyLedger,
        caller: AccountId,
        key: ListingKey,
    ) -> Result<()> {
        let seller = {
            let order = self.orders.get(&key).ok_or(MarketError::NotLive { key })?;
            if order.seller != caller {
                return Err(MarketError::NotSeller { key });
            }
            order.seller
        };

        let (offers_refunded, refunds_failed) = self.refund_offers(funds, key);
        self.custody
            .release(assets, key.collection, key.asset_id, seller)?;
        self.orders.remove(&key);
        self.emit(MarketEvent::OrderCanceled {
            key,
            seller,
            offers_refunded,
            refunds_failed,
        });
        Ok(())
    }

    /// Buy a live order outright at its asking price.
    ///
    /// Settles `price` with the fee split, refunds every pending offer,
    /// hands the asset to the buyer, and removes the order.
    ///
    /// # Errors
    /// `NotLive`, `ProposerIsSeller`, `InsufficientFunds`.
    pub fn buy(
        &mut self,
        assets: &mut dyn AssetLedger,
        funds: &mut dyn CurrencyLedger,
        caller: AccountId,
        key: ListingKey,
        attached: Amount,
    ) -> Result<()> {
        let (seller, currency, price) = {
            let order = self.orders.get(&key).ok_or(MarketError::NotLive { key })?;
            (order.seller, order.currency, order.price)
        };
        if caller == seller {
            return Err(MarketError::ProposerIsSeller { key });
        }

        let split = self.settlement.charge_with_fee(
            funds,
            caller,
            currency,
            price,
            attached,
            seller,
            &self.config,
        )?;
        self.refund_offers(funds, key);
        self.custody
            .release(assets, key.collection, key.asset_id, caller)?;
        self.orders.remove(&key);
        self.emit(MarketEvent::OrderBought {
            key,
            seller,
            buyer: caller,
            price,
            fee: split.fee,
        });
        Ok(())
    }

    /// Make an offer below (or at) the asking price. Escrows the amount.
    ///
    /// # Errors
    /// `NotLive`, `InvalidPrice`, `OfferExceedsPrice`, `ProposerIsSeller`,
    /// `OfferExists`, `InsufficientFunds`.
    pub fn create_offer(
        &mut self,
        funds: &mut dyn CurrencyLedger,
        caller: AccountId,
        key: ListingKey,
        amount: Amount,
        attached: Amount,
    ) -> Result<()> {
        let (seller, currency, price) = {
            let order = self.orders.get(&key).ok_or(MarketError::NotLive { key })?;
            (order.seller, order.currency, order.price)
        };
        if amount == 0 {
            return Err(MarketError::InvalidPrice {
                reason: "offer amount must be greater than zero".into(),
            });
        }
        if amount > price {
            return Err(MarketError::OfferExceedsPrice { amount, price });
        }
        if caller == seller {
            return Err(MarketError::ProposerIsSeller { key });
        }
        if self.offers.get(&key).is_some_and(|m| m.contains_key(&caller)) {
            return Err(MarketError::OfferExists {
                key,
                proposer: caller,
            });
        }

        let escrow_id = self.settlement.escrow(funds, caller, currency, amount, attached)?;
        let created_at = self.now();
        self.offers.entry(key).or_default().insert(
            caller,
            Offer {
                proposer: caller,
                amount,
                escrow_id,
                created_at,
            },
        );
        self.emit(MarketEvent::OfferCreated {
            key,
            proposer: caller,
            amount,
        });
        Ok(())
    }

    /// Withdraw one's own offer. Refunds the escrow.
    ///
    /// # Errors
    /// `NotLive`, `OfferNotFound`.
    pub fn cancel_offer(
        &mut self,
        funds: &mut dyn CurrencyLedger,
        caller: AccountId,
        key: ListingKey,
    ) -> Result<()> {
        if !self.orders.contains_key(&key) {
            return Err(MarketError::NotLive { key });
        }
        let (escrow_id, amount) = self
            .offers
            .get(&key)
            .and_then(|m| m.get(&caller))
            .map(|offer| (offer.escrow_id, offer.amount))
            .ok_or(MarketError::OfferNotFound {
                key,
                proposer: caller,
            })?;

        self.settlement.refund(funds, escrow_id)?;
        self.remove_offer(key, caller);
        self.emit(MarketEvent::OfferCanceled {
            key,
            proposer: caller,
            amount,
        });
        Ok(())
    }

    /// Seller declines one offer; its escrow is refunded, the order stays
    /// live.
    ///
    /// The proposer cannot reject their own offer — self-withdrawal is
    /// [`Marketplace::cancel_offer`].
    ///
    /// # Errors
    /// `NotLive`, `InvalidProposer`, `NotSeller`, `OfferNotFound`.
    pub fn reject_offer(
        &mut self,
        funds: &mut dyn CurrencyLedger,
        caller: AccountId,
        key: ListingKey,
        proposer: AccountId,
    ) -> Result<()> {
        let seller = {
            let order = self.orders.get(&key).ok_or(MarketError::NotLive { key })?;
            order.seller
        };
        if caller == proposer {
            return Err(MarketError::InvalidProposer { key, proposer });
        }
        if caller != seller {
            return Err(MarketError::NotSeller { key });
        }
        let (escrow_id, amount) = self
            .offers
            .get(&key)
            .and_then(|m| m.get(&proposer))
            .map(|offer| (offer.escrow_id, offer.amount))
            .ok_or(MarketError::OfferNotFound { key, proposer })?;

        self.settlement.refund(funds, escrow_id)?;
        self.remove_offer(key, proposer);
        self.emit(MarketEvent::OfferRejected {
            key,
            proposer,
            amount,
        });
        Ok(())
    }

    /// Seller accepts one offer: its escrow settles with the fee split, the
    /// asset goes to the proposer, every other offer is refunded, and the
    /// order is removed.
    ///
    /// # Errors
    /// `NotLive`, `NotSeller`, `InvalidProposer`; `CustodyViolation` /
    /// `ConservationViolation` only on broken invariants.
    pub fn accept_offer(
        &mut self,
        assets: &mut dyn AssetLedger,
        funds: &mut dyn CurrencyLedger,
        caller: AccountId,
        key: ListingKey,
        proposer: AccountId,
    ) -> Result<()> {
        let seller = {
            let order = self.orders.get(&key).ok_or(MarketError::NotLive { key })?;
            order.seller
        };
        if caller != seller {
            return Err(MarketError::NotSeller { key });
        }
        let (escrow_id, amount) = self
            .offers
            .get(&key)
            .and_then(|m| m.get(&proposer))
            .map(|offer| (offer.escrow_id, offer.amount))
            .ok_or(MarketError::InvalidProposer { key, proposer })?;

        let split = self
            .settlement
            .settle_with_fee(funds, escrow_id, seller, &self.config)?;
        // The accepted offer is already settled; drop it before the blanket
        // refund sweeps the rest.
        self.remove_offer(key, proposer);
        self.refund_offers(funds, key);
        self.custody
            .release(assets, key.collection, key.asset_id, proposer)?;
        self.orders.remove(&key);
        self.emit(MarketEvent::OfferAccepted {
            key,
            seller,
            proposer,
            amount,
            fee: split.fee,
        });
        Ok(())
    }

    // =================================================================
    // Internal helpers
    // =================================================================

    /// Refund every remaining offer on `key` and drop them. Each refund is
    /// independent: one failure (only reachable once an internal invariant
    /// has already broken) is logged and counted, and never blocks the
    /// remaining refunds. Returns `(refunded, failed)`.
    pub(crate) fn refund_offers(
        &mut self,
        funds: &mut dyn CurrencyLedger,
        key: ListingKey,
    ) -> (usize, usize) {
        let Some(entries) = self.offers.remove(&key) else {
            return (0, 0);
        };
        let mut refunded = 0;
        let mut failed = 0;
        for (proposer, offer) in entries {
            match self.settlement.refund(funds, offer.escrow_id) {
                Ok(_) => refunded += 1,
                Err(error) => {
                    failed += 1;
                    tracing::error!(
                        %key,
                        %proposer,
                        escrow = %offer.escrow_id,
                        %error,
                        "offer refund failed; continuing remaining refunds"
                    );
                }
            }
        }
        (refunded, failed)
    }

    fn remove_offer(&mut self, key: ListingKey, proposer: AccountId) {
        if let Some(entries) = self.offers.get_mut(&key) {
            entries.remove(&proposer);
            if entries.is_empty() {
                self.offers.remove(&key);
            }
        }
    }
}
