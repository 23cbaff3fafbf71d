//! The marketplace facade: configuration, registry, custody, settlement,
//! both engines' state, the injected clock, and the event log.
//!
//! Construction wires every collaborator by dependency injection. The
//! trading operations live in sibling modules as `impl Marketplace` blocks:
//! [`crate::orders`] and [`crate::auctions`] mutate, [`crate::query`] reads.
//!
//! Linearizability: every operation takes `&mut self`, so the type system
//! itself serializes calls against one marketplace instance. No operation
//! leaves an intermediate state observable — all fallible checks precede
//! the first mutation.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use gavel_types::{
    AccountId, Auction, Clock, CollectionId, CurrencyId, ListingKey, MarketConfig, MarketError,
    MarketEvent, Offer, Order, Result,
};

use gavel_ledger::AssetRegistry;
use gavel_settlement::{CustodyManager, PaymentSettlement};

/// One marketplace instance: two trading modes over one settlement core.
pub struct Marketplace {
    pub(crate) config: MarketConfig,
    pub(crate) registry: AssetRegistry,
    pub(crate) custody: CustodyManager,
    pub(crate) settlement: PaymentSettlement,
    clock: Box<dyn Clock>,

    /// Live fixed-price orders by listing key.
    pub(crate) orders: HashMap<ListingKey, Order>,
    /// Live offers per listing key, ordered by proposer for deterministic
    /// refund iteration.
    pub(crate) offers: HashMap<ListingKey, BTreeMap<AccountId, Offer>>,
    /// Live (and expired-but-unsettled) auctions by listing key.
    pub(crate) auctions: HashMap<ListingKey, Auction>,

    pub(crate) order_seq: u64,
    pub(crate) auction_seq: u64,

    /// Append-only audit trail: exactly one event per successful
    /// transition, none on failure.
    events: Vec<MarketEvent>,
}

impl std::fmt::Debug for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marketplace")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("custody", &self.custody)
            .field("settlement", &self.settlement)
            .field("clock", &"<dyn Clock>")
            .field("orders", &self.orders)
            .field("offers", &self.offers)
            .field("auctions", &self.auctions)
            .field("order_seq", &self.order_seq)
            .field("auction_seq", &self.auction_seq)
            .field("events", &self.events)
            .finish()
    }
}

impl Marketplace {
    /// Build a marketplace from its injected collaborators.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration fails validation.
    pub fn new(config: MarketConfig, registry: AssetRegistry, clock: Box<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let custody = CustodyManager::new(config.custodian);
        let settlement = PaymentSettlement::new(config.custodian);
        Ok(Self {
            config,
            registry,
            custody,
            settlement,
            clock,
            orders: HashMap::new(),
            offers: HashMap::new(),
            auctions: HashMap::new(),
            order_seq: 0,
            auction_seq: 0,
            events: Vec::new(),
        })
    }

    // =================================================================
    // Accessors
    // =================================================================

    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Mutable registry access for the administrative allow-list interface.
    pub fn registry_mut(&mut self) -> &mut AssetRegistry {
        &mut self.registry
    }

    /// The settlement plane (escrow vault inspection, conservation checks).
    #[must_use]
    pub fn settlement(&self) -> &PaymentSettlement {
        &self.settlement
    }

    /// The account holding custodied assets and escrowed funds.
    #[must_use]
    pub fn custodian(&self) -> AccountId {
        self.config.custodian
    }

    /// The audit trail of every successful transition, oldest first.
    #[must_use]
    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }

    // =================================================================
    // Internal helpers shared by both engines
    // =================================================================

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Record a successful transition: one audit-log entry, one structured
    /// trace record. Must only be called after every fallible step.
    pub(crate) fn emit(&mut self, event: MarketEvent) {
        tracing::info!(event = event.label(), key = %event.key(), "state transition");
        self.events.push(event);
    }

    /// At most one live listing — of either kind — per key. An auction that
    /// expired without settlement still holds the asset in custody, so its
    /// presence blocks relisting too.
    pub(crate) fn ensure_not_listed(&self, key: ListingKey) -> Result<()> {
        if self.orders.contains_key(&key) || self.auctions.contains_key(&key) {
            return Err(MarketError::AlreadyListed { key });
        }
        Ok(())
    }

    /// Registry gate shared by both create paths.
    pub(crate) fn ensure_allowed(
        &self,
        collection: CollectionId,
        currency: CurrencyId,
    ) -> Result<()> {
        if !self.registry.is_currency_allowed(currency) {
            return Err(MarketError::CurrencyNotAllowed);
        }
        if !self.registry.is_collection_allowed(collection) {
            return Err(MarketError::CollectionNotAllowed);
        }
        Ok(())
    }
}
