//! Allow-list registry for settlement currencies and asset collections.
//!
//! An explicit object injected into the engines at construction — not
//! ambient global state. Lookups are pure and infallible ("not found" is
//! `false`); mutation goes through the privileged admin interface.

use std::collections::HashSet;

use gavel_types::{AccountId, CollectionId, CurrencyId, MarketError, Result};

/// Allow-lists of eligible settlement currencies and asset collections.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    admin: AccountId,
    currencies: HashSet<CurrencyId>,
    collections: HashSet<CollectionId>,
}

impl AssetRegistry {
    /// Create an empty registry administered by `admin`. The native
    /// currency is always allowed and needs no entry.
    #[must_use]
    pub fn new(admin: AccountId) -> Self {
        Self {
            admin,
            currencies: HashSet::new(),
            collections: HashSet::new(),
        }
    }

    // =================================================================
    // Queries (pure, no failure modes)
    // =================================================================

    #[must_use]
    pub fn is_currency_allowed(&self, currency: CurrencyId) -> bool {
        currency.is_native() || self.currencies.contains(&currency)
    }

    #[must_use]
    pub fn is_collection_allowed(&self, collection: CollectionId) -> bool {
        self.collections.contains(&collection)
    }

    // =================================================================
    // Administration (privileged)
    // =================================================================

    /// # Errors
    /// Returns `NotAdmin` if `caller` is not the registry administrator.
    pub fn allow_currency(&mut self, caller: AccountId, currency: CurrencyId) -> Result<()> {
        self.check_admin(caller)?;
        self.currencies.insert(currency);
        tracing::info!(%currency, "currency allow-listed");
        Ok(())
    }

    /// # Errors
    /// Returns `NotAdmin` if `caller` is not the registry administrator.
    pub fn allow_collection(&mut self, caller: AccountId, collection: CollectionId) -> Result<()> {
        self.check_admin(caller)?;
        self.collections.insert(collection);
        tracing::info!(%collection, "collection allow-listed");
        Ok(())
    }

    /// # Errors
    /// Returns `NotAdmin` if `caller` is not the registry administrator.
    pub fn revoke_currency(&mut self, caller: AccountId, currency: CurrencyId) -> Result<()> {
        self.check_admin(caller)?;
        self.currencies.remove(&currency);
        tracing::info!(%currency, "currency removed from allow-list");
        Ok(())
    }

    /// # Errors
    /// Returns `NotAdmin` if `caller` is not the registry administrator.
    pub fn revoke_collection(&mut self, caller: AccountId, collection: CollectionId) -> Result<()> {
        self.check_admin(caller)?;
        self.collections.remove(&collection);
        tracing::info!(%collection, "collection removed from allow-list");
        Ok(())
    }

    fn check_admin(&self, caller: AccountId) -> Result<()> {
        if caller == self.admin {
            Ok(())
        } else {
            Err(MarketError::NotAdmin(caller))
        }
    }
}
