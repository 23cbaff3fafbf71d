//! Asset custody — exclusive possession of a listed asset for the lifetime
//! of its listing.
//!
//! `lock` can fail for ordinary user reasons (wrong owner, missing asset,
//! missing operator approval). `release` cannot: once the marketplace holds
//! an asset, a rejected release means the ownership ledger and the engine
//! have diverged, which surfaces as the fatal `CustodyViolation`.

use gavel_types::{AccountId, AssetId, CollectionId, ListingKey, MarketError, Result};

use gavel_ledger::AssetLedger;

/// Takes and releases custody of unique assets on behalf of the
/// marketplace.
#[derive(Debug, Clone, Copy)]
pub struct CustodyManager {
    /// Account that holds custodied assets.
    custodian: AccountId,
}

impl CustodyManager {
    #[must_use]
    pub fn new(custodian: AccountId) -> Self {
        Self { custodian }
    }

    /// Take custody of an asset from its owner.
    ///
    /// # Errors
    /// - `InvalidAsset` if the asset does not exist
    /// - `NotOwner` if `from` is not the current owner, or the custodian
    ///   lacks operator approval for `from`'s assets in this collection
    pub fn lock(
        &self,
        assets: &mut dyn AssetLedger,
        collection: CollectionId,
        asset_id: AssetId,
        from: AccountId,
    ) -> Result<()> {
        let key = ListingKey::new(collection, asset_id);
        let owner = assets
            .owner_of(collection, asset_id)
            .ok_or(MarketError::InvalidAsset { key })?;
        if owner != from {
            return Err(MarketError::NotOwner { key });
        }

        assets.transfer(self.custodian, from, self.custodian, collection, asset_id)?;
        tracing::debug!(%key, %from, "asset custodied");
        Ok(())
    }

    /// Hand a custodied asset to `to` (buyer, winner, or the seller on
    /// cancel).
    ///
    /// # Errors
    /// Returns `CustodyViolation` if the ownership ledger rejects the
    /// transfer — the engine's custody bookkeeping no longer matches the
    /// ledger, which is a broken invariant.
    pub fn release(
        &self,
        assets: &mut dyn AssetLedger,
        collection: CollectionId,
        asset_id: AssetId,
        to: AccountId,
    ) -> Result<()> {
        let key = ListingKey::new(collection, asset_id);
        assets
            .transfer(self.custodian, self.custodian, to, collection, asset_id)
            .map_err(|err| MarketError::CustodyViolation {
                reason: format!("release of {key} to {to} rejected: {err}"),
            })?;
        tracing::debug!(%key, %to, "asset released from custody");
        Ok(())
    }

    /// The account holding custodied assets.
    #[must_use]
    pub fn custodian(&self) -> AccountId {
        self.custodian
    }
}
