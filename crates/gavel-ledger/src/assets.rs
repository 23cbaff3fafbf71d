//! Per-collection ownership ledger for unique assets.
//!
//! The engine only ever talks to the [`AssetLedger`] trait; the in-memory
//! implementation is the reference collaborator used in tests and
//! single-process deployments. All mutations are atomic: either the full
//! operation succeeds or the ledger is unchanged.

use std::collections::{HashMap, HashSet};

use gavel_types::{AccountId, AssetId, CollectionId, ListingKey, MarketError, Result};

/// Ownership ledger for unique assets, one logical ledger per deployment
/// covering all collections.
pub trait AssetLedger {
    /// Whether the asset exists in its collection.
    fn exists(&self, collection: CollectionId, asset_id: AssetId) -> bool;

    /// Current owner, or `None` if the asset does not exist.
    fn owner_of(&self, collection: CollectionId, asset_id: AssetId) -> Option<AccountId>;

    /// Grant or revoke `operator`'s right to move every asset `owner` holds
    /// in `collection`.
    fn set_approval_for_all(
        &mut self,
        owner: AccountId,
        operator: AccountId,
        collection: CollectionId,
        approved: bool,
    );

    /// Whether `operator` may move `owner`'s assets in `collection`.
    fn is_approved_for_all(
        &self,
        owner: AccountId,
        operator: AccountId,
        collection: CollectionId,
    ) -> bool;

    /// Move an asset from `from` to `to`, on the authority of `operator`.
    ///
    /// # Errors
    /// - `InvalidAsset` if the asset does not exist
    /// - `NotOwner` if `from` is not the current owner, or `operator` is
    ///   neither `from` nor an approved operator for `from`
    fn transfer(
        &mut self,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        collection: CollectionId,
        asset_id: AssetId,
    ) -> Result<()>;
}

/// HashMap-backed reference implementation of [`AssetLedger`].
#[derive(Debug, Default)]
pub struct InMemoryAssetLedger {
    /// Current owner per asset.
    owners: HashMap<(CollectionId, AssetId), AccountId>,
    /// Operator approvals: (owner, operator, collection).
    approvals: HashSet<(AccountId, AccountId, CollectionId)>,
    /// Next token id per collection.
    next_id: HashMap<CollectionId, u64>,
}

impl InMemoryAssetLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh asset to `owner` and return its id. Ids are sequential
    /// per collection, starting at 0.
    pub fn mint(&mut self, collection: CollectionId, owner: AccountId) -> AssetId {
        let next = self.next_id.entry(collection).or_insert(0);
        let asset_id = AssetId(*next);
        *next += 1;
        self.owners.insert((collection, asset_id), owner);
        asset_id
    }
}

impl AssetLedger for InMemoryAssetLedger {
    fn exists(&self, collection: CollectionId, asset_id: AssetId) -> bool {
        self.owners.contains_key(&(collection, asset_id))
    }

    fn owner_of(&self, collection: CollectionId, asset_id: AssetId) -> Option<AccountId> {
        self.owners.get(&(collection, asset_id)).copied()
    }

    fn set_approval_for_all(
        &mut self,
        owner: AccountId,
        operator: AccountId,
        collection: CollectionId,
        approved: bool,
    ) {
        if approved {
            self.approvals.insert((owner, operator, collection));
        } else {
            self.approvals.remove(&(owner, operator, collection));
        }
    }

    fn is_approved_for_all(
        &self,
        owner: AccountId,
        operator: AccountId,
        collection: CollectionId,
    ) -> bool {
        self.approvals.contains(&(owner, operator, collection))
    }

    fn transfer(
        &mut self,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        collection: CollectionId,
        asset_id: AssetId,
    ) -> Result<()> {
        let key = ListingKey::new(collection, asset_id);
        let owner = self
            .owners
            .get(&(collection, asset_id))
            .copied()
            .ok_or(MarketError::InvalidAsset { key })?;

        if owner != from {
            return Err(MarketError::NotOwner { key });
        }
        if operator != from && !self.is_approved_for_all(from, operator, collection) {
            return Err(MarketError::NotOwner { key });
        }

        self.owners.insert((collection, asset_id), to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_assigns_sequential_ids() {
        let mut ledger = InMemoryAssetLedger::new();
        let collection = CollectionId::new();
        let owner = AccountId::new();
        assert_eq!(ledger.mint(collection, owner), AssetId(0));
        assert_eq!(ledger.mint(collection, owner), AssetId(1));
        assert_eq!(ledger.owner_of(collection, AssetId(0)), Some(owner));
    }

    #[test]
    fn transfer_by_owner() {
        let mut ledger = InMemoryAssetLedger::new();
        let collection = CollectionId::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let id = ledger.mint(collection, alice);

        ledger.transfer(alice, alice, bob, collection, id).unwrap();
        assert_eq!(ledger.owner_of(collection, id), Some(bob));
    }

    #[test]
    fn transfer_by_approved_operator() {
        let mut ledger = InMemoryAssetLedger::new();
        let collection = CollectionId::new();
        let alice = AccountId::new();
        let market = AccountId::new();
        let id = ledger.mint(collection, alice);

        ledger.set_approval_for_all(alice, market, collection, true);
        ledger.transfer(market, alice, market, collection, id).unwrap();
        assert_eq!(ledger.owner_of(collection, id), Some(market));
    }

    #[test]
    fn transfer_by_stranger_rejected() {
        let mut ledger = InMemoryAssetLedger::new();
        let collection = CollectionId::new();
        let alice = AccountId::new();
        let mallory = AccountId::new();
        let id = ledger.mint(collection, alice);

        let err = ledger
            .transfer(mallory, alice, mallory, collection, id)
            .unwrap_err();
        assert!(matches!(err, MarketError::NotOwner { .. }));
        assert_eq!(ledger.owner_of(collection, id), Some(alice));
    }

    #[test]
    fn transfer_wrong_from_rejected() {
        let mut ledger = InMemoryAssetLedger::new();
        let collection = CollectionId::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let id = ledger.mint(collection, alice);

        let err = ledger.transfer(bob, bob, bob, collection, id).unwrap_err();
        assert!(matches!(err, MarketError::NotOwner { .. }));
    }

    #[test]
    fn nonexistent_asset_is_invalid() {
        let mut ledger = InMemoryAssetLedger::new();
        let collection = CollectionId::new();
        let alice = AccountId::new();

        assert!(!ledger.exists(collection, AssetId(100)));
        let err = ledger
            .transfer(alice, alice, alice, collection, AssetId(100))
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidAsset { .. }));
    }

    #[test]
    fn approval_revocation() {
        let mut ledger = InMemoryAssetLedger::new();
        let collection = CollectionId::new();
        let alice = AccountId::new();
        let market = AccountId::new();
        let id = ledger.mint(collection, alice);

        ledger.set_approval_for_all(alice, market, collection, true);
        ledger.set_approval_for_all(alice, market, collection, false);
        let err = ledger
            .transfer(market, alice, market, collection, id)
            .unwrap_err();
        assert!(matches!(err, MarketError::NotOwner { .. }));
    }
}
