//! Identifiers used throughout Gavel.
//!
//! Account and collection ids use UUIDv7 for time-ordered lexicographic
//! sorting. `CurrencyId` reserves the nil UUID as the native-currency
//! sentinel, and `AssetId` is the integer token id within a collection.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Unique identifier for an account (seller, buyer, bidder, treasury, or the
/// marketplace custodian itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CollectionId
// ---------------------------------------------------------------------------

/// Unique identifier for a collection of unique assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CollectionId(pub Uuid);

impl CollectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "col:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CurrencyId
// ---------------------------------------------------------------------------

/// Identifier for a fungible settlement currency.
///
/// The nil UUID is the **native-currency sentinel**: value attached directly
/// to a call rather than pulled through an allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CurrencyId(pub Uuid);

impl CurrencyId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The native-currency sentinel (nil UUID).
    #[must_use]
    pub const fn native() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this id is the native-currency sentinel.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for CurrencyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "cur:native")
        } else {
            write!(f, "cur:{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Integer token id of a unique asset within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ListingKey
// ---------------------------------------------------------------------------

/// The unique identity of one tradeable unit: `(collection, asset id)`.
///
/// At most one live Order and at most one live Auction may exist for the
/// same key at any time — and never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ListingKey {
    pub collection: CollectionId,
    pub asset_id: AssetId,
}

impl ListingKey {
    #[must_use]
    pub fn new(collection: CollectionId, asset_id: AssetId) -> Self {
        Self {
            collection,
            asset_id,
        }
    }
}

impl fmt::Display for ListingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.asset_id)
    }
}

// ---------------------------------------------------------------------------
// EscrowId
// ---------------------------------------------------------------------------

/// Sequential identifier for an escrow record held by the settlement plane.
///
/// Sequential rather than random so that escrow ordering is deterministic
/// and replayable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EscrowId(pub u64);

impl fmt::Display for EscrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "esc:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
