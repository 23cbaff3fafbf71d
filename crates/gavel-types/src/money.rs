//! Money representation.
//!
//! All amounts are plain `u128` minor units. Integer arithmetic only —
//! fee math uses truncating division, so a computed fee is never above the
//! exact percentage.

/// An amount of currency in minor units.
pub type Amount = u128;

/// The split of a settled amount into marketplace fee and seller proceeds.
///
/// Invariant: `fee + proceeds == amount` exactly for the settled amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeeSplit {
    pub fee: Amount,
    pub proceeds: Amount,
}

impl FeeSplit {
    /// The total amount the split was computed from.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.fee + self.proceeds
    }
}
