//! Configuration for a Gavel marketplace instance.

use serde::{Deserialize, Serialize};

use crate::{AccountId, MarketError, Result, constants};

/// Marketplace configuration, supplied at construction and read-only to the
/// core during settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Fee rate in basis points (parts per 10 000), deducted from every
    /// settled amount and routed to the treasury.
    pub fee_bps: u64,
    /// Account that receives marketplace fees.
    pub treasury: AccountId,
    /// Account that holds custodied assets and escrowed funds.
    pub custodian: AccountId,
    /// When `true`, `win_bid` requires the auction's time window to have
    /// elapsed. When `false`, settlement is callable as soon as any bid
    /// exists.
    pub settle_requires_expiry: bool,
}

impl MarketConfig {
    /// Create a config with the default fee rate and immediate settlement.
    #[must_use]
    pub fn new(treasury: AccountId, custodian: AccountId) -> Self {
        Self {
            fee_bps: constants::DEFAULT_FEE_BPS,
            treasury,
            custodian,
            settle_requires_expiry: false,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `fee_bps` exceeds 100% or the treasury and
    /// custodian accounts collide (fees would be paid into escrow custody).
    pub fn validate(&self) -> Result<()> {
        if self.fee_bps > constants::BPS_DENOMINATOR {
            return Err(MarketError::InvalidConfig {
                reason: format!(
                    "fee_bps {} exceeds denominator {}",
                    self.fee_bps,
                    constants::BPS_DENOMINATOR
                ),
            });
        }
        if self.treasury == self.custodian {
            return Err(MarketError::InvalidConfig {
                reason: "treasury and custodian must be distinct accounts".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MarketConfig::new(AccountId::new(), AccountId::new());
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.fee_bps, 300);
        assert!(!cfg.settle_requires_expiry);
    }

    #[test]
    fn fee_above_denominator_rejected() {
        let mut cfg = MarketConfig::new(AccountId::new(), AccountId::new());
        cfg.fee_bps = 10_001;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, MarketError::InvalidConfig { .. }));
    }

    #[test]
    fn treasury_custodian_collision_rejected() {
        let account = AccountId::new();
        let cfg = MarketConfig::new(account, account);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = MarketConfig::new(AccountId::new(), AccountId::new());
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MarketConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.fee_bps, back.fee_bps);
        assert_eq!(cfg.treasury, back.treasury);
    }
}
