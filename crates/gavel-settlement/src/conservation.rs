//! Funds-conservation invariant checks.
//!
//! Two invariants hold at rest after every completed transition:
//!
//! ```text
//! ∀ currency: Σ(balances) == Σ(minted)                    (supply)
//! ∀ currency: balance(custodian) == Σ(ACTIVE escrows)     (escrow backing)
//! ```
//!
//! The engine never mints or burns, so supply conservation catches any
//! duplicated or vanished funds; escrow backing catches stranded or
//! double-released escrow. If either check fails, something has gone
//! catastrophically wrong — callers should halt, not retry.

use gavel_types::{CurrencyId, MarketError, Result};

use gavel_ledger::CurrencyLedger;

use crate::escrow::EscrowVault;
use crate::settlement::PaymentSettlement;

/// Verify that the sum of all balances equals the total ever minted.
///
/// # Errors
/// Returns [`MarketError::ConservationViolation`] on mismatch.
pub fn verify_supply(funds: &dyn CurrencyLedger, currency: CurrencyId) -> Result<()> {
    let actual = funds.total_supply(currency);
    let expected = funds.total_minted(currency);
    if actual != expected {
        return Err(MarketError::ConservationViolation {
            reason: format!(
                "currency {currency}: total supply {actual} != total minted {expected}"
            ),
        });
    }
    Ok(())
}

/// Verify that the custodian's balance exactly backs the ACTIVE escrows.
///
/// # Errors
/// Returns [`MarketError::ConservationViolation`] on mismatch.
pub fn verify_escrow_backing(
    settlement: &PaymentSettlement,
    funds: &dyn CurrencyLedger,
    currency: CurrencyId,
) -> Result<()> {
    let held = funds.balance_of(settlement.custodian(), currency);
    let owed = settlement.vault().active_total(currency);
    if held != owed {
        return Err(MarketError::ConservationViolation {
            reason: format!(
                "currency {currency}: custodian holds {held} but ACTIVE escrows total {owed}"
            ),
        });
    }
    Ok(())
}

/// Convenience: both checks for one currency.
///
/// # Errors
/// Returns [`MarketError::ConservationViolation`] if either check fails.
pub fn verify_all(
    settlement: &PaymentSettlement,
    funds: &dyn CurrencyLedger,
    currency: CurrencyId,
) -> Result<()> {
    verify_supply(funds, currency)?;
    verify_escrow_backing(settlement, funds, currency)
}

/// Escrow-vault-only view of backing, for callers that hold the vault but
/// not the settlement plane.
#[must_use]
pub fn active_escrow_total(vault: &EscrowVault, currency: CurrencyId) -> u128 {
    vault.active_total(currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_types::{AccountId, MarketConfig};

    use gavel_ledger::InMemoryCurrencyLedger;

    #[test]
    fn empty_ledger_conserves() {
        let funds = InMemoryCurrencyLedger::new();
        let settlement = PaymentSettlement::new(AccountId::new());
        verify_all(&settlement, &funds, CurrencyId::native()).unwrap();
    }

    #[test]
    fn backing_holds_through_escrow_lifecycle() {
        let treasury = AccountId::new();
        let custodian = AccountId::new();
        let config = MarketConfig::new(treasury, custodian);
        let mut settlement = PaymentSettlement::new(custodian);
        let mut funds = InMemoryCurrencyLedger::new();

        let payer = AccountId::new();
        let seller = AccountId::new();
        let native = CurrencyId::native();
        funds.mint(payer, native, 1_000);

        let id = settlement.escrow(&mut funds, payer, native, 600, 600).unwrap();
        verify_all(&settlement, &funds, native).unwrap();

        settlement
            .settle_with_fee(&mut funds, id, seller, &config)
            .unwrap();
        verify_all(&settlement, &funds, native).unwrap();

        // Custodian ends empty.
        assert_eq!(funds.balance_of(custodian, native), 0);
    }

    #[test]
    fn detects_stranded_escrow() {
        let custodian = AccountId::new();
        let settlement = PaymentSettlement::new(custodian);
        let mut funds = InMemoryCurrencyLedger::new();
        let native = CurrencyId::native();

        // Funds parked on the custodian without a matching escrow record.
        funds.mint(custodian, native, 50);
        let err = verify_escrow_backing(&settlement, &funds, native).unwrap_err();
        assert!(matches!(err, MarketError::ConservationViolation { .. }));
    }
}
