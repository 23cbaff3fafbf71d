//! Payment settlement — the only component that moves money.
//!
//! Two payment paths share one fee formula:
//! - **escrowed**: `escrow` pulls funds into the custodian account and opens
//!   a vault record; `refund` or `settle_with_fee` closes it exactly once.
//! - **direct**: `charge_with_fee` moves a buyer's payment straight to
//!   seller and treasury with no intervening escrow record.
//!
//! Every operation validates completely before the first transfer, so a
//! failure leaves zero state change and zero fund movement.

use gavel_types::{
    AccountId, Amount, CurrencyId, EscrowId, FeeSplit, MarketConfig, MarketError, Result,
    constants::BPS_DENOMINATOR,
};

use gavel_ledger::CurrencyLedger;

use crate::escrow::{Escrow, EscrowVault};

/// Marketplace fee: `floor(amount * fee_bps / 10_000)`.
///
/// Split-division form so the computation is total for every `u128` amount
/// (`fee_bps` is capped at the denominator by config validation, so neither
/// product can overflow). Truncation rounds the fee down — the fee is never
/// above the exact percentage.
#[must_use]
pub fn compute_fee(amount: Amount, fee_bps: u64) -> Amount {
    let bps = Amount::from(fee_bps);
    let denominator = Amount::from(BPS_DENOMINATOR);
    let whole = amount / denominator;
    let rest = amount % denominator;
    whole * bps + rest * bps / denominator
}

/// Split an amount into fee and seller proceeds. `fee + proceeds == amount`
/// exactly.
#[must_use]
pub fn split_fee(amount: Amount, fee_bps: u64) -> FeeSplit {
    let fee = compute_fee(amount, fee_bps);
    FeeSplit {
        fee,
        proceeds: amount - fee,
    }
}

/// Escrow custody and fee-routing settlement over an injected
/// [`CurrencyLedger`].
#[derive(Debug)]
pub struct PaymentSettlement {
    /// Account that holds escrowed funds.
    custodian: AccountId,
    vault: EscrowVault,
}

impl PaymentSettlement {
    #[must_use]
    pub fn new(custodian: AccountId) -> Self {
        Self {
            custodian,
            vault: EscrowVault::new(),
        }
    }

    /// Check that `payer` could fund an escrow of `amount` right now,
    /// without moving anything. Used to order multi-step transitions so
    /// that no refund happens before the incoming escrow is known good.
    ///
    /// `credit` is money that an earlier step of the same transition will
    /// hand back to the payer before the escrow executes (e.g. a bidder
    /// raising their own highest bid gets their previous escrow refunded
    /// first); pass 0 otherwise.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the attached value (native), balance,
    /// or allowance (fungible) is short.
    pub fn ensure_can_escrow(
        &self,
        funds: &dyn CurrencyLedger,
        payer: AccountId,
        currency: CurrencyId,
        amount: Amount,
        attached: Amount,
        credit: Amount,
    ) -> Result<()> {
        if currency.is_native() {
            if attached < amount {
                return Err(MarketError::InsufficientFunds {
                    needed: amount,
                    available: attached,
                });
            }
        } else {
            let approved = funds.allowance(payer, self.custodian, currency);
            if approved < amount {
                return Err(MarketError::InsufficientFunds {
                    needed: amount,
                    available: approved,
                });
            }
        }
        let available = funds.balance_of(payer, currency).saturating_add(credit);
        if available < amount {
            return Err(MarketError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Escrow `amount` from `payer` into the custodian account.
    ///
    /// Native currency: `attached` is the value sent along with the call and
    /// must cover `amount`; any excess is never debited from the payer
    /// (equivalent to an immediate refund of the overpayment). Fungible
    /// currency: `amount` is pulled through the payer's pre-approved
    /// allowance for the custodian; `attached` is ignored.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the attached value, balance, or
    /// allowance is short. On error nothing has moved.
    pub fn escrow(
        &mut self,
        funds: &mut dyn CurrencyLedger,
        payer: AccountId,
        currency: CurrencyId,
        amount: Amount,
        attached: Amount,
    ) -> Result<EscrowId> {
        self.ensure_can_escrow(funds, payer, currency, amount, attached, 0)?;

        if currency.is_native() {
            funds.transfer(payer, self.custodian, currency, amount)?;
        } else {
            funds.transfer_from(self.custodian, payer, self.custodian, currency, amount)?;
        }

        let id = self.vault.open(payer, currency, amount);
        tracing::debug!(escrow = %id, %payer, %currency, amount, "funds escrowed");
        Ok(id)
    }

    /// Return an ACTIVE escrow to its payer and mark it RELEASED.
    ///
    /// # Errors
    /// - `EscrowNotFound` / `EscrowNotActive` for a missing or closed record
    /// - `ConservationViolation` if the custodian cannot cover the refund —
    ///   a broken invariant, not a user error
    pub fn refund(&mut self, funds: &mut dyn CurrencyLedger, id: EscrowId) -> Result<Escrow> {
        let escrow = self.vault.active(id)?;
        let (payer, currency, amount) = (escrow.payer, escrow.currency, escrow.amount);

        self.ensure_backing(funds, currency, amount)?;
        funds.transfer(self.custodian, payer, currency, amount)?;
        let released = self.vault.mark_released(id)?;
        tracing::debug!(escrow = %id, %payer, amount, "escrow refunded");
        Ok(released)
    }

    /// Settle an ACTIVE escrow: fee to the treasury, the rest to `seller`,
    /// record marked SPENT. Both transfers belong to the same logical
    /// transaction — full validation precedes the first one.
    ///
    /// # Errors
    /// - `EscrowNotFound` / `EscrowNotActive` for a missing or closed record
    /// - `ConservationViolation` if the custodian cannot cover the amount
    pub fn settle_with_fee(
        &mut self,
        funds: &mut dyn CurrencyLedger,
        id: EscrowId,
        seller: AccountId,
        config: &MarketConfig,
    ) -> Result<FeeSplit> {
        let escrow = self.vault.active(id)?;
        let (currency, amount) = (escrow.currency, escrow.amount);
        let split = split_fee(amount, config.fee_bps);

        self.ensure_backing(funds, currency, amount)?;
        funds.transfer(self.custodian, config.treasury, currency, split.fee)?;
        funds.transfer(self.custodian, seller, currency, split.proceeds)?;
        self.vault.mark_spent(id)?;

        tracing::debug!(
            escrow = %id,
            %seller,
            amount,
            fee = split.fee,
            "escrow settled with fee"
        );
        Ok(split)
    }

    /// Direct purchase: charge `amount` from `payer`, routing the fee to
    /// the treasury and the rest to `seller`, with no escrow record.
    ///
    /// Payment authorization follows the same native/fungible rules as
    /// [`PaymentSettlement::escrow`].
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the payment cannot be covered. On
    /// error nothing has moved.
    #[allow(clippy::too_many_arguments)]
    pub fn charge_with_fee(
        &mut self,
        funds: &mut dyn CurrencyLedger,
        payer: AccountId,
        currency: CurrencyId,
        amount: Amount,
        attached: Amount,
        seller: AccountId,
        config: &MarketConfig,
    ) -> Result<FeeSplit> {
        self.ensure_can_escrow(funds, payer, currency, amount, attached, 0)?;
        let split = split_fee(amount, config.fee_bps);

        if currency.is_native() {
            funds.transfer(payer, config.treasury, currency, split.fee)?;
            funds.transfer(payer, seller, currency, split.proceeds)?;
        } else {
            funds.transfer_from(self.custodian, payer, config.treasury, currency, split.fee)?;
            funds.transfer_from(self.custodian, payer, seller, currency, split.proceeds)?;
        }

        tracing::debug!(%payer, %seller, amount, fee = split.fee, "direct charge settled");
        Ok(split)
    }

    /// The account holding escrowed funds.
    #[must_use]
    pub fn custodian(&self) -> AccountId {
        self.custodian
    }

    /// Read access to the escrow vault (conservation checks, tests).
    #[must_use]
    pub fn vault(&self) -> &EscrowVault {
        &self.vault
    }

    /// The custodian must hold at least `amount` before paying out of
    /// escrow; anything less means bookkeeping and funds have diverged.
    fn ensure_backing(
        &self,
        funds: &dyn CurrencyLedger,
        currency: CurrencyId,
        amount: Amount,
    ) -> Result<()> {
        let held = funds.balance_of(self.custodian, currency);
        if held < amount {
            return Err(MarketError::ConservationViolation {
                reason: format!(
                    "custodian holds {held} of {currency} but escrow bookkeeping requires {amount}"
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_ledger::InMemoryCurrencyLedger;

    fn setup() -> (PaymentSettlement, InMemoryCurrencyLedger, MarketConfig) {
        let treasury = AccountId::new();
        let custodian = AccountId::new();
        let config = MarketConfig::new(treasury, custodian);
        (
            PaymentSettlement::new(custodian),
            InMemoryCurrencyLedger::new(),
            config,
        )
    }

    #[test]
    fn fee_is_floor_of_exact_percentage() {
        assert_eq!(compute_fee(10_000, 300), 300);
        assert_eq!(compute_fee(10_001, 300), 300); // truncates
        assert_eq!(compute_fee(33, 300), 0);
        assert_eq!(compute_fee(0, 300), 0);
        assert_eq!(compute_fee(100, 10_000), 100);
    }

    #[test]
    fn fee_total_for_max_amount() {
        let split = split_fee(Amount::MAX, 10_000);
        assert_eq!(split.fee, Amount::MAX);
        assert_eq!(split.proceeds, 0);

        let split = split_fee(Amount::MAX, 300);
        assert_eq!(split.fee + split.proceeds, Amount::MAX);
    }

    #[test]
    fn split_conserves_amount() {
        for amount in [1u128, 33, 999, 10_000, 123_456_789] {
            for bps in [0u64, 1, 250, 300, 9_999, 10_000] {
                let split = split_fee(amount, bps);
                assert_eq!(split.fee + split.proceeds, amount, "amount={amount} bps={bps}");
            }
        }
    }

    #[test]
    fn fungible_escrow_pulls_allowance() {
        let (mut settlement, mut funds, _) = setup();
        let payer = AccountId::new();
        let currency = CurrencyId::new();
        funds.mint(payer, currency, 10);
        funds.approve(payer, settlement.custodian(), currency, 10);

        let id = settlement.escrow(&mut funds, payer, currency, 4, 0).unwrap();
        assert_eq!(funds.balance_of(payer, currency), 6);
        assert_eq!(funds.balance_of(settlement.custodian(), currency), 4);
        assert_eq!(settlement.vault().active(id).unwrap().amount, 4);
    }

    #[test]
    fn fungible_escrow_without_allowance_fails() {
        let (mut settlement, mut funds, _) = setup();
        let payer = AccountId::new();
        let currency = CurrencyId::new();
        funds.mint(payer, currency, 10);

        let err = settlement
            .escrow(&mut funds, payer, currency, 4, 0)
            .unwrap_err();
        assert!(matches!(err, MarketError::InsufficientFunds { .. }));
        assert_eq!(funds.balance_of(payer, currency), 10);
        assert!(settlement.vault().is_empty());
    }

    #[test]
    fn native_escrow_requires_attached_cover() {
        let (mut settlement, mut funds, _) = setup();
        let payer = AccountId::new();
        let native = CurrencyId::native();
        funds.mint(payer, native, 10);

        let err = settlement
            .escrow(&mut funds, payer, native, 5, 3)
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::InsufficientFunds {
                needed: 5,
                available: 3
            }
        ));

        // Overpayment: only the amount is debited, the excess stays put.
        settlement.escrow(&mut funds, payer, native, 5, 8).unwrap();
        assert_eq!(funds.balance_of(payer, native), 5);
        assert_eq!(funds.balance_of(settlement.custodian(), native), 5);
    }

    #[test]
    fn refund_returns_exact_amount_once() {
        let (mut settlement, mut funds, _) = setup();
        let payer = AccountId::new();
        let native = CurrencyId::native();
        funds.mint(payer, native, 10);

        let id = settlement.escrow(&mut funds, payer, native, 7, 7).unwrap();
        settlement.refund(&mut funds, id).unwrap();
        assert_eq!(funds.balance_of(payer, native), 10);
        assert_eq!(funds.balance_of(settlement.custodian(), native), 0);

        let err = settlement.refund(&mut funds, id).unwrap_err();
        assert!(matches!(err, MarketError::EscrowNotActive { .. }));
        assert_eq!(funds.balance_of(payer, native), 10);
    }

    #[test]
    fn settle_routes_fee_and_proceeds() {
        let (mut settlement, mut funds, config) = setup();
        let payer = AccountId::new();
        let seller = AccountId::new();
        let currency = CurrencyId::new();
        funds.mint(payer, currency, 10_000);
        funds.approve(payer, settlement.custodian(), currency, 10_000);

        let id = settlement
            .escrow(&mut funds, payer, currency, 10_000, 0)
            .unwrap();
        let split = settlement
            .settle_with_fee(&mut funds, id, seller, &config)
            .unwrap();

        assert_eq!(split.fee, 300);
        assert_eq!(split.proceeds, 9_700);
        assert_eq!(funds.balance_of(config.treasury, currency), 300);
        assert_eq!(funds.balance_of(seller, currency), 9_700);
        assert_eq!(funds.balance_of(settlement.custodian(), currency), 0);

        // Settled escrow cannot be refunded or settled again.
        let err = settlement
            .settle_with_fee(&mut funds, id, seller, &config)
            .unwrap_err();
        assert!(matches!(err, MarketError::EscrowNotActive { .. }));
    }

    #[test]
    fn charge_with_fee_native() {
        let (mut settlement, mut funds, config) = setup();
        let buyer = AccountId::new();
        let seller = AccountId::new();
        let native = CurrencyId::native();
        funds.mint(buyer, native, 10_000);

        let split = settlement
            .charge_with_fee(&mut funds, buyer, native, 10_000, 10_000, seller, &config)
            .unwrap();
        assert_eq!(split.fee + split.proceeds, 10_000);
        assert_eq!(funds.balance_of(buyer, native), 0);
        assert_eq!(funds.balance_of(seller, native), 9_700);
        assert_eq!(funds.balance_of(config.treasury, native), 300);
    }

    #[test]
    fn charge_with_fee_short_attached_fails_clean() {
        let (mut settlement, mut funds, config) = setup();
        let buyer = AccountId::new();
        let seller = AccountId::new();
        let native = CurrencyId::native();
        funds.mint(buyer, native, 10_000);

        let err = settlement
            .charge_with_fee(&mut funds, buyer, native, 5_000, 3_000, seller, &config)
            .unwrap_err();
        assert!(matches!(err, MarketError::InsufficientFunds { .. }));
        assert_eq!(funds.balance_of(buyer, native), 10_000);
        assert_eq!(funds.balance_of(seller, native), 0);
    }

    #[test]
    fn escrow_conserves_total_supply() {
        let (mut settlement, mut funds, config) = setup();
        let payer = AccountId::new();
        let seller = AccountId::new();
        let currency = CurrencyId::new();
        funds.mint(payer, currency, 1_000);
        funds.approve(payer, settlement.custodian(), currency, 1_000);

        let id = settlement
            .escrow(&mut funds, payer, currency, 400, 0)
            .unwrap();
        assert_eq!(funds.total_supply(currency), 1_000);
        settlement
            .settle_with_fee(&mut funds, id, seller, &config)
            .unwrap();
        assert_eq!(funds.total_supply(currency), 1_000);
    }
}
