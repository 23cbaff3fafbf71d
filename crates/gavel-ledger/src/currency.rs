//! Currency ledger: balances and pull-payment allowances.
//!
//! Tracks per-(account, currency) balances. Fungible-currency escrow pulls
//! funds through a pre-approved allowance; native-currency value is
//! authorized by the attached value of the triggering call instead, so no
//! allowance is ever consulted for the native sentinel. All mutations are
//! atomic: checks precede the first write.

use std::collections::HashMap;

use gavel_types::{AccountId, Amount, CurrencyId, MarketError, Result};

/// Balance and allowance bookkeeping for every settlement currency,
/// including the native one.
pub trait CurrencyLedger {
    /// Balance of `account` in `currency`.
    fn balance_of(&self, account: AccountId, currency: CurrencyId) -> Amount;

    /// Move funds the caller already owns.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `from`'s balance is short.
    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        currency: CurrencyId,
        amount: Amount,
    ) -> Result<()>;

    /// Set `spender`'s allowance over `owner`'s funds (overwrite, not add).
    fn approve(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        currency: CurrencyId,
        amount: Amount,
    );

    /// Remaining allowance of `spender` over `owner`'s funds.
    fn allowance(&self, owner: AccountId, spender: AccountId, currency: CurrencyId) -> Amount;

    /// Pull funds from `from` on the authority of a prior allowance granted
    /// to `spender`. Decrements the allowance by `amount`.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the allowance or the balance is short.
    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        currency: CurrencyId,
        amount: Amount,
    ) -> Result<()>;

    /// Total ever minted in `currency`. Conservation checks compare this
    /// against the sum of all balances.
    fn total_minted(&self, currency: CurrencyId) -> Amount;

    /// Sum of every account's balance in `currency`.
    fn total_supply(&self, currency: CurrencyId) -> Amount;
}

/// HashMap-backed reference implementation of [`CurrencyLedger`].
#[derive(Debug, Default)]
pub struct InMemoryCurrencyLedger {
    /// Per-(account, currency) balances.
    balances: HashMap<(AccountId, CurrencyId), Amount>,
    /// (owner, spender, currency) -> remaining allowance.
    allowances: HashMap<(AccountId, AccountId, CurrencyId), Amount>,
    /// Total minted per currency since genesis.
    minted: HashMap<CurrencyId, Amount>,
}

impl InMemoryCurrencyLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint funds into an account. Test and fixture entry point — the engine
    /// itself never mints.
    pub fn mint(&mut self, account: AccountId, currency: CurrencyId, amount: Amount) {
        *self.balances.entry((account, currency)).or_insert(0) += amount;
        *self.minted.entry(currency).or_insert(0) += amount;
    }
}

impl CurrencyLedger for InMemoryCurrencyLedger {
    fn balance_of(&self, account: AccountId, currency: CurrencyId) -> Amount {
        self.balances
            .get(&(account, currency))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        currency: CurrencyId,
        amount: Amount,
    ) -> Result<()> {
        let available = self.balance_of(from, currency);
        if available < amount {
            return Err(MarketError::InsufficientFunds {
                needed: amount,
                available,
            });
        }

        *self.balances.entry((from, currency)).or_insert(0) -= amount;
        *self.balances.entry((to, currency)).or_insert(0) += amount;
        Ok(())
    }

    fn approve(
        &mut self,
        owner: AccountId,
        spender: AccountId,
        currency: CurrencyId,
        amount: Amount,
    ) {
        self.allowances.insert((owner, spender, currency), amount);
    }

    fn allowance(&self, owner: AccountId, spender: AccountId, currency: CurrencyId) -> Amount {
        self.allowances
            .get(&(owner, spender, currency))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        currency: CurrencyId,
        amount: Amount,
    ) -> Result<()> {
        let approved = self.allowance(from, spender, currency);
        if approved < amount {
            return Err(MarketError::InsufficientFunds {
                needed: amount,
                available: approved,
            });
        }
        // transfer() re-checks the balance; allowance is only decremented
        // after the balance check passes.
        self.transfer(from, to, currency, amount)?;
        self.allowances
            .insert((from, spender, currency), approved - amount);
        Ok(())
    }

    fn total_minted(&self, currency: CurrencyId) -> Amount {
        self.minted.get(&currency).copied().unwrap_or(0)
    }

    fn total_supply(&self, currency: CurrencyId) -> Amount {
        self.balances
            .iter()
            .filter(|((_, c), _)| *c == currency)
            .map(|(_, amount)| amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_increases_balance_and_supply() {
        let mut ledger = InMemoryCurrencyLedger::new();
        let alice = AccountId::new();
        let currency = CurrencyId::new();
        ledger.mint(alice, currency, 1_000);
        assert_eq!(ledger.balance_of(alice, currency), 1_000);
        assert_eq!(ledger.total_minted(currency), 1_000);
        assert_eq!(ledger.total_supply(currency), 1_000);
    }

    #[test]
    fn transfer_moves_funds() {
        let mut ledger = InMemoryCurrencyLedger::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let currency = CurrencyId::native();
        ledger.mint(alice, currency, 10);

        ledger.transfer(alice, bob, currency, 4).unwrap();
        assert_eq!(ledger.balance_of(alice, currency), 6);
        assert_eq!(ledger.balance_of(bob, currency), 4);
    }

    #[test]
    fn transfer_insufficient_fails_clean() {
        let mut ledger = InMemoryCurrencyLedger::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let currency = CurrencyId::new();
        ledger.mint(alice, currency, 3);

        let err = ledger.transfer(alice, bob, currency, 5).unwrap_err();
        assert!(matches!(
            err,
            MarketError::InsufficientFunds {
                needed: 5,
                available: 3
            }
        ));
        assert_eq!(ledger.balance_of(alice, currency), 3);
        assert_eq!(ledger.balance_of(bob, currency), 0);
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut ledger = InMemoryCurrencyLedger::new();
        let alice = AccountId::new();
        let market = AccountId::new();
        let currency = CurrencyId::new();
        ledger.mint(alice, currency, 10);
        ledger.approve(alice, market, currency, 7);

        ledger
            .transfer_from(market, alice, market, currency, 5)
            .unwrap();
        assert_eq!(ledger.balance_of(market, currency), 5);
        assert_eq!(ledger.allowance(alice, market, currency), 2);
    }

    #[test]
    fn transfer_from_without_allowance_fails() {
        let mut ledger = InMemoryCurrencyLedger::new();
        let alice = AccountId::new();
        let market = AccountId::new();
        let currency = CurrencyId::new();
        ledger.mint(alice, currency, 10);

        let err = ledger
            .transfer_from(market, alice, market, currency, 5)
            .unwrap_err();
        assert!(matches!(err, MarketError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance_of(alice, currency), 10);
    }

    #[test]
    fn transfer_from_short_balance_keeps_allowance() {
        let mut ledger = InMemoryCurrencyLedger::new();
        let alice = AccountId::new();
        let market = AccountId::new();
        let currency = CurrencyId::new();
        ledger.mint(alice, currency, 2);
        ledger.approve(alice, market, currency, 10);

        let err = ledger
            .transfer_from(market, alice, market, currency, 5)
            .unwrap_err();
        assert!(matches!(err, MarketError::InsufficientFunds { .. }));
        // Nothing changed: neither balance nor allowance.
        assert_eq!(ledger.balance_of(alice, currency), 2);
        assert_eq!(ledger.allowance(alice, market, currency), 10);
    }

    #[test]
    fn transfers_conserve_supply() {
        let mut ledger = InMemoryCurrencyLedger::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let currency = CurrencyId::new();
        ledger.mint(alice, currency, 100);
        ledger.mint(bob, currency, 50);

        ledger.transfer(alice, bob, currency, 30).unwrap();
        assert_eq!(ledger.total_supply(currency), 150);
        assert_eq!(ledger.total_minted(currency), 150);
    }
}
