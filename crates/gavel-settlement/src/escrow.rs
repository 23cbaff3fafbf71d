//! Escrow vault — the record of every fund reservation the settlement
//! plane holds.
//!
//! Each record moves `ACTIVE → RELEASED` (refund) or `ACTIVE → SPENT`
//! (settlement), exactly once. A second terminal transition on the same
//! record fails [`MarketError::EscrowNotActive`], which is what makes
//! double-release structurally impossible: the transfer and the state flip
//! happen inside one `&mut self` call.

use std::collections::HashMap;

use gavel_types::{AccountId, Amount, CurrencyId, EscrowId, MarketError, Result};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an escrow record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowState {
    Active,
    Released,
    Spent,
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Released => write!(f, "RELEASED"),
            Self::Spent => write!(f, "SPENT"),
        }
    }
}

/// One escrowed reservation of funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escrow {
    pub id: EscrowId,
    pub payer: AccountId,
    pub currency: CurrencyId,
    pub amount: Amount,
    pub state: EscrowState,
}

/// Holds every escrow record, keyed by sequential [`EscrowId`].
///
/// The vault is pure bookkeeping — it never touches a currency ledger.
/// [`crate::PaymentSettlement`] pairs each state flip with the matching
/// transfer.
#[derive(Debug, Default)]
pub struct EscrowVault {
    entries: HashMap<EscrowId, Escrow>,
    next_id: u64,
}

impl EscrowVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new ACTIVE escrow and return its id.
    pub fn open(&mut self, payer: AccountId, currency: CurrencyId, amount: Amount) -> EscrowId {
        let id = EscrowId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Escrow {
                id,
                payer,
                currency,
                amount,
                state: EscrowState::Active,
            },
        );
        id
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: EscrowId) -> Option<&Escrow> {
        self.entries.get(&id)
    }

    /// Fetch a record that must be ACTIVE.
    ///
    /// # Errors
    /// - `EscrowNotFound` if no record exists for `id`
    /// - `EscrowNotActive` if the record was already released or spent
    pub fn active(&self, id: EscrowId) -> Result<&Escrow> {
        let escrow = self.entries.get(&id).ok_or(MarketError::EscrowNotFound(id))?;
        if escrow.state != EscrowState::Active {
            return Err(MarketError::EscrowNotActive {
                id,
                state: escrow.state.to_string(),
            });
        }
        Ok(escrow)
    }

    /// Flip an ACTIVE record to RELEASED and return a copy of it.
    ///
    /// # Errors
    /// Same as [`EscrowVault::active`].
    pub fn mark_released(&mut self, id: EscrowId) -> Result<Escrow> {
        self.transition(id, EscrowState::Released)
    }

    /// Flip an ACTIVE record to SPENT and return a copy of it.
    ///
    /// # Errors
    /// Same as [`EscrowVault::active`].
    pub fn mark_spent(&mut self, id: EscrowId) -> Result<Escrow> {
        self.transition(id, EscrowState::Spent)
    }

    fn transition(&mut self, id: EscrowId, to: EscrowState) -> Result<Escrow> {
        let escrow = self
            .entries
            .get_mut(&id)
            .ok_or(MarketError::EscrowNotFound(id))?;
        if escrow.state != EscrowState::Active {
            return Err(MarketError::EscrowNotActive {
                id,
                state: escrow.state.to_string(),
            });
        }
        escrow.state = to;
        Ok(escrow.clone())
    }

    /// Sum of all ACTIVE escrow amounts in `currency`. The custodian's
    /// balance must equal this at rest (escrow backing).
    #[must_use]
    pub fn active_total(&self, currency: CurrencyId) -> Amount {
        self.entries
            .values()
            .filter(|e| e.state == EscrowState::Active && e.currency == currency)
            .map(|e| e.amount)
            .sum()
    }

    /// Number of ACTIVE records.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.state == EscrowState::Active)
            .count()
    }

    /// Total records ever opened.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
