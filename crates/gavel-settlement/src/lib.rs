//! # gavel-settlement
//!
//! **Settlement plane**: escrow custody of funds, fee-splitting payment
//! settlement, asset custody, and conservation invariants.
//!
//! ## Architecture
//!
//! The engines never touch a ledger directly — every fund movement goes
//! through [`PaymentSettlement`] and every asset movement through
//! [`CustodyManager`]:
//!
//! 1. `escrow` pulls funds into the custodian account and opens an ACTIVE
//!    vault record
//! 2. exactly one terminal transition closes it: `refund` (→ RELEASED) or
//!    `settle_with_fee` (→ SPENT, fee routed to the treasury)
//! 3. [`conservation`] verifies supply and escrow-backing invariants after
//!    the fact
//!
//! All operations validate fully before the first transfer: a failure
//! leaves zero observable change.

pub mod conservation;
pub mod custody;
pub mod escrow;
pub mod settlement;

pub use custody::CustodyManager;
pub use escrow::{Escrow, EscrowState, EscrowVault};
pub use settlement::{PaymentSettlement, compute_fee, split_fee};
