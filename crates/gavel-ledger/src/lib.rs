//! # gavel-ledger
//!
//! **Ledger plane**: the external collaborators the marketplace core calls
//! into, plus the allow-list registry.
//!
//! - [`AssetLedger`] — per-collection ownership of unique assets
//!   (`owner_of`, operator approvals, custody transfers)
//! - [`CurrencyLedger`] — balances and pull-payment allowances for fungible
//!   currencies and the native currency
//! - [`AssetRegistry`] — which currencies and collections are eligible
//!
//! The ledgers are traits so deployments can wire real backends; the
//! `InMemory*` implementations are the reference collaborators used by the
//! test suites and single-process deployments.

pub mod assets;
pub mod currency;
pub mod registry;

pub use assets::{AssetLedger, InMemoryAssetLedger};
pub use currency::{CurrencyLedger, InMemoryCurrencyLedger};
pub use registry::AssetRegistry;
