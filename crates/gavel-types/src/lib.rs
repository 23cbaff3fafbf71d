//! # gavel-types
//!
//! Shared types, errors, and configuration for the **Gavel** marketplace
//! engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`CollectionId`], [`CurrencyId`],
//!   [`AssetId`], [`ListingKey`], [`EscrowId`]
//! - **Money**: [`Amount`], [`FeeSplit`]
//! - **Listing model**: [`Order`], [`Offer`]
//! - **Auction model**: [`Auction`], [`Bid`]
//! - **Events**: [`MarketEvent`]
//! - **Configuration**: [`MarketConfig`]
//! - **Time**: [`Clock`], [`SystemClock`], [`ManualClock`]
//! - **Errors**: [`MarketError`] with `GV_ERR_` prefix codes
//! - **Constants**: fee denominator, pagination defaults

pub mod auction;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod listing;
pub mod money;

// Re-export all primary types at crate root for ergonomic imports:
//   use gavel_types::{Order, Auction, MarketError, ...};

pub use auction::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use listing::*;
pub use money::*;

// Constants are accessed via `gavel_types::constants::FOO`
// (not re-exported to avoid name collisions).
