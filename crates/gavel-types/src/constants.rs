//! System-wide constants for the Gavel marketplace engine.

/// Denominator for fee rates expressed in basis points (parts per 10 000).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default marketplace fee: 3% (300 bps).
pub const DEFAULT_FEE_BPS: u64 = 300;

/// Default page size for paginated listing queries.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Hard cap on page size to bound query cost.
pub const MAX_ITEMS_PER_PAGE: usize = 1_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Gavel";
