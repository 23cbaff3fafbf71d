//! Error types for the Gavel marketplace engine.
//!
//! All errors use the `GV_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Asset / custody errors
//! - 2xx: Funds / escrow errors
//! - 3xx: Registry / configuration errors
//! - 4xx: Order errors
//! - 5xx: Offer errors
//! - 6xx: Auction / bid errors
//!
//! Every failure is synchronous and aborts the attempted transition with
//! zero state change and zero fund movement; the error is the only output.

use thiserror::Error;

use crate::{AccountId, Amount, EscrowId, ListingKey};

/// Central error enum for all Gavel operations.
#[derive(Debug, Error)]
pub enum MarketError {
    // =================================================================
    // Asset / Custody Errors (1xx)
    // =================================================================
    /// The asset does not exist in its collection's ownership ledger.
    #[error("GV_ERR_100: Invalid asset: {key}")]
    InvalidAsset { key: ListingKey },

    /// The caller is not the current owner of the asset (or the custodian
    /// lacks operator approval to move it).
    #[error("GV_ERR_101: Not the asset owner: {key}")]
    NotOwner { key: ListingKey },

    /// Custody release was rejected by the ownership ledger after a
    /// successful lock. This is a broken invariant, not a user error.
    #[error("GV_ERR_102: Custody invariant violated: {reason}")]
    CustodyViolation { reason: String },

    // =================================================================
    // Funds / Escrow Errors (2xx)
    // =================================================================
    /// Attached value, balance, or allowance is short of the required amount.
    #[error("GV_ERR_200: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    /// No escrow record exists for this id.
    #[error("GV_ERR_201: Escrow not found: {0}")]
    EscrowNotFound(EscrowId),

    /// The escrow record exists but is not ACTIVE — it was already released
    /// or spent. Double-release is rejected here.
    #[error("GV_ERR_202: Escrow {id} is {state}, not ACTIVE")]
    EscrowNotActive { id: EscrowId, state: String },

    /// Funds-conservation invariant violated — critical safety alert.
    #[error("GV_ERR_203: Conservation violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // Registry / Configuration Errors (3xx)
    // =================================================================
    /// The settlement currency is not on the allow-list.
    #[error("GV_ERR_300: Currency is not allowed for settlement")]
    CurrencyNotAllowed,

    /// The asset collection is not on the allow-list.
    #[error("GV_ERR_301: Collection is not allowed for listing")]
    CollectionNotAllowed,

    /// The caller is not the registry administrator.
    #[error("GV_ERR_302: Caller {0} is not the registry admin")]
    NotAdmin(AccountId),

    /// Configuration failed validation (e.g. fee above 100%).
    #[error("GV_ERR_303: Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // =================================================================
    // Order Errors (4xx)
    // =================================================================
    /// No live order exists for this listing key.
    #[error("GV_ERR_400: Order is not live: {key}")]
    NotLive { key: ListingKey },

    /// A live order or auction already exists for this listing key.
    #[error("GV_ERR_401: Already listed: {key}")]
    AlreadyListed { key: ListingKey },

    /// Zero or otherwise disallowed price.
    #[error("GV_ERR_402: Invalid price: {reason}")]
    InvalidPrice { reason: String },

    /// The caller is not the seller of this listing.
    #[error("GV_ERR_403: Caller is not the seller: {key}")]
    NotSeller { key: ListingKey },

    /// The order has live offers; the price cannot be edited under them.
    #[error("GV_ERR_404: Order has pending offers: {key}")]
    HasPendingOffers { key: ListingKey },

    // =================================================================
    // Offer Errors (5xx)
    // =================================================================
    /// The proposer already has a live offer on this listing.
    #[error("GV_ERR_500: Offer already exists for proposer {proposer} on {key}")]
    OfferExists {
        key: ListingKey,
        proposer: AccountId,
    },

    /// No live offer from this proposer on this listing.
    #[error("GV_ERR_501: No offer from proposer {proposer} on {key}")]
    OfferNotFound {
        key: ListingKey,
        proposer: AccountId,
    },

    /// The offer amount exceeds the current order price.
    #[error("GV_ERR_502: Offer {amount} exceeds order price {price}")]
    OfferExceedsPrice { amount: Amount, price: Amount },

    /// The proposer argument is not valid for this operation (includes the
    /// proposer trying to reject their own offer — use cancel instead).
    #[error("GV_ERR_503: Invalid proposer {proposer} for {key}")]
    InvalidProposer {
        key: ListingKey,
        proposer: AccountId,
    },

    /// Self-trading forbidden: the proposer/buyer is the seller.
    #[error("GV_ERR_504: Proposer is the seller: {key}")]
    ProposerIsSeller { key: ListingKey },

    // =================================================================
    // Auction / Bid Errors (6xx)
    // =================================================================
    /// No auction for this key, or the operation requires a time-valid
    /// window the auction is outside of.
    #[error("GV_ERR_600: Auction is not live: {key}")]
    AuctionNotLive { key: ListingKey },

    /// The bid is not strictly greater than the current highest (or below
    /// the start price on the first bid). Ties do not win.
    #[error("GV_ERR_601: Bid {bid} too low: must exceed {floor}")]
    BidTooLow { bid: Amount, floor: Amount },

    /// Self-trading forbidden: the bidder is the seller.
    #[error("GV_ERR_602: Bidder is the seller: {key}")]
    BidderIsSeller { key: ListingKey },

    /// The auction has at least one bid and can no longer be canceled.
    #[error("GV_ERR_603: Auction has bids and cannot be canceled: {key}")]
    HasBids { key: ListingKey },

    /// Zero or otherwise disallowed auction duration.
    #[error("GV_ERR_604: Invalid duration: {reason}")]
    InvalidDuration { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;
