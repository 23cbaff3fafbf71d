//! Read-only queries: getters, filtered search, pagination.
//!
//! Results iterate in creation-sequence order, which is stable across calls
//! with identical underlying state — that is what makes pagination
//! well-defined. `page` is 1-based; a page past the end is empty, not an
//! error.

use gavel_types::{
    AccountId, Amount, Auction, Bid, CollectionId, CurrencyId, ListingKey, Offer, Order,
    constants::{DEFAULT_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE},
};
use serde::{Deserialize, Serialize};

use crate::Marketplace;

/// Search criteria for [`Marketplace::retrieve_auctions`]. Every `Option`
/// left as `None` matches everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionFilter {
    /// When `true`, only auctions whose time window is still open at the
    /// moment of the call — expired-but-unsettled records are excluded.
    pub live_only: bool,
    pub collection: Option<CollectionId>,
    pub seller: Option<AccountId>,
    pub currency: Option<CurrencyId>,
    /// Bounds compared against `Auction::current_price()`.
    pub min_price: Option<Amount>,
    pub max_price: Option<Amount>,
    /// 1-based page number.
    pub page: usize,
    pub items_per_page: usize,
}

impl Default for AuctionFilter {
    fn default() -> Self {
        Self {
            live_only: true,
            collection: None,
            seller: None,
            currency: None,
            min_price: None,
            max_price: None,
            page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Search criteria for [`Marketplace::retrieve_orders`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFilter {
    pub collection: Option<CollectionId>,
    pub seller: Option<AccountId>,
    pub currency: Option<CurrencyId>,
    pub min_price: Option<Amount>,
    pub max_price: Option<Amount>,
    /// 1-based page number.
    pub page: usize,
    pub items_per_page: usize,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            collection: None,
            seller: None,
            currency: None,
            min_price: None,
            max_price: None,
            page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl Marketplace {
    // =================================================================
    // Point lookups
    // =================================================================

    /// The live order for `key`, if any.
    #[must_use]
    pub fn get_order(&self, key: ListingKey) -> Option<&Order> {
        self.orders.get(&key)
    }

    /// The live offer from `proposer` on `key`, if any.
    #[must_use]
    pub fn get_offer(&self, key: ListingKey, proposer: AccountId) -> Option<&Offer> {
        self.offers.get(&key).and_then(|m| m.get(&proposer))
    }

    /// Every live offer on `key`, ordered by proposer.
    #[must_use]
    pub fn offers_for(&self, key: ListingKey) -> Vec<&Offer> {
        self.offers
            .get(&key)
            .map(|m| m.values().collect())
            .unwrap_or_default()
    }

    /// The auction record for `key`, live or expired-unsettled.
    #[must_use]
    pub fn get_auction(&self, key: ListingKey) -> Option<&Auction> {
        self.auctions.get(&key)
    }

    /// Whether the auction for `key` is within its time window right now.
    /// `None` when no auction record exists. Distinguishes "live" from
    /// "expired but never settled" explicitly.
    #[must_use]
    pub fn auction_is_live(&self, key: ListingKey) -> Option<bool> {
        let now = self.now();
        self.auctions.get(&key).map(|a| a.is_live(now))
    }

    /// The append-only bid history for `key` (empty if no auction).
    #[must_use]
    pub fn get_bids(&self, key: ListingKey) -> &[Bid] {
        self.auctions
            .get(&key)
            .map_or(&[], |a| a.bids.as_slice())
    }

    // =================================================================
    // Filtered search
    // =================================================================

    /// Search auctions. Ordering: creation sequence (stable).
    #[must_use]
    pub fn retrieve_auctions(&self, filter: &AuctionFilter) -> Vec<&Auction> {
        let now = self.now();
        let mut matches: Vec<&Auction> = self
            .auctions
            .values()
            .filter(|a| !filter.live_only || a.is_live(now))
            .filter(|a| filter.collection.is_none_or(|c| a.key.collection == c))
            .filter(|a| filter.seller.is_none_or(|s| a.seller == s))
            .filter(|a| filter.currency.is_none_or(|c| a.currency == c))
            .filter(|a| filter.min_price.is_none_or(|p| a.current_price() >= p))
            .filter(|a| filter.max_price.is_none_or(|p| a.current_price() <= p))
            .collect();
        matches.sort_by_key(|a| a.sequence);
        paginate(matches, filter.page, filter.items_per_page)
    }

    /// Search orders. Ordering: creation sequence (stable).
    #[must_use]
    pub fn retrieve_orders(&self, filter: &OrderFilter) -> Vec<&Order> {
        let mut matches: Vec<&Order> = self
            .orders
            .values()
            .filter(|o| filter.collection.is_none_or(|c| o.key.collection == c))
            .filter(|o| filter.seller.is_none_or(|s| o.seller == s))
            .filter(|o| filter.currency.is_none_or(|c| o.currency == c))
            .filter(|o| filter.min_price.is_none_or(|p| o.price >= p))
            .filter(|o| filter.max_price.is_none_or(|p| o.price <= p))
            .collect();
        matches.sort_by_key(|o| o.sequence);
        paginate(matches, filter.page, filter.items_per_page)
    }
}

/// 1-based pagination over an already-sorted result set.
fn paginate<T>(items: Vec<T>, page: usize, items_per_page: usize) -> Vec<T> {
    let per_page = items_per_page.clamp(1, MAX_ITEMS_PER_PAGE);
    let start = page.max(1).saturating_sub(1).saturating_mul(per_page);
    items.into_iter().skip(start).take(per_page).collect()
}
