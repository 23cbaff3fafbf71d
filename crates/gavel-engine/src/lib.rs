//! # gavel-engine
//!
//! The trading engines of the Gavel marketplace: fixed-price orders with
//! negotiable offers, and time-boxed auctions with monotonically increasing
//! bids, composed over the settlement plane by the [`Marketplace`] facade.
//!
//! ## Module boundaries
//!
//! - [`marketplace`] — the facade: construction, shared invariants, events
//! - [`orders`] — order & offer lifecycle (mutations)
//! - [`auctions`] — auction & bid lifecycle (mutations)
//! - [`query`] — read-only getters, filtered search, pagination
//!
//! Every operation takes the caller account and the injected ledgers
//! explicitly; nothing here holds ambient authority.

pub mod auctions;
pub mod marketplace;
pub mod orders;
pub mod query;

pub use marketplace::Marketplace;
pub use query::{AuctionFilter, OrderFilter};

/// Shared test fixture: a marketplace wired to in-memory ledgers, one
/// allowed fungible currency, one allowed collection, and a manual clock.
#[cfg(test)]
pub(crate) mod testutil {
    use chrono::Duration;
    use gavel_types::{
        AccountId, Amount, AssetId, CollectionId, CurrencyId, ListingKey, ManualClock,
        MarketConfig,
    };

    use gavel_ledger::{AssetLedger as _, AssetRegistry, CurrencyLedger as _, InMemoryAssetLedger, InMemoryCurrencyLedger};
    use gavel_settlement::conservation::verify_all;

    use crate::Marketplace;

    pub struct Fixture {
        pub market: Marketplace,
        pub assets: InMemoryAssetLedger,
        pub funds: InMemoryCurrencyLedger,
        pub clock: ManualClock,
        pub admin: AccountId,
        pub seller: AccountId,
        pub buyer_a: AccountId,
        pub buyer_b: AccountId,
        pub collection: CollectionId,
        pub token: CurrencyId,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self::with_expiry_gate(false)
        }

        /// Like [`Fixture::new`] but with `settle_requires_expiry` set.
        pub fn with_expiry_gate(settle_requires_expiry: bool) -> Self {
            let admin = AccountId::new();
            let treasury = AccountId::new();
            let custodian = AccountId::new();
            let clock = ManualClock::default();
            let collection = CollectionId::new();
            let token = CurrencyId::new();

            let mut registry = AssetRegistry::new(admin);
            registry.allow_currency(admin, token).unwrap();
            registry.allow_collection(admin, collection).unwrap();

            let mut config = MarketConfig::new(treasury, custodian);
            config.settle_requires_expiry = settle_requires_expiry;
            let market = Marketplace::new(config, registry, Box::new(clock.clone())).unwrap();

            Self {
                market,
                assets: InMemoryAssetLedger::new(),
                funds: InMemoryCurrencyLedger::new(),
                clock,
                admin,
                seller: AccountId::new(),
                buyer_a: AccountId::new(),
                buyer_b: AccountId::new(),
                collection,
                token,
            }
        }

        pub fn treasury(&self) -> AccountId {
            self.market.config().treasury
        }

        /// Mint an asset to `owner` and approve the custodian as operator.
        pub fn mint_asset(&mut self, owner: AccountId) -> AssetId {
            let id = self.assets.mint(self.collection, owner);
            self.assets
                .set_approval_for_all(owner, self.market.custodian(), self.collection, true);
            id
        }

        /// Mint `amount` of the allowed fungible currency to `account` and
        /// pre-approve the custodian to pull it.
        pub fn fund_token(&mut self, account: AccountId, amount: Amount) {
            self.funds.mint(account, self.token, amount);
            self.funds
                .approve(account, self.market.custodian(), self.token, amount);
        }

        pub fn fund_native(&mut self, account: AccountId, amount: Amount) {
            self.funds.mint(account, CurrencyId::native(), amount);
        }

        /// Seller lists a freshly minted asset at `price` in the fungible
        /// currency.
        pub fn listed_order(&mut self, price: Amount) -> ListingKey {
            let id = self.mint_asset(self.seller);
            self.market
                .create_order(
                    &mut self.assets,
                    self.seller,
                    self.collection,
                    id,
                    self.token,
                    price,
                )
                .unwrap();
            ListingKey::new(self.collection, id)
        }

        /// Seller opens an auction on a freshly minted asset.
        pub fn listed_auction(&mut self, start_price: Amount, duration: Duration) -> ListingKey {
            let id = self.mint_asset(self.seller);
            self.market
                .create_auction(
                    &mut self.assets,
                    self.seller,
                    self.collection,
                    id,
                    self.token,
                    start_price,
                    duration,
                )
                .unwrap();
            ListingKey::new(self.collection, id)
        }

        /// Supply and escrow-backing invariants for both currencies in play.
        pub fn assert_conservation(&self) {
            verify_all(self.market.settlement(), &self.funds, self.token).unwrap();
            verify_all(self.market.settlement(), &self.funds, CurrencyId::native()).unwrap();
        }
    }
}
