//! Wallet portfolio valuation: joins cached balance snapshots with cached
//! oracle prices, schedules background refreshes on miss or staleness, and
//! keeps at most one refresh in flight per wallet.

pub mod dto;
pub mod engine;
pub mod error;
pub mod prices;
pub mod refresh;
pub mod service;
pub mod store;
pub mod traits;

#[cfg(test)]
pub(crate) mod testutil;

pub use dto::{
    PortfolioView, RefreshOutcome, ValuedAssetBalance, ValuedFungibleBalance, ValuedNftBalance,
    ValuedPortfolio,
};
pub use error::ValuationError;
pub use refresh::RefreshCoordinator;
pub use service::{PortfolioService, ValuationConfig};
pub use store::{PgPortfolioStore, PgPriceStore};
pub use traits::{ChainGateway, PortfolioStore, PriceStore, StoredPrice};
