//! Seams between the valuation subsystem and its collaborators. Production
//! implementations live in [`crate::store`]; tests substitute in-memory
//! fakes so no network or database is involved.

use std::collections::HashMap;

use alloy::primitives::U256;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_chain::{ChainError, TokenBalanceRequest, TokenBalances};
use folio_types::{
    BlockTag, ChainId, FungibleTokenId, OraclePrice, PriceFeed, WalletPortfolioData,
};

use crate::error::ValuationError;

/// A cached price row plus its write timestamp, for staleness checks.
#[derive(Debug, Clone)]
pub struct StoredPrice {
    pub price: OraclePrice,
    pub updated_at: DateTime<Utc>,
}

/// Balance Cache access. Snapshots are upserted wholesale; a `None` read
/// means "never fetched", distinct from "fetched but stale".
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn get_wallet_portfolio(
        &self,
        wallet: &str,
    ) -> Result<Option<WalletPortfolioData>, ValuationError>;

    async fn upsert_wallet_portfolio(
        &self,
        data: &WalletPortfolioData,
    ) -> Result<(), ValuationError>;
}

/// Price Cache access. Pure CRUD; staleness is judged by the caller against
/// `updated_at`.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn fetch_native_prices(
        &self,
        chain_ids: &[ChainId],
    ) -> Result<HashMap<ChainId, StoredPrice>, ValuationError>;

    async fn fetch_fungible_prices(
        &self,
        tokens: &[FungibleTokenId],
    ) -> Result<HashMap<FungibleTokenId, StoredPrice>, ValuationError>;

    async fn upsert_native_price(
        &self,
        chain_id: ChainId,
        price: &OraclePrice,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ValuationError>;

    async fn upsert_fungible_price(
        &self,
        token: FungibleTokenId,
        price: &OraclePrice,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ValuationError>;
}

/// The chain reads the valuation subsystem performs.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    async fn fetch_native_balance(
        &self,
        chain_id: ChainId,
        wallet: &str,
        block: BlockTag,
    ) -> Result<U256, ChainError>;

    async fn fetch_token_balances(
        &self,
        chain_id: ChainId,
        requests: &[TokenBalanceRequest],
        wallet: &str,
        block: BlockTag,
    ) -> Result<TokenBalances, ChainError>;

    async fn fetch_usd_price(
        &self,
        feed: PriceFeed,
        block: BlockTag,
    ) -> Result<OraclePrice, ChainError>;
}
