//! Production implementations of the trait seams: diesel-backed caches over
//! the shared pool, and the JSON-RPC gateway.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_diesel::postgres::Pool;
use folio_chain::{BlockchainGateway, ChainError, TokenBalanceRequest, TokenBalances};
use folio_db::FolioPool;
use folio_db::models::{FungibleTokenPriceRow, NativeAssetPriceRow, WalletPortfolioRow};
use folio_types::{
    BlockTag, ChainId, FungibleTokenId, OraclePrice, PriceFeed, WalletPortfolioData,
};

use crate::error::ValuationError;
use crate::traits::{ChainGateway, PortfolioStore, PriceStore, StoredPrice};

pub struct PgPortfolioStore {
    pool: Pool,
}

impl PgPortfolioStore {
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioStore for PgPortfolioStore {
    async fn get_wallet_portfolio(
        &self,
        wallet: &str,
    ) -> Result<Option<WalletPortfolioData>, ValuationError> {
        let wallet_owned = wallet.to_string();
        let row = self
            .pool
            .interact_with_context(format!("fetch snapshot for wallet {wallet}"), move |conn| {
                WalletPortfolioRow::find_by_wallet(&wallet_owned, conn)
            })
            .await?;

        match row {
            None => Ok(None),
            Some(row) => {
                let wallet = row.wallet_address.clone();
                row.into_data()
                    .map(Some)
                    .map_err(|source| ValuationError::CorruptSnapshot { wallet, source })
            }
        }
    }

    async fn upsert_wallet_portfolio(
        &self,
        data: &WalletPortfolioData,
    ) -> Result<(), ValuationError> {
        let row =
            WalletPortfolioRow::from_data(data).map_err(|source| ValuationError::CorruptSnapshot {
                wallet: data.wallet_address.clone(),
                source,
            })?;

        self.pool
            .interact_with_context(
                format!("upsert snapshot for wallet {}", data.wallet_address),
                move |conn| WalletPortfolioRow::upsert(&row, conn),
            )
            .await?;
        Ok(())
    }
}

pub struct PgPriceStore {
    pool: Pool,
}

impl PgPriceStore {
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceStore for PgPriceStore {
    async fn fetch_native_prices(
        &self,
        chain_ids: &[ChainId],
    ) -> Result<HashMap<ChainId, StoredPrice>, ValuationError> {
        if chain_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i64> = chain_ids.iter().map(|chain| chain.as_i64()).collect();
        let rows = self
            .pool
            .interact_with_context("fetch native asset prices".to_string(), move |conn| {
                NativeAssetPriceRow::find_by_chain_ids(&ids, conn)
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    ChainId(row.chain_id as u64),
                    stored_price(row.usd_value, row.decimals, row.updated_at),
                )
            })
            .collect())
    }

    async fn fetch_fungible_prices(
        &self,
        tokens: &[FungibleTokenId],
    ) -> Result<HashMap<FungibleTokenId, StoredPrice>, ValuationError> {
        if tokens.is_empty() {
            return Ok(HashMap::new());
        }

        let by_key: HashMap<(String, i64), FungibleTokenId> = tokens
            .iter()
            .map(|token| {
                (
                    (format_address(token.token_address), token.chain_id.as_i64()),
                    *token,
                )
            })
            .collect();

        let keys: Vec<(String, i64)> = by_key.keys().cloned().collect();
        let rows = self
            .pool
            .interact_with_context("fetch fungible token prices".to_string(), move |conn| {
                FungibleTokenPriceRow::find_by_tokens(&keys, conn)
            })
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let token = by_key.get(&(row.token_address.clone(), row.chain_id))?;
                Some((
                    *token,
                    stored_price(row.usd_value, row.decimals, row.updated_at),
                ))
            })
            .collect())
    }

    async fn upsert_native_price(
        &self,
        chain_id: ChainId,
        price: &OraclePrice,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ValuationError> {
        let row = NativeAssetPriceRow {
            chain_id: chain_id.as_i64(),
            usd_value: price.answer.clone(),
            decimals: price.decimals as i32,
            updated_at,
        };

        self.pool
            .interact_with_context(
                format!("upsert native price for chain {chain_id}"),
                move |conn| NativeAssetPriceRow::upsert(&row, conn),
            )
            .await?;
        Ok(())
    }

    async fn upsert_fungible_price(
        &self,
        token: FungibleTokenId,
        price: &OraclePrice,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ValuationError> {
        let row = FungibleTokenPriceRow {
            token_address: format_address(token.token_address),
            chain_id: token.chain_id.as_i64(),
            usd_value: price.answer.clone(),
            decimals: price.decimals as i32,
            updated_at,
        };

        self.pool
            .interact_with_context(
                format!(
                    "upsert price for token {} on chain {}",
                    token.token_address, token.chain_id
                ),
                move |conn| FungibleTokenPriceRow::upsert(&row, conn),
            )
            .await?;
        Ok(())
    }
}

fn stored_price(
    usd_value: bigdecimal::BigDecimal,
    decimals: i32,
    updated_at: DateTime<Utc>,
) -> StoredPrice {
    StoredPrice {
        price: OraclePrice {
            answer: usd_value,
            decimals: u32::try_from(decimals).unwrap_or(0),
        },
        updated_at,
    }
}

/// Lowercase hex, the canonical cache-key form for addresses.
fn format_address(address: Address) -> String {
    format!("{address:#x}")
}

#[async_trait]
impl ChainGateway for BlockchainGateway {
    async fn fetch_native_balance(
        &self,
        chain_id: ChainId,
        wallet: &str,
        block: BlockTag,
    ) -> Result<U256, ChainError> {
        Self::fetch_native_balance(self, chain_id, wallet, block).await
    }

    async fn fetch_token_balances(
        &self,
        chain_id: ChainId,
        requests: &[TokenBalanceRequest],
        wallet: &str,
        block: BlockTag,
    ) -> Result<TokenBalances, ChainError> {
        Self::fetch_token_balances(self, chain_id, requests, wallet, block).await
    }

    async fn fetch_usd_price(
        &self,
        feed: PriceFeed,
        block: BlockTag,
    ) -> Result<OraclePrice, ChainError> {
        Self::fetch_usd_price(self, feed, block).await
    }
}
