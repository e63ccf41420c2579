//! Price resolution for a balance snapshot: cached when fresh, fetched from
//! the declared feed when missing or stale, zero when nothing works. Fetched
//! prices are written back to the Price Cache as a side effect; that write
//! is the only mutation on the read path.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use folio_catalog::AssetCatalog;
use folio_types::{
    BlockTag, ChainId, FungibleTokenId, OraclePrice, PriceFeed, WalletPortfolioData,
};

use crate::engine::{AssetPricing, ValuationInputs};
use crate::error::ValuationError;
use crate::traits::{ChainGateway, PriceStore, StoredPrice};

/// Fresh iff strictly younger than the interval. A row whose age equals the
/// interval exactly is stale and gets refetched.
pub fn is_fresh(updated_at: DateTime<Utc>, now: DateTime<Utc>, interval: Duration) -> bool {
    now.signed_duration_since(updated_at) < interval
}

pub struct PriceResolver<'a> {
    pub store: &'a dyn PriceStore,
    pub gateway: &'a dyn ChainGateway,
    pub catalog: &'a AssetCatalog,
    pub refresh_interval: Duration,
}

impl PriceResolver<'_> {
    /// Resolve pricing for every distinct positive-balance asset key in the
    /// snapshot. Individual feed failures degrade that one asset to a zero
    /// price; they never fail the valuation.
    pub async fn resolve(
        &self,
        snapshot: &WalletPortfolioData,
        now: DateTime<Utc>,
    ) -> Result<ValuationInputs, ValuationError> {
        let mut chain_ids: Vec<ChainId> = snapshot
            .native_balances
            .iter()
            .filter(|balance| !balance.amount.is_zero())
            .map(|balance| balance.chain_id)
            .collect();
        chain_ids.sort_unstable();
        chain_ids.dedup();

        let mut tokens: Vec<FungibleTokenId> = snapshot
            .fungible_balances
            .iter()
            .filter(|balance| !balance.amount.is_zero())
            .map(|balance| FungibleTokenId {
                token_address: balance.token_address,
                chain_id: balance.chain_id,
            })
            .collect();
        tokens.sort_unstable_by_key(|token| (token.token_address, token.chain_id));
        tokens.dedup();

        let cached_native = self.store.fetch_native_prices(&chain_ids).await?;
        let cached_fungible = self.store.fetch_fungible_prices(&tokens).await?;

        let mut inputs = ValuationInputs::default();

        for chain_id in chain_ids {
            let token_decimals = self
                .catalog
                .find_chain(chain_id)
                .map_or(0, |chain| chain.decimals);
            let price = match fresh_price(cached_native.get(&chain_id), now, self.refresh_interval)
            {
                Some(price) => price,
                None => self.fetch_native(chain_id, now).await,
            };
            inputs.native.insert(
                chain_id,
                AssetPricing {
                    token_decimals,
                    price,
                },
            );
        }

        for token in tokens {
            let token_decimals = self
                .catalog
                .find_erc20_by_deployment(token.token_address, token.chain_id)
                .map_or(0, |t| t.decimals);
            let price = match fresh_price(cached_fungible.get(&token), now, self.refresh_interval)
            {
                Some(price) => price,
                None => self.fetch_fungible(token, now).await,
            };
            inputs.fungible.insert(
                token,
                AssetPricing {
                    token_decimals,
                    price,
                },
            );
        }

        Ok(inputs)
    }

    async fn fetch_native(&self, chain_id: ChainId, now: DateTime<Utc>) -> OraclePrice {
        let Some(chain) = self.catalog.find_chain(chain_id) else {
            tracing::warn!(
                "[PriceResolver] ⚠️ No catalog entry for chain {chain_id}, pricing as zero"
            );
            return OraclePrice::zero();
        };

        match self.fetch_feed(chain.usd_price_feed).await {
            Some(price) => {
                if let Err(e) = self.store.upsert_native_price(chain_id, &price, now).await {
                    tracing::warn!(
                        "[PriceResolver] 🗃️ Failed to cache native price for chain {chain_id}: {e}"
                    );
                }
                price
            }
            None => OraclePrice::zero(),
        }
    }

    async fn fetch_fungible(&self, token: FungibleTokenId, now: DateTime<Utc>) -> OraclePrice {
        let Some(entry) = self
            .catalog
            .find_erc20_by_deployment(token.token_address, token.chain_id)
        else {
            tracing::warn!(
                "[PriceResolver] ⚠️ No catalog entry for token {} on chain {}, pricing as zero",
                token.token_address,
                token.chain_id
            );
            return OraclePrice::zero();
        };

        match self.fetch_feed(entry.usd_price_feed).await {
            Some(price) => {
                if let Err(e) = self.store.upsert_fungible_price(token, &price, now).await {
                    tracing::warn!(
                        "[PriceResolver] 🗃️ Failed to cache price for token {} on chain {}: {e}",
                        token.token_address,
                        token.chain_id
                    );
                }
                price
            }
            None => OraclePrice::zero(),
        }
    }

    async fn fetch_feed(&self, feed: PriceFeed) -> Option<OraclePrice> {
        match self.gateway.fetch_usd_price(feed, BlockTag::Latest).await {
            Ok(price) => Some(price),
            Err(e) => {
                tracing::warn!(
                    "[PriceResolver] 🔴 Price feed {} on chain {} unavailable, degrading to zero: {e}",
                    feed.contract_address,
                    feed.chain_id
                );
                None
            }
        }
    }
}

fn fresh_price(
    stored: Option<&StoredPrice>,
    now: DateTime<Utc>,
    interval: Duration,
) -> Option<OraclePrice> {
    stored
        .filter(|stored| is_fresh(stored.updated_at, now, interval))
        .map(|stored| stored.price.clone())
}
