//! The valuation math: pure, synchronous, no I/O. Joins a balance snapshot
//! with resolved prices; everything upstream (cache reads, feed fetches) has
//! already happened by the time this runs.

use std::collections::HashMap;

use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use folio_types::{
    ChainId, FungibleTokenId, NftPrice, OraclePrice, WalletPortfolioData, u256_to_decimal,
    with_decimals,
};

use crate::dto::{ValuedAssetBalance, ValuedFungibleBalance, ValuedNftBalance, ValuedPortfolio};

/// Everything needed to value one asset: the token's own decimal scale and
/// its resolved USD price.
#[derive(Debug, Clone)]
pub struct AssetPricing {
    pub token_decimals: u32,
    pub price: OraclePrice,
}

/// Resolved pricing for every distinct asset key in a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ValuationInputs {
    pub native: HashMap<ChainId, AssetPricing>,
    pub fungible: HashMap<FungibleTokenId, AssetPricing>,
}

/// Value a snapshot against resolved prices.
///
/// Zero balances are dropped, not priced. NFT entries surface only when the
/// wallet actually owns assets, and each is explicitly `Unpriced` (zero) —
/// per-token NFT valuation is a known limitation, not a silent default.
pub fn value_portfolio(snapshot: &WalletPortfolioData, inputs: &ValuationInputs) -> ValuedPortfolio {
    let native_balances: Vec<ValuedAssetBalance> = snapshot
        .native_balances
        .iter()
        .filter(|balance| !balance.amount.is_zero())
        .map(|balance| ValuedAssetBalance {
            chain_id: balance.chain_id,
            amount: balance.amount,
            value: asset_value(balance.amount, inputs.native.get(&balance.chain_id)),
        })
        .collect();

    let fungible_balances: Vec<ValuedFungibleBalance> = snapshot
        .fungible_balances
        .iter()
        .filter(|balance| !balance.amount.is_zero())
        .map(|balance| {
            let key = FungibleTokenId {
                token_address: balance.token_address,
                chain_id: balance.chain_id,
            };
            ValuedFungibleBalance {
                token_address: balance.token_address,
                chain_id: balance.chain_id,
                amount: balance.amount,
                value: asset_value(balance.amount, inputs.fungible.get(&key)),
            }
        })
        .collect();

    let nft_balances: Vec<ValuedNftBalance> = snapshot
        .nft_balances
        .iter()
        .filter(|balance| balance.owns_asset)
        .map(|balance| {
            let price = NftPrice::Unpriced;
            ValuedNftBalance {
                token_address: balance.token_address,
                chain_id: balance.chain_id,
                amount_of_owned_assets: balance.amount_of_owned_assets,
                value: price.value(),
                price,
            }
        })
        .collect();

    let total_value = native_balances
        .iter()
        .map(|b| &b.value)
        .chain(fungible_balances.iter().map(|b| &b.value))
        .chain(nft_balances.iter().map(|b| &b.value))
        .fold(BigDecimal::from(0), |acc, value| acc + value);

    ValuedPortfolio {
        wallet_address: snapshot.wallet_address.clone(),
        native_balances,
        fungible_balances,
        nft_balances,
        total_value,
        failed_calls: snapshot.failed_calls.clone(),
        updated_at: snapshot.updated_at,
    }
}

/// `amount`, scaled to a decimal quantity by the token's decimals, times the
/// USD price. An asset with no resolved pricing values as zero.
fn asset_value(amount: U256, pricing: Option<&AssetPricing>) -> BigDecimal {
    match pricing {
        Some(pricing) => {
            let quantity = with_decimals(&u256_to_decimal(amount), pricing.token_decimals);
            quantity * pricing.price.to_usd()
        }
        None => BigDecimal::from(0),
    }
}
