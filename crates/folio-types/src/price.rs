use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::chain::ChainId;
use crate::num::with_decimals;

/// Location of a ChainLink-style price oracle contract. The feed may live on
/// a different chain than the asset it prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFeed {
    pub chain_id: ChainId,
    pub contract_address: Address,
}

/// Key of a fungible token price: one ERC-20 deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FungibleTokenId {
    pub token_address: Address,
    pub chain_id: ChainId,
}

/// Key of an NFT price lookup: one ERC-721 deployment.
///
/// Deliberately a distinct type from [`FungibleTokenId`] so NFT lookups can
/// never collide with fungible ones in a shared map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NftTokenId {
    pub token_address: Address,
    pub chain_id: ChainId,
}

/// Raw oracle read: the feed's `latestAnswer` together with its `decimals`.
///
/// The answer is kept unscaled; [`OraclePrice::to_usd`] applies the feed's
/// scale. A price without its decimal scale is meaningless, which is why the
/// two fields travel together and the two-call read is atomic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OraclePrice {
    pub answer: BigDecimal,
    pub decimals: u32,
}

impl OraclePrice {
    /// The "no price known" placeholder used when a feed is missing or broken.
    pub fn zero() -> Self {
        Self {
            answer: BigDecimal::from(0),
            decimals: 0,
        }
    }

    /// USD price with the feed's scale applied.
    pub fn to_usd(&self) -> BigDecimal {
        with_decimals(&self.answer, self.decimals)
    }
}

/// Per-token NFT valuation outcome.
///
/// Pricing of individual NFTs is not implemented; `Unpriced` values as zero
/// and is surfaced explicitly rather than silently defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NftPrice {
    Priced(BigDecimal),
    Unpriced,
}

impl NftPrice {
    pub fn value(&self) -> BigDecimal {
        match self {
            Self::Priced(value) => value.clone(),
            Self::Unpriced => BigDecimal::from(0),
        }
    }
}
