//! Valued output shapes handed to the transport layer. Derived per read,
//! never persisted.

use alloy::primitives::{Address, U256};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use folio_types::{ChainId, FailedCall, NftPrice};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedAssetBalance {
    pub chain_id: ChainId,
    pub amount: U256,
    pub value: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedFungibleBalance {
    pub token_address: Address,
    pub chain_id: ChainId,
    pub amount: U256,
    pub value: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedNftBalance {
    pub token_address: Address,
    pub chain_id: ChainId,
    pub amount_of_owned_assets: U256,
    /// Explicitly `Unpriced` until per-token NFT pricing lands.
    pub price: NftPrice,
    pub value: BigDecimal,
}

/// A wallet's valued holdings plus the bookkeeping of the refresh run the
/// balances came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedPortfolio {
    pub wallet_address: String,
    pub native_balances: Vec<ValuedAssetBalance>,
    pub fungible_balances: Vec<ValuedFungibleBalance>,
    pub nft_balances: Vec<ValuedNftBalance>,
    pub total_value: BigDecimal,
    pub failed_calls: Vec<FailedCall>,
    pub updated_at: DateTime<Utc>,
}

/// Read-path result: a valued snapshot, or an explicit "not yet available"
/// for wallets that were never fetched. Never a partial valuation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum PortfolioView {
    Valued(ValuedPortfolio),
    Unavailable,
}

/// What a refresh trigger did. All variants are "accepted" to the caller;
/// `AlreadyInProgress` is deduplication, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Scheduled,
    AlreadyInProgress,
    ShuttingDown,
}
