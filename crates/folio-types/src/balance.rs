use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chain::ChainId;

/// Native-asset balance on one chain, in the chain's base units (wei-scale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub chain_id: ChainId,
    pub amount: U256,
}

/// ERC-20 balance of one deployment, in the token's raw units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleTokenBalance {
    pub token_address: Address,
    pub chain_id: ChainId,
    pub amount: U256,
}

/// ERC-721 holdings for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTokenBalance {
    pub token_address: Address,
    pub chain_id: ChainId,
    pub owns_asset: bool,
    /// Token ids owned by the wallet. Ownership-list fetching is not
    /// implemented upstream; always empty for now.
    pub owned_assets: Vec<String>,
    pub amount_of_owned_assets: U256,
}

/// One balance call that failed during a refresh. Recorded instead of
/// aborting the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedCall {
    pub token_address: Address,
    pub chain_id: ChainId,
    pub is_nft: bool,
}

/// Full snapshot of a wallet's on-chain holdings, written wholesale by one
/// refresh run. Readers see either the previous snapshot or this one, never
/// a mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletPortfolioData {
    pub wallet_address: String,
    pub native_balances: Vec<AssetBalance>,
    pub fungible_balances: Vec<FungibleTokenBalance>,
    pub nft_balances: Vec<NftTokenBalance>,
    pub failed_calls: Vec<FailedCall>,
    pub updated_at: DateTime<Utc>,
}
