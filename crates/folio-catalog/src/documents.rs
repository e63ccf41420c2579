//! Wire format of the two declarative definition documents (camelCase JSON).

use alloy::primitives::Address;
use folio_types::{ChainId, PriceFeed};
use serde::Deserialize;

/// One supported blockchain network.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSpec {
    pub chain_id: ChainId,
    /// RPC endpoint. May contain a `{rpcKey}` placeholder, substituted from
    /// configuration at load time.
    pub rpc_url: String,
    pub name: String,
    pub symbol: String,
    /// Native-asset decimals (18 for most EVM chains).
    pub decimals: u32,
    pub usd_price_feed: PriceFeed,
}

/// One deployment of a logical token: the same token may live at different
/// addresses on different chains.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub address: Address,
    pub chain_id: ChainId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Token {
    pub deployments: Vec<Deployment>,
    pub name: String,
    pub usd_price_feed: PriceFeed,
    pub decimals: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc721Token {
    pub deployments: Vec<Deployment>,
    pub name: String,
    /// ETH-denominated feed. Unused until NFT pricing lands.
    pub eth_price_feed: PriceFeed,
}

/// Root of the token definition document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenDocument {
    pub erc20_tokens: Vec<Erc20Token>,
    pub erc721_tokens: Vec<Erc721Token>,
}
