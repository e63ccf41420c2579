//! Blockchain Gateway: fans balance and price queries out over the
//! configured chains, one batch per chain, and keeps the two failure
//! policies apart. Balance batches recover per asset; a price lookup is an
//! atomic two-call read and fails whole.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use alloy::primitives::{Address, U256};
use folio_catalog::AssetCatalog;
use folio_types::{BlockTag, ChainId, FailedCall, OraclePrice, PriceFeed};
use url::Url;

use crate::abi;
use crate::client::{ChainClient, EncodedCall};
use crate::error::ChainError;

/// Which kind of contract a balance call targets. NFT calls reuse
/// `balanceOf` as an owned-asset count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Fungible,
    Nft,
}

/// One token contract to query for a wallet.
#[derive(Debug, Clone, Copy)]
pub struct TokenBalanceRequest {
    pub address: Address,
    pub kind: TokenKind,
}

/// Outcome of one per-chain balance batch: successes keyed by contract,
/// failures recorded instead of aborting the rest.
#[derive(Debug, Clone, Default)]
pub struct TokenBalances {
    pub balances: BTreeMap<Address, U256>,
    pub failed: Vec<FailedCall>,
}

#[derive(Debug, Clone)]
pub struct BlockchainGateway {
    clients: HashMap<ChainId, ChainClient>,
}

impl BlockchainGateway {
    /// Build one client per catalog chain, sharing a single HTTP connection
    /// pool with the given network timeout.
    pub fn from_catalog(catalog: &AssetCatalog, rpc_timeout: Duration) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(rpc_timeout)
            .build()
            .map_err(ChainError::Transport)?;

        let mut clients = HashMap::new();
        for chain in catalog.chains() {
            let endpoint =
                Url::parse(&chain.rpc_url).map_err(|_| ChainError::InvalidEndpoint {
                    chain_id: chain.chain_id,
                    url: chain.rpc_url.clone(),
                })?;
            clients.insert(
                chain.chain_id,
                ChainClient::new(chain.chain_id, endpoint, http.clone()),
            );
        }

        Ok(Self { clients })
    }

    fn client(&self, chain_id: ChainId) -> Result<&ChainClient, ChainError> {
        self.clients
            .get(&chain_id)
            .ok_or(ChainError::UnknownChain(chain_id))
    }

    /// Native balance of `wallet` on one chain. Fatal on failure; there is
    /// no batch to fall back on.
    pub async fn fetch_native_balance(
        &self,
        chain_id: ChainId,
        wallet: &str,
        block: BlockTag,
    ) -> Result<U256, ChainError> {
        let owner = parse_wallet(wallet)?;
        self.client(chain_id)?
            .fetch_native_balance(owner, block)
            .await
    }

    /// Balances of `wallet` for every requested token contract on one
    /// chain, in a single batched call.
    pub async fn fetch_token_balances(
        &self,
        chain_id: ChainId,
        requests: &[TokenBalanceRequest],
        wallet: &str,
        block: BlockTag,
    ) -> Result<TokenBalances, ChainError> {
        if requests.is_empty() {
            return Ok(TokenBalances::default());
        }

        let owner = parse_wallet(wallet)?;
        let calls: Vec<EncodedCall> = requests
            .iter()
            .map(|request| EncodedCall {
                to: request.address,
                data: abi::encode_balance_of(owner),
            })
            .collect();

        let outcomes = self.client(chain_id)?.batch_call(&calls, block).await?;

        let mut result = TokenBalances::default();
        for (request, outcome) in requests.iter().zip(outcomes) {
            // A decode failure is the same as a call failure: this one
            // asset's data is unavailable right now.
            match outcome.ok().as_deref().and_then(abi::decode_balance_of) {
                Some(balance) => {
                    result.balances.insert(request.address, balance);
                }
                None => result.failed.push(FailedCall {
                    token_address: request.address,
                    chain_id,
                    is_nft: request.kind == TokenKind::Nft,
                }),
            }
        }

        Ok(result)
    }

    /// Current USD price from a ChainLink-style feed: `decimals` +
    /// `latestAnswer` in one batch. If either call fails the whole lookup
    /// fails; an answer without its scale is meaningless.
    pub async fn fetch_usd_price(
        &self,
        feed: PriceFeed,
        block: BlockTag,
    ) -> Result<OraclePrice, ChainError> {
        let calls = [
            EncodedCall {
                to: feed.contract_address,
                data: abi::encode_feed_decimals(),
            },
            EncodedCall {
                to: feed.contract_address,
                data: abi::encode_latest_answer(),
            },
        ];

        let outcomes = self.client(feed.chain_id)?.batch_call(&calls, block).await?;

        let decimals = outcomes
            .first()
            .and_then(|o| o.as_deref().ok())
            .and_then(abi::decode_feed_decimals);
        let answer = outcomes
            .get(1)
            .and_then(|o| o.as_deref().ok())
            .and_then(abi::decode_latest_answer);

        match (decimals, answer) {
            (Some(decimals), Some(answer)) => Ok(OraclePrice {
                answer: abi::i256_to_decimal(answer),
                decimals: u32::from(decimals),
            }),
            _ => Err(ChainError::PriceFeed {
                contract: feed.contract_address,
                chain_id: feed.chain_id,
            }),
        }
    }
}

fn parse_wallet(wallet: &str) -> Result<Address, ChainError> {
    wallet
        .parse::<Address>()
        .map_err(|_| ChainError::InvalidAddress(wallet.to_string()))
}
