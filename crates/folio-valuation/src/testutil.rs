//! In-memory fakes behind the trait seams, so unit tests run without a
//! database or network.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_catalog::{AssetCatalog, ChainSpec, Deployment, Erc20Token, Erc721Token};
use folio_chain::{ChainError, TokenBalanceRequest, TokenBalances};
use folio_types::{
    AssetBalance, BlockTag, ChainId, FungibleTokenId, OraclePrice, PriceFeed, WalletPortfolioData,
};
use tokio::sync::{Mutex, Semaphore};

use crate::error::ValuationError;
use crate::traits::{ChainGateway, PortfolioStore, PriceStore, StoredPrice};

pub(crate) const WALLET: &str = "0x00000000000000000000000000000000000000aa";

pub(crate) fn addr(byte: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = byte;
    Address::from(bytes)
}

fn feed(byte: u8) -> PriceFeed {
    PriceFeed {
        chain_id: ChainId(1),
        contract_address: addr(byte),
    }
}

/// One chain, three ERC-20 tokens, one ERC-721 collection, all on chain 1.
pub(crate) fn test_catalog() -> AssetCatalog {
    let chains = vec![ChainSpec {
        chain_id: ChainId(1),
        rpc_url: "http://localhost:8545".to_string(),
        name: "Ethereum".to_string(),
        symbol: "ETH".to_string(),
        decimals: 18,
        usd_price_feed: feed(0xf0),
    }];

    let erc20 = vec![
        Erc20Token {
            deployments: vec![Deployment {
                address: addr(0x11),
                chain_id: ChainId(1),
            }],
            name: "Token One".to_string(),
            usd_price_feed: feed(0xf1),
            decimals: 6,
        },
        Erc20Token {
            deployments: vec![Deployment {
                address: addr(0x12),
                chain_id: ChainId(1),
            }],
            name: "Token Two".to_string(),
            usd_price_feed: feed(0xf2),
            decimals: 6,
        },
        Erc20Token {
            deployments: vec![Deployment {
                address: addr(0x13),
                chain_id: ChainId(1),
            }],
            name: "Token Three".to_string(),
            usd_price_feed: feed(0xf3),
            decimals: 18,
        },
    ];

    let erc721 = vec![Erc721Token {
        deployments: vec![Deployment {
            address: addr(0x21),
            chain_id: ChainId(1),
        }],
        name: "Test Apes".to_string(),
        eth_price_feed: feed(0xfe),
    }];

    AssetCatalog::from_parts(chains, erc20, erc721)
}

pub(crate) fn wallet_snapshot(native: Vec<AssetBalance>) -> WalletPortfolioData {
    WalletPortfolioData {
        wallet_address: WALLET.to_string(),
        native_balances: native,
        fungible_balances: Vec::new(),
        nft_balances: Vec::new(),
        failed_calls: Vec::new(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub(crate) struct MemoryPortfolioStore {
    snapshots: Mutex<HashMap<String, WalletPortfolioData>>,
}

impl MemoryPortfolioStore {
    pub(crate) async fn get(&self, wallet: &str) -> Option<WalletPortfolioData> {
        self.snapshots.lock().await.get(wallet).cloned()
    }

    pub(crate) async fn seed(&self, data: WalletPortfolioData) {
        self.snapshots
            .lock()
            .await
            .insert(data.wallet_address.clone(), data);
    }
}

#[async_trait]
impl PortfolioStore for MemoryPortfolioStore {
    async fn get_wallet_portfolio(
        &self,
        wallet: &str,
    ) -> Result<Option<WalletPortfolioData>, ValuationError> {
        Ok(self.get(wallet).await)
    }

    async fn upsert_wallet_portfolio(
        &self,
        data: &WalletPortfolioData,
    ) -> Result<(), ValuationError> {
        self.seed(data.clone()).await;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryPriceStore {
    native: Mutex<HashMap<ChainId, StoredPrice>>,
    fungible: Mutex<HashMap<FungibleTokenId, StoredPrice>>,
}

impl MemoryPriceStore {
    pub(crate) async fn seed_native(
        &self,
        chain_id: ChainId,
        price: OraclePrice,
        updated_at: DateTime<Utc>,
    ) {
        self.native
            .lock()
            .await
            .insert(chain_id, StoredPrice { price, updated_at });
    }
}

pub(crate) fn memory_price_store() -> MemoryPriceStore {
    MemoryPriceStore::default()
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
    async fn fetch_native_prices(
        &self,
        chain_ids: &[ChainId],
    ) -> Result<HashMap<ChainId, StoredPrice>, ValuationError> {
        let native = self.native.lock().await;
        Ok(chain_ids
            .iter()
            .filter_map(|chain_id| Some((*chain_id, native.get(chain_id)?.clone())))
            .collect())
    }

    async fn fetch_fungible_prices(
        &self,
        tokens: &[FungibleTokenId],
    ) -> Result<HashMap<FungibleTokenId, StoredPrice>, ValuationError> {
        let fungible = self.fungible.lock().await;
        Ok(tokens
            .iter()
            .filter_map(|token| Some((*token, fungible.get(token)?.clone())))
            .collect())
    }

    async fn upsert_native_price(
        &self,
        chain_id: ChainId,
        price: &OraclePrice,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ValuationError> {
        self.seed_native(chain_id, price.clone(), updated_at).await;
        Ok(())
    }

    async fn upsert_fungible_price(
        &self,
        token: FungibleTokenId,
        price: &OraclePrice,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ValuationError> {
        self.fungible.lock().await.insert(
            token,
            StoredPrice {
                price: price.clone(),
                updated_at,
            },
        );
        Ok(())
    }
}

/// Gateway fake with scripted per-chain results and call counters. An
/// optional gate blocks native-balance calls until the test releases them.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    native_balances: std::sync::Mutex<HashMap<ChainId, U256>>,
    native_failures: std::sync::Mutex<HashSet<ChainId>>,
    token_results: std::sync::Mutex<HashMap<ChainId, TokenBalances>>,
    prices: std::sync::Mutex<HashMap<(ChainId, Address), OraclePrice>>,
    balance_calls: AtomicUsize,
    price_calls: AtomicUsize,
    gate: std::sync::Mutex<Option<Arc<Semaphore>>>,
}

impl ScriptedGateway {
    pub(crate) fn set_native_balance(&self, chain_id: ChainId, amount: U256) {
        self.native_balances.lock().unwrap().insert(chain_id, amount);
    }

    pub(crate) fn fail_native_balance(&self, chain_id: ChainId) {
        self.native_failures.lock().unwrap().insert(chain_id);
    }

    pub(crate) fn set_token_balances(&self, chain_id: ChainId, balances: TokenBalances) {
        self.token_results.lock().unwrap().insert(chain_id, balances);
    }

    pub(crate) fn set_price(&self, feed: PriceFeed, price: OraclePrice) {
        self.prices
            .lock()
            .unwrap()
            .insert((feed.chain_id, feed.contract_address), price);
    }

    pub(crate) fn install_gate(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainGateway for ScriptedGateway {
    async fn fetch_native_balance(
        &self,
        chain_id: ChainId,
        _wallet: &str,
        _block: BlockTag,
    ) -> Result<U256, ChainError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if self.native_failures.lock().unwrap().contains(&chain_id) {
            return Err(ChainError::Malformed(
                "scripted native-balance failure".to_string(),
            ));
        }

        Ok(self
            .native_balances
            .lock()
            .unwrap()
            .get(&chain_id)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn fetch_token_balances(
        &self,
        chain_id: ChainId,
        _requests: &[TokenBalanceRequest],
        _wallet: &str,
        _block: BlockTag,
    ) -> Result<TokenBalances, ChainError> {
        Ok(self
            .token_results
            .lock()
            .unwrap()
            .get(&chain_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_usd_price(
        &self,
        feed: PriceFeed,
        _block: BlockTag,
    ) -> Result<OraclePrice, ChainError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.prices
            .lock()
            .unwrap()
            .get(&(feed.chain_id, feed.contract_address))
            .cloned()
            .ok_or(ChainError::PriceFeed {
                contract: feed.contract_address,
                chain_id: feed.chain_id,
            })
    }
}
