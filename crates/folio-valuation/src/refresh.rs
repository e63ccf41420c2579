//! Refresh Coordinator: at most one in-flight background refresh per wallet,
//! fire-and-forget scheduling, failures isolated from the caller.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashSet;
use folio_catalog::AssetCatalog;
use folio_chain::{TokenBalanceRequest, TokenKind};
use folio_types::{
    AssetBalance, BlockTag, ChainId, FungibleTokenBalance, NftTokenBalance, WalletPortfolioData,
};
use tokio_util::task::TaskTracker;

use crate::dto::RefreshOutcome;
use crate::error::ValuationError;
use crate::traits::{ChainGateway, PortfolioStore};

pub struct RefreshCoordinator {
    inflight: Arc<DashSet<String>>,
    tracker: TaskTracker,
    store: Arc<dyn PortfolioStore>,
    gateway: Arc<dyn ChainGateway>,
    catalog: Arc<AssetCatalog>,
}

/// Removes the wallet's in-flight marker when the job ends, however it ends.
/// A failed or panicked refresh must never wedge the wallet.
struct InflightGuard {
    set: Arc<DashSet<String>>,
    wallet: String,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.set.remove(&self.wallet);
    }
}

impl RefreshCoordinator {
    pub fn new(
        store: Arc<dyn PortfolioStore>,
        gateway: Arc<dyn ChainGateway>,
        catalog: Arc<AssetCatalog>,
    ) -> Self {
        Self {
            inflight: Arc::new(DashSet::new()),
            tracker: TaskTracker::new(),
            store,
            gateway,
            catalog,
        }
    }

    /// Schedule a background refresh of `wallet` unless one is already in
    /// flight. Never blocks; the caller gets the outcome of the trigger, not
    /// of the refresh itself.
    pub fn schedule(&self, wallet: &str) -> RefreshOutcome {
        if self.tracker.is_closed() {
            tracing::warn!("[RefreshCoordinator] ⏸️ Draining, refresh of {wallet} not accepted");
            return RefreshOutcome::ShuttingDown;
        }

        // Atomic add-if-absent: losing this race means a refresh is already
        // running and this trigger is a no-op.
        if !self.inflight.insert(wallet.to_string()) {
            tracing::debug!("[RefreshCoordinator] Refresh already in progress for {wallet}");
            return RefreshOutcome::AlreadyInProgress;
        }

        let guard = InflightGuard {
            set: Arc::clone(&self.inflight),
            wallet: wallet.to_string(),
        };
        let store = Arc::clone(&self.store);
        let gateway = Arc::clone(&self.gateway);
        let catalog = Arc::clone(&self.catalog);
        let wallet = wallet.to_string();

        self.tracker.spawn(async move {
            let _guard = guard;
            match refresh_wallet(
                store.as_ref(),
                gateway.as_ref(),
                catalog.as_ref(),
                &wallet,
            )
            .await
            {
                Ok(()) => tracing::info!("[RefreshCoordinator] ✅ Refreshed wallet {wallet}"),
                // The previous snapshot stays intact; the next read triggers
                // another attempt.
                Err(e) => {
                    tracing::warn!("[RefreshCoordinator] 🔴 Refresh failed for wallet {wallet}: {e}");
                }
            }
        });

        RefreshOutcome::Scheduled
    }

    pub fn is_refreshing(&self, wallet: &str) -> bool {
        self.inflight.contains(wallet)
    }

    /// Stop accepting new refreshes and wait for in-flight jobs to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

struct ChainRefresh {
    chain_id: ChainId,
    native_amount: alloy::primitives::U256,
    requests: Vec<TokenBalanceRequest>,
    tokens: folio_chain::TokenBalances,
}

/// Fetch the full snapshot for one wallet and upsert it in a single write.
///
/// Per-token call failures are recorded in the snapshot; a native-balance
/// failure on any chain fails the whole job, leaving the previous snapshot
/// untouched.
async fn refresh_wallet(
    store: &dyn PortfolioStore,
    gateway: &dyn ChainGateway,
    catalog: &AssetCatalog,
    wallet: &str,
) -> Result<(), ValuationError> {
    let block = BlockTag::Latest;

    let chain_jobs = catalog.chains().iter().map(|chain| {
        let requests = token_requests(catalog, chain.chain_id);
        async move {
            let native_amount = gateway
                .fetch_native_balance(chain.chain_id, wallet, block)
                .await?;
            let tokens = gateway
                .fetch_token_balances(chain.chain_id, &requests, wallet, block)
                .await?;
            Ok::<ChainRefresh, ValuationError>(ChainRefresh {
                chain_id: chain.chain_id,
                native_amount,
                requests,
                tokens,
            })
        }
    });

    let per_chain = futures::future::try_join_all(chain_jobs).await?;

    let mut data = WalletPortfolioData {
        wallet_address: wallet.to_string(),
        native_balances: Vec::new(),
        fungible_balances: Vec::new(),
        nft_balances: Vec::new(),
        failed_calls: Vec::new(),
        updated_at: Utc::now(),
    };

    for chain in per_chain {
        data.native_balances.push(AssetBalance {
            chain_id: chain.chain_id,
            amount: chain.native_amount,
        });

        for request in &chain.requests {
            let Some(&amount) = chain.tokens.balances.get(&request.address) else {
                // Already recorded in the batch's failed list.
                continue;
            };
            match request.kind {
                TokenKind::Fungible => data.fungible_balances.push(FungibleTokenBalance {
                    token_address: request.address,
                    chain_id: chain.chain_id,
                    amount,
                }),
                TokenKind::Nft => data.nft_balances.push(NftTokenBalance {
                    token_address: request.address,
                    chain_id: chain.chain_id,
                    owns_asset: !amount.is_zero(),
                    // Ownership-list fetching is not implemented.
                    owned_assets: Vec::new(),
                    amount_of_owned_assets: amount,
                }),
            }
        }

        data.failed_calls.extend(chain.tokens.failed);
    }

    store.upsert_wallet_portfolio(&data).await
}

/// Every token deployment to query on one chain, fungible and NFT alike.
fn token_requests(catalog: &AssetCatalog, chain_id: ChainId) -> Vec<TokenBalanceRequest> {
    let fungible = catalog
        .erc20_tokens()
        .iter()
        .flat_map(|token| &token.deployments)
        .filter(|deployment| deployment.chain_id == chain_id)
        .map(|deployment| TokenBalanceRequest {
            address: deployment.address,
            kind: TokenKind::Fungible,
        });

    let nft = catalog
        .erc721_tokens()
        .iter()
        .flat_map(|token| &token.deployments)
        .filter(|deployment| deployment.chain_id == chain_id)
        .map(|deployment| TokenBalanceRequest {
            address: deployment.address,
            kind: TokenKind::Nft,
        });

    fungible.chain(nft).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::U256;
    use tokio::time::{Duration as TokioDuration, sleep};

    use super::*;
    use crate::testutil::{
        MemoryPortfolioStore, ScriptedGateway, WALLET, test_catalog,
    };

    #[tokio::test]
    async fn concurrent_triggers_run_one_fetch() {
        let store = Arc::new(MemoryPortfolioStore::default());
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.set_native_balance(ChainId(1), U256::from(7u64));
        let gate = gateway.install_gate();

        let coordinator = RefreshCoordinator::new(
            store.clone(),
            gateway.clone(),
            Arc::new(test_catalog()),
        );

        assert_eq!(coordinator.schedule(WALLET), RefreshOutcome::Scheduled);

        // Wait until the job is actually inside the gateway call.
        while gateway.balance_calls() == 0 {
            sleep(TokioDuration::from_millis(5)).await;
        }

        // Triggers while in flight are deduplicated no-ops.
        assert_eq!(
            coordinator.schedule(WALLET),
            RefreshOutcome::AlreadyInProgress
        );
        assert_eq!(
            coordinator.schedule(WALLET),
            RefreshOutcome::AlreadyInProgress
        );

        gate.add_permits(1);
        coordinator.shutdown().await;

        assert_eq!(gateway.balance_calls(), 1);
        assert!(!coordinator.is_refreshing(WALLET));
        assert!(store.get(WALLET).await.is_some());
    }

    #[tokio::test]
    async fn failed_refresh_releases_the_marker_and_keeps_nothing() {
        let store = Arc::new(MemoryPortfolioStore::default());
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.fail_native_balance(ChainId(1));

        let coordinator = RefreshCoordinator::new(
            store.clone(),
            gateway.clone(),
            Arc::new(test_catalog()),
        );

        assert_eq!(coordinator.schedule(WALLET), RefreshOutcome::Scheduled);
        coordinator.shutdown().await;

        // Marker released despite the failure; no snapshot written.
        assert!(!coordinator.is_refreshing(WALLET));
        assert!(store.get(WALLET).await.is_none());
    }

    #[tokio::test]
    async fn different_wallets_refresh_independently() {
        let store = Arc::new(MemoryPortfolioStore::default());
        let gateway = Arc::new(ScriptedGateway::default());
        gateway.set_native_balance(ChainId(1), U256::from(1u64));

        let coordinator = RefreshCoordinator::new(
            store.clone(),
            gateway.clone(),
            Arc::new(test_catalog()),
        );

        let other = "0x00000000000000000000000000000000000000bb";
        assert_eq!(coordinator.schedule(WALLET), RefreshOutcome::Scheduled);
        assert_eq!(coordinator.schedule(other), RefreshOutcome::Scheduled);
        coordinator.shutdown().await;

        assert!(store.get(WALLET).await.is_some());
        assert!(store.get(other).await.is_some());
    }

    #[tokio::test]
    async fn draining_coordinator_rejects_new_work() {
        let store = Arc::new(MemoryPortfolioStore::default());
        let gateway = Arc::new(ScriptedGateway::default());
        let coordinator =
            RefreshCoordinator::new(store, gateway, Arc::new(test_catalog()));

        coordinator.shutdown().await;
        assert_eq!(coordinator.schedule(WALLET), RefreshOutcome::ShuttingDown);
    }
}
