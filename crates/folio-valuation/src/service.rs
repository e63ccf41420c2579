//! The two operations the transport layer consumes: a cache-backed read and
//! a fire-and-forget force refresh. The read path never runs the balance
//! fan-out; at most it performs bounded price-feed reads for missing or
//! stale prices.

use std::sync::Arc;

use chrono::{Duration, Utc};
use folio_catalog::AssetCatalog;

use crate::dto::{PortfolioView, RefreshOutcome};
use crate::engine;
use crate::error::ValuationError;
use crate::prices::{PriceResolver, is_fresh};
use crate::refresh::RefreshCoordinator;
use crate::traits::{ChainGateway, PortfolioStore, PriceStore};

#[derive(Debug, Clone)]
pub struct ValuationConfig {
    pub balance_refresh_interval: Duration,
    pub price_refresh_interval: Duration,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            balance_refresh_interval: Duration::days(7),
            price_refresh_interval: Duration::days(1),
        }
    }
}

pub struct PortfolioService {
    store: Arc<dyn PortfolioStore>,
    prices: Arc<dyn PriceStore>,
    gateway: Arc<dyn ChainGateway>,
    catalog: Arc<AssetCatalog>,
    coordinator: RefreshCoordinator,
    config: ValuationConfig,
}

impl PortfolioService {
    pub fn new(
        store: Arc<dyn PortfolioStore>,
        prices: Arc<dyn PriceStore>,
        gateway: Arc<dyn ChainGateway>,
        catalog: Arc<AssetCatalog>,
        config: ValuationConfig,
    ) -> Self {
        let coordinator = RefreshCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&gateway),
            Arc::clone(&catalog),
        );
        Self {
            store,
            prices,
            gateway,
            catalog,
            coordinator,
            config,
        }
    }

    /// Read a wallet's valued portfolio from the caches.
    ///
    /// A never-fetched wallet gets `Unavailable` and a background refresh. A
    /// stale snapshot also triggers a refresh but is still served — the
    /// caller sees the previous consistent snapshot, eventually the new one.
    pub async fn fetch_portfolio(&self, wallet: &str) -> Result<PortfolioView, ValuationError> {
        let now = Utc::now();

        let Some(snapshot) = self.store.get_wallet_portfolio(wallet).await? else {
            tracing::info!("[PortfolioService] 📭 No snapshot for {wallet}, scheduling refresh");
            self.coordinator.schedule(wallet);
            return Ok(PortfolioView::Unavailable);
        };

        if !is_fresh(snapshot.updated_at, now, self.config.balance_refresh_interval) {
            self.coordinator.schedule(wallet);
        }

        let resolver = PriceResolver {
            store: self.prices.as_ref(),
            gateway: self.gateway.as_ref(),
            catalog: self.catalog.as_ref(),
            refresh_interval: self.config.price_refresh_interval,
        };
        let inputs = resolver.resolve(&snapshot, now).await?;

        Ok(PortfolioView::Valued(engine::value_portfolio(
            &snapshot, &inputs,
        )))
    }

    /// Force a refresh, regardless of staleness. Returns immediately; a
    /// trigger that lost the dedup race is a no-op, not an error.
    pub fn refresh_portfolio(&self, wallet: &str) -> RefreshOutcome {
        self.coordinator.schedule(wallet)
    }

    /// Drain the refresh worker pool: no new jobs, in-flight jobs finish.
    pub async fn shutdown(&self) {
        self.coordinator.shutdown().await;
    }
}
