mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use folio_catalog::AssetCatalog;
use folio_chain::BlockchainGateway;
use folio_db::{init_pool, run_migrations};
use folio_valuation::{PgPortfolioStore, PgPriceStore, PortfolioService, ValuationConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::FolioCli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let FolioCli {
        database_url,
        chain_document,
        token_document,
        rpc_key,
        balance_refresh_interval_secs,
        price_refresh_interval_secs,
        rpc_timeout_secs,
    } = FolioCli::parse();

    let app_name = "folio_api";
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let pool = init_pool(app_name, &database_url)?;
    run_migrations(&pool).await?;

    let catalog = Arc::new(AssetCatalog::load(
        &chain_document,
        &token_document,
        rpc_key.as_deref(),
    )?);

    let gateway = Arc::new(BlockchainGateway::from_catalog(
        &catalog,
        Duration::from_secs(rpc_timeout_secs),
    )?);

    let config = ValuationConfig {
        balance_refresh_interval: chrono::Duration::seconds(balance_refresh_interval_secs),
        price_refresh_interval: chrono::Duration::seconds(price_refresh_interval_secs),
    };

    let service = PortfolioService::new(
        Arc::new(PgPortfolioStore::new(pool.clone())),
        Arc::new(PgPriceStore::new(pool)),
        gateway,
        catalog,
        config,
    );

    tracing::info!("[{app_name}] 🚀 Valuation engine ready, waiting for shutdown signal");

    // The transport layer mounts on `service`; this binary just keeps the
    // worker pool alive and drains it on SIGINT.
    tokio::signal::ctrl_c().await?;
    tracing::info!("[{app_name}] ⏳ Draining in-flight refreshes before exit");
    service.shutdown().await;
    tracing::info!("[{app_name}] 👋 Bye!");

    Ok(())
}
