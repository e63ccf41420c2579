use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct FolioCli {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Path to the chain definition document
    #[arg(long, env = "CHAIN_DOCUMENT", default_value = "config/chains.json")]
    pub chain_document: PathBuf,

    /// Path to the token definition document
    #[arg(long, env = "TOKEN_DOCUMENT", default_value = "config/tokens.json")]
    pub token_document: PathBuf,

    /// API key substituted into `{rpcKey}` placeholders in RPC urls
    #[arg(long, env = "RPC_KEY")]
    pub rpc_key: Option<String>,

    /// How long a balance snapshot stays fresh, in seconds (default 7 days)
    #[arg(long, env = "BALANCE_REFRESH_INTERVAL_SECS", default_value = "604800")]
    pub balance_refresh_interval_secs: i64,

    /// How long a cached price stays fresh, in seconds (default 1 day)
    #[arg(long, env = "PRICE_REFRESH_INTERVAL_SECS", default_value = "86400")]
    pub price_refresh_interval_secs: i64,

    /// Per-request RPC timeout in seconds
    #[arg(long, env = "RPC_TIMEOUT_SECS", default_value = "10")]
    pub rpc_timeout_secs: u64,
}
