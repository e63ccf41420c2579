use alloy::primitives::Address;
use folio_types::ChainId;
use thiserror::Error;

/// A blockchain read failed: transport, RPC-level, or response decoding.
///
/// Whether a failure aborts the surrounding operation is the caller's call:
/// balance batches recover per asset, native-balance and price reads are
/// atomic.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC endpoint rejected the request: {code} {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed RPC response: {0}")]
    Malformed(String),

    #[error("chain {0} is not configured")]
    UnknownChain(ChainId),

    #[error("invalid RPC url for chain {chain_id}: {url}")]
    InvalidEndpoint { chain_id: ChainId, url: String },

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("price feed read failed for {contract} on chain {chain_id}")]
    PriceFeed {
        contract: Address,
        chain_id: ChainId,
    },
}

/// Why one call inside a batch produced no usable bytes. The surrounding
/// batch still succeeds; this is per-item bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The endpoint returned a JSON-RPC error object for this id.
    Rpc { code: i64, message: String },
    /// No entry with this id came back in the batch response.
    MissingResponse,
    /// The entry came back without a usable `result` payload.
    MissingResult,
    /// The payload was not valid hex-encoded call data.
    Decode,
}
