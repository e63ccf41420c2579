use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValuationError {
    #[error(transparent)]
    Database(#[from] folio_db::DatabaseError),

    #[error(transparent)]
    Chain(#[from] folio_chain::ChainError),

    #[error("corrupt cache row for wallet {wallet}: {source}")]
    CorruptSnapshot {
        wallet: String,
        source: serde_json::Error,
    },
}
