pub mod abi;
pub mod client;
pub mod error;
pub mod gateway;

pub use client::{CallOutcome, ChainClient, EncodedCall};
pub use error::{CallFailure, ChainError};
pub use gateway::{BlockchainGateway, TokenBalanceRequest, TokenBalances, TokenKind};
