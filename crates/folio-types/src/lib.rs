pub mod balance;
pub mod chain;
pub mod num;
pub mod price;

pub use balance::{
    AssetBalance, FailedCall, FungibleTokenBalance, NftTokenBalance, WalletPortfolioData,
};
pub use chain::{BlockTag, ChainId};
pub use num::{u256_to_decimal, with_decimals};
pub use price::{FungibleTokenId, NftPrice, NftTokenId, OraclePrice, PriceFeed};
