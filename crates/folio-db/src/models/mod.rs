pub mod fungible_token_price;
pub mod native_asset_price;
pub mod wallet_portfolio;

pub use fungible_token_price::FungibleTokenPriceRow;
pub use native_asset_price::NativeAssetPriceRow;
pub use wallet_portfolio::WalletPortfolioRow;
