//! Asset Catalog: the static, loaded-once registry of supported chains,
//! native-asset price feeds, and token deployments. Immutable after
//! construction, so concurrent reads need no locking.

pub mod documents;

use std::fs;
use std::path::Path;

use alloy::primitives::Address;
use folio_types::ChainId;
use thiserror::Error;

pub use documents::{ChainSpec, Deployment, Erc20Token, Erc721Token, TokenDocument};

const RPC_KEY_PLACEHOLDER: &str = "{rpcKey}";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read definition document {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed definition document {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default)]
pub struct AssetCatalog {
    chains: Vec<ChainSpec>,
    erc20: Vec<Erc20Token>,
    erc721: Vec<Erc721Token>,
}

impl AssetCatalog {
    /// Load the catalog from the two declarative documents.
    ///
    /// An absent document path degrades to an empty section (nothing priced)
    /// rather than failing startup; a present but malformed document is a
    /// configuration error and fails loudly.
    pub fn load(
        chain_document: &Path,
        token_document: &Path,
        rpc_key: Option<&str>,
    ) -> Result<Self, CatalogError> {
        let chains: Vec<ChainSpec> = match read_document::<Vec<ChainSpec>>(chain_document)? {
            Some(mut chains) => {
                for chain in &mut chains {
                    chain.rpc_url = substitute_rpc_key(&chain.rpc_url, rpc_key);
                }
                chains
            }
            None => Vec::new(),
        };

        let tokens: TokenDocument = read_document(token_document)?.unwrap_or_default();

        tracing::info!(
            "[AssetCatalog] 📒 Loaded {} chains, {} ERC-20 tokens, {} ERC-721 tokens",
            chains.len(),
            tokens.erc20_tokens.len(),
            tokens.erc721_tokens.len()
        );

        Ok(Self {
            chains,
            erc20: tokens.erc20_tokens,
            erc721: tokens.erc721_tokens,
        })
    }

    /// Build a catalog from already-parsed parts (tests, embedded defaults).
    pub fn from_parts(
        chains: Vec<ChainSpec>,
        erc20: Vec<Erc20Token>,
        erc721: Vec<Erc721Token>,
    ) -> Self {
        Self {
            chains,
            erc20,
            erc721,
        }
    }

    pub fn chains(&self) -> &[ChainSpec] {
        &self.chains
    }

    pub fn erc20_tokens(&self) -> &[Erc20Token] {
        &self.erc20
    }

    pub fn erc721_tokens(&self) -> &[Erc721Token] {
        &self.erc721
    }

    pub fn find_chain(&self, chain_id: ChainId) -> Option<&ChainSpec> {
        self.chains.iter().find(|chain| chain.chain_id == chain_id)
    }

    pub fn find_erc20_by_deployment(
        &self,
        address: Address,
        chain_id: ChainId,
    ) -> Option<&Erc20Token> {
        self.erc20
            .iter()
            .find(|token| has_deployment(&token.deployments, address, chain_id))
    }

    pub fn find_erc721_by_deployment(
        &self,
        address: Address,
        chain_id: ChainId,
    ) -> Option<&Erc721Token> {
        self.erc721
            .iter()
            .find(|token| has_deployment(&token.deployments, address, chain_id))
    }
}

fn has_deployment(deployments: &[Deployment], address: Address, chain_id: ChainId) -> bool {
    deployments
        .iter()
        .any(|d| d.address == address && d.chain_id == chain_id)
}

fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, CatalogError> {
    if !path.exists() {
        tracing::warn!(
            "[AssetCatalog] ⚠️ Definition document {} not found, section stays empty",
            path.display()
        );
        return Ok(None);
    }

    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let parsed = serde_json::from_str(&raw).map_err(|source| CatalogError::Malformed {
        path: path.display().to_string(),
        source,
    })?;

    Ok(Some(parsed))
}

fn substitute_rpc_key(rpc_url: &str, rpc_key: Option<&str>) -> String {
    match rpc_key {
        Some(key) => rpc_url.replace(RPC_KEY_PLACEHOLDER, key),
        None => rpc_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN_DOC: &str = r#"[
        {
            "chainId": 1,
            "rpcUrl": "https://eth-mainnet.example.com/v2/{rpcKey}",
            "name": "Ethereum",
            "symbol": "ETH",
            "decimals": 18,
            "usdPriceFeed": {
                "chainId": 1,
                "contractAddress": "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419"
            }
        }
    ]"#;

    const TOKEN_DOC: &str = r#"{
        "erc20Tokens": [
            {
                "name": "USD Coin",
                "decimals": 6,
                "usdPriceFeed": {
                    "chainId": 1,
                    "contractAddress": "0x8fFfFfd4AfB6115b954Bd326cbe7B4BA576818f6"
                },
                "deployments": [
                    { "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "chainId": 1 },
                    { "address": "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174", "chainId": 137 }
                ]
            }
        ],
        "erc721Tokens": [
            {
                "name": "Bored Ape Yacht Club",
                "ethPriceFeed": {
                    "chainId": 1,
                    "contractAddress": "0x352f2Bc3039429fC2fe62004a1575aE74001CfcE"
                },
                "deployments": [
                    { "address": "0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D", "chainId": 1 }
                ]
            }
        ]
    }"#;

    fn parsed_catalog() -> AssetCatalog {
        let chains: Vec<ChainSpec> = serde_json::from_str(CHAIN_DOC).unwrap();
        let tokens: TokenDocument = serde_json::from_str(TOKEN_DOC).unwrap();
        AssetCatalog::from_parts(chains, tokens.erc20_tokens, tokens.erc721_tokens)
    }

    #[test]
    fn parses_chain_document() {
        let catalog = parsed_catalog();
        let chain = catalog.find_chain(ChainId(1)).unwrap();
        assert_eq!(chain.symbol, "ETH");
        assert_eq!(chain.decimals, 18);
        assert_eq!(chain.usd_price_feed.chain_id, ChainId(1));
    }

    #[test]
    fn finds_deployments_per_chain() {
        let catalog = parsed_catalog();
        let polygon_usdc: Address = "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"
            .parse()
            .unwrap();

        let token = catalog
            .find_erc20_by_deployment(polygon_usdc, ChainId(137))
            .unwrap();
        assert_eq!(token.name, "USD Coin");

        // Same address on the wrong chain is not a deployment.
        assert!(
            catalog
                .find_erc20_by_deployment(polygon_usdc, ChainId(1))
                .is_none()
        );
    }

    #[test]
    fn finds_erc721_deployment() {
        let catalog = parsed_catalog();
        let bayc: Address = "0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D"
            .parse()
            .unwrap();
        assert!(
            catalog
                .find_erc721_by_deployment(bayc, ChainId(1))
                .is_some()
        );
    }

    #[test]
    fn substitutes_rpc_key_placeholder() {
        assert_eq!(
            substitute_rpc_key("https://rpc.example.com/{rpcKey}", Some("secret")),
            "https://rpc.example.com/secret"
        );
        // No key configured leaves the url untouched.
        assert_eq!(
            substitute_rpc_key("https://rpc.example.com/{rpcKey}", None),
            "https://rpc.example.com/{rpcKey}"
        );
    }

    #[test]
    fn missing_documents_yield_empty_catalog() {
        let catalog = AssetCatalog::load(
            Path::new("/nonexistent/chains.json"),
            Path::new("/nonexistent/tokens.json"),
            None,
        )
        .unwrap();
        assert!(catalog.chains().is_empty());
        assert!(catalog.erc20_tokens().is_empty());
        assert!(catalog.erc721_tokens().is_empty());
    }
}
