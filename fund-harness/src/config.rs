use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use eyre::Result;
use serde::Deserialize;

use crate::error::HarnessError;

/// Harness settings
///
/// This structure contains all the runtime parameters for the harness: the
/// RPC endpoint, gas defaults for node-signed transactions, the fund reward
/// parameters passed to `setupFund`, and the locations of the deployment
/// artifacts (address book, token registry, ABI directory).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Ethereum RPC endpoint URL for communicating with the dev chain
    pub rpc_url: String,

    /// Deployment environment to select from the address book
    pub environment: String,

    /// Default gas limit for state-changing transactions
    pub gas: u64,

    /// Default gas price in wei
    pub gas_price: u64,

    /// Management reward parameter forwarded to `setupFund`
    pub management_reward: u64,

    /// Performance reward parameter forwarded to `setupFund`
    pub performance_reward: u64,

    /// Path to the deployment address book (JSON)
    pub address_book: PathBuf,

    /// Path to the token registry (JSON)
    pub token_info: PathBuf,

    /// Directory holding the contract ABI files
    pub abi_dir: PathBuf,

    /// Base URL of the spot-price API used to drive the datafeed oracle
    pub price_api_url: String,
}

impl Settings {
    /// Load settings from the deployment file and the environment
    ///
    /// Values come from `deployment/harness.toml` when present, overridden by
    /// `FUND_*` environment variables, with defaults matching a local dev
    /// chain. A `.env` file is honored for development.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (useful for development)
        let _ = dotenv::dotenv();

        let settings = config::Config::builder()
            .set_default("rpc_url", "http://localhost:8545")?
            .set_default("environment", "development")?
            .set_default("gas", 6_700_000u64)?
            .set_default("gas_price", 100_000_000_000u64)?
            .set_default("management_reward", 0u64)?
            .set_default("performance_reward", 0u64)?
            .set_default("address_book", "deployment/address-book.json")?
            .set_default("token_info", "deployment/token-info.json")?
            .set_default("abi_dir", "abi")?
            .set_default("price_api_url", "https://min-api.cryptocompare.com/data/price")?
            .add_source(config::File::with_name("deployment/harness").required(false))
            .add_source(config::Environment::with_prefix("FUND"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Addresses of one deployed instance of the protocol
///
/// Field names mirror the contract names used by the deployment scripts.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployedAddresses {
    #[serde(rename = "Version")]
    pub version: Address,
    #[serde(rename = "DataFeed")]
    pub datafeed: Address,
    #[serde(rename = "Participation")]
    pub participation: Address,
    #[serde(rename = "MlnToken")]
    pub mln_token: Address,
    #[serde(rename = "EthToken")]
    pub eth_token: Address,
    #[serde(rename = "EurToken")]
    pub eur_token: Address,
    #[serde(rename = "RMMakeOrders")]
    pub rm_make_orders: Address,
    #[serde(rename = "Sphere")]
    pub sphere: Address,
}

impl DeployedAddresses {
    /// Name/address pairs, in deployment order, for diagnostics
    pub fn entries(&self) -> Vec<(&'static str, Address)> {
        vec![
            ("Version", self.version),
            ("DataFeed", self.datafeed),
            ("Participation", self.participation),
            ("MlnToken", self.mln_token),
            ("EthToken", self.eth_token),
            ("EurToken", self.eur_token),
            ("RMMakeOrders", self.rm_make_orders),
            ("Sphere", self.sphere),
        ]
    }
}

/// Per-environment map of deployed contract addresses
#[derive(Debug, Clone, Deserialize)]
pub struct AddressBook(HashMap<String, DeployedAddresses>);

impl AddressBook {
    /// Load the address book from a JSON file
    ///
    /// Addresses are parsed eagerly so malformed entries fail at load time
    /// rather than on first use.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HarnessError::AddressBook(format!("read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse the address book from a JSON string
    pub fn parse(content: &str) -> Result<Self> {
        let book: AddressBook = serde_json::from_str(content)
            .map_err(|e| HarnessError::AddressBook(format!("parse: {}", e)))?;
        Ok(book)
    }

    /// Resolve the addresses for a named environment
    pub fn environment(&self, name: &str) -> Result<&DeployedAddresses> {
        self.0
            .get(name)
            .ok_or_else(|| HarnessError::AddressBook(format!("unknown environment '{}'", name)).into())
    }
}

/// One registered token of the deployment
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
}

/// Registry of the premined test tokens
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRegistry(Vec<TokenInfo>);

impl TokenRegistry {
    /// Load the token registry from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| HarnessError::Config(format!("read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Parse the token registry from a JSON string
    pub fn parse(content: &str) -> Result<Self> {
        let registry: TokenRegistry = serde_json::from_str(content)
            .map_err(|e| HarnessError::Config(format!("parse token registry: {}", e)))?;
        Ok(registry)
    }

    /// Look up a token by symbol
    pub fn get(&self, symbol: &str) -> Result<&TokenInfo> {
        self.0
            .iter()
            .find(|token| token.symbol == symbol)
            .ok_or_else(|| HarnessError::Config(format!("unknown token '{}'", symbol)).into())
    }

    /// Decimals of a token, by symbol
    pub fn decimals(&self, symbol: &str) -> Result<u8> {
        Ok(self.get(symbol)?.decimals)
    }
}
