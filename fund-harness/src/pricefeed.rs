//! Datafeed oracle driver
//!
//! The fund values its assets against an on-chain datafeed. During a test
//! run the harness plays the oracle operator: it fetches MLN spot prices
//! from an HTTP price API, converts them to inverse rates in asset base
//! units, and publishes them through the `DataFeed` contract.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use eyre::Result;
use serde::Deserialize;
use tracing::debug;

use crate::config::{DeployedAddresses, TokenRegistry};
use crate::error::HarnessError;
use crate::models::TxOptions;
use crate::protocol::DataFeed;

/// The oracle enforces a minimum interval between updates; wait it out
const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// MLN spot prices quoted in the three registered assets
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpotPrices {
    #[serde(rename = "ETH")]
    pub eth: f64,
    #[serde(rename = "EUR")]
    pub eur: f64,
    #[serde(rename = "MLN")]
    pub mln: f64,
}

/// HTTP client for the external spot-price API
pub struct PriceFeedClient {
    http: reqwest::Client,
    api_url: String,
}

impl PriceFeedClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HarnessError::PriceFeed(format!("build client: {}", e)))?;
        Ok(Self {
            http,
            api_url: api_url.to_string(),
        })
    }

    /// Fetch MLN priced in ETH, EUR, and MLN
    pub async fn fetch_mln_rates(&self) -> Result<SpotPrices> {
        let url = format!("{}?fsym=MLN&tsyms=ETH,EUR,MLN&sign=true", self.api_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| HarnessError::PriceFeed(format!("request: {}", e)))?
            .error_for_status()
            .map_err(|e| HarnessError::PriceFeed(format!("status: {}", e)))?;

        let rates: SpotPrices = response
            .json()
            .await
            .map_err(|e| HarnessError::PriceFeed(format!("decode: {}", e)))?;
        debug!(?rates, "fetched spot prices");
        Ok(rates)
    }
}

/// Round to the 15 fractional digits the oracle pipeline carries
fn round_to_oracle_precision(value: f64) -> f64 {
    (value * 1e15).round() / 1e15
}

/// Convert a spot price into the integer inverse rate the oracle expects
///
/// The datafeed stores "how much of the quote asset one unit of the base
/// asset buys", scaled to the quote asset's base units and adjusted for the
/// decimal offset between the two assets.
pub fn inverse_rate(price: f64, quote_decimals: u8, base_decimals: u8) -> Result<U256> {
    if !(price.is_finite() && price > 0.0) {
        return Err(HarnessError::PriceFeed(format!("unusable spot price {}", price)).into());
    }
    let inverse = round_to_oracle_precision(1.0 / price);
    let offset = quote_decimals as i32 - base_decimals as i32;
    let scaled = inverse / 10f64.powi(offset) * 10f64.powi(quote_decimals as i32);
    Ok(U256::from(scaled as u128))
}

/// One asset the oracle quotes
struct OracleAsset {
    address: Address,
    decimals: u8,
}

/// Publishes fresh inverse rates to the on-chain datafeed
pub struct DatafeedUpdater {
    feed: DataFeed,
    prices: PriceFeedClient,
    eth: OracleAsset,
    eur: OracleAsset,
    mln: OracleAsset,
}

impl DatafeedUpdater {
    /// Wire the updater against the deployed feed and token registry
    pub fn new(
        feed: DataFeed,
        prices: PriceFeedClient,
        addresses: &DeployedAddresses,
        registry: &TokenRegistry,
    ) -> Result<Self> {
        Ok(Self {
            feed,
            prices,
            eth: OracleAsset {
                address: addresses.eth_token,
                decimals: registry.decimals("ETH-T")?,
            },
            eur: OracleAsset {
                address: addresses.eur_token,
                decimals: registry.decimals("EUR-T")?,
            },
            mln: OracleAsset {
                address: addresses.mln_token,
                decimals: registry.decimals("MLN-T")?,
            },
        })
    }

    /// Fetch spot prices and publish one oracle update
    pub async fn update(&self, opts: &TxOptions) -> Result<()> {
        let rates = self.prices.fetch_mln_rates().await?;
        let base = self.mln.decimals;

        let prices = [
            inverse_rate(rates.eth, self.eth.decimals, base)?,
            inverse_rate(rates.eur, self.eur.decimals, base)?,
            inverse_rate(rates.mln, self.mln.decimals, base)?,
        ];
        let assets = [self.eth.address, self.eur.address, self.mln.address];

        tokio::time::sleep(SETTLE_DELAY).await;
        self.feed.update(&assets, &prices, opts).await
    }
}
