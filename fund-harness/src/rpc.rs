use std::sync::Arc;
use std::time::Duration;

use alloy::{
    // Import the pre-defined typed Ethereum network
    network::Ethereum,
    primitives::{Address, Bytes, B256},
    providers::{Provider, ProviderBuilder},
    rpc::types::{Filter, Log, TransactionReceipt, TransactionRequest},
};
use eyre::Result;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::HarnessError;

/// How long to wait for a submitted transaction to be mined
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval while waiting for a receipt
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Process-wide shared client, initialized on first use
static SHARED: OnceCell<EthereumClient> = OnceCell::const_new();

/// Ethereum RPC client for blockchain interactions
///
/// This client provides a typed interface for communicating with the dev
/// chain hosting the deployed fund protocol. It uses the Alloy typed
/// providers to ensure type safety in RPC interactions. State-changing
/// transactions are signed node-side (`eth_sendTransaction`), which requires
/// the node to manage unlocked accounts, as dev chains do.
#[derive(Clone)]
pub struct EthereumClient {
    /// Typed provider for Ethereum network
    pub provider: Arc<dyn Provider<Ethereum>>,
}

impl EthereumClient {
    /// Create a new Ethereum client with an HTTP provider
    ///
    /// This constructor establishes a connection to an Ethereum node and
    /// verifies the connection is working by fetching the latest block
    /// number.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .network::<Ethereum>()
            .on_http(rpc_url.parse()?);

        // Test the connection by fetching the latest block number
        let block_number = provider.get_block_number().await?;
        info!("Connected to {rpc_url}, latest block number: {block_number}");

        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    /// Process-wide shared client
    ///
    /// The first caller connects using the endpoint from [`Settings`]; every
    /// later caller gets the same handle.
    pub async fn shared() -> Result<&'static EthereumClient> {
        SHARED
            .get_or_try_init(|| async {
                let settings = Settings::load()?;
                Self::connect(&settings.rpc_url).await
            })
            .await
    }

    /// Current block number
    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Accounts managed by the node (dev chains keep them unlocked)
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.provider.get_accounts().await?)
    }

    /// Deployed bytecode at an address
    pub async fn code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }

    /// Force the node to mine one block
    ///
    /// Uses the `evm_mine` method that test chains expose; real networks
    /// reject it.
    pub async fn mine_block(&self) -> Result<()> {
        let _: serde_json::Value = self
            .provider
            .client()
            .request("evm_mine", ())
            .await
            .map_err(|e| HarnessError::Rpc(format!("evm_mine: {}", e)))?;
        debug!("mined one block");
        Ok(())
    }

    /// Execute a read-only call (`eth_call`) against the latest block
    pub async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        let result: Bytes = self
            .provider
            .client()
            .request("eth_call", (tx.clone(), "latest"))
            .await
            .map_err(|e| HarnessError::Rpc(format!("eth_call: {}", e)))?;
        Ok(result)
    }

    /// Submit a node-signed transaction and wait until it is mined
    ///
    /// Returns the receipt of the mined transaction. A receipt with a failed
    /// status is reported as an error, since a reverted protocol call always
    /// invalidates the scenario being driven.
    pub async fn send(&self, tx: &TransactionRequest) -> Result<TransactionReceipt> {
        let hash: B256 = self
            .provider
            .client()
            .request("eth_sendTransaction", (tx.clone(),))
            .await
            .map_err(|e| HarnessError::Rpc(format!("eth_sendTransaction: {}", e)))?;
        debug!("submitted transaction {hash}");

        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.status() {
            return Err(HarnessError::Rpc(format!("transaction {hash} reverted")).into());
        }
        Ok(receipt)
    }

    /// Poll for a transaction receipt until mined or the deadline passes
    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt> {
        let deadline = tokio::time::Instant::now() + RECEIPT_TIMEOUT;
        loop {
            if let Some(receipt) = self.provider.get_transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(HarnessError::Timeout(format!("receipt of {hash}")).into());
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    /// Fetch logs matching a filter (`eth_getLogs`)
    pub async fn logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        let logs: Vec<Log> = self
            .provider
            .client()
            .request("eth_getLogs", (filter.clone(),))
            .await
            .map_err(|e| HarnessError::Rpc(format!("eth_getLogs: {}", e)))?;
        Ok(logs)
    }
}
