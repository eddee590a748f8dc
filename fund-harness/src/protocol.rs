//! Typed facades over the deployed protocol contracts
//!
//! One thin wrapper per contract, exposing exactly the surface the share
//! lifecycle uses. All of them delegate to [`ContractHandle`] for encoding
//! and transport.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::Log;
use alloy_dyn_abi::DynSolValue;
use eyre::Result;

use crate::abi::AbiRegistry;
use crate::contract::ContractHandle;
use crate::error::HarnessError;
use crate::models::{AccountBalances, BalanceSheet, FundCalculations, TxOptions};
use crate::rpc::EthereumClient;

fn uint(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

fn addr(value: Address) -> DynSolValue {
    DynSolValue::Address(value)
}

/// Extract the single uint a view method returns
fn single_uint(values: &[DynSolValue], contract: &str, function: &str) -> Result<U256> {
    values
        .first()
        .and_then(|value| value.as_uint())
        .map(|(value, _)| value)
        .ok_or_else(|| HarnessError::contract(contract, function, "expected a uint return").into())
}

/// Extract the single address a view method returns
fn single_address(values: &[DynSolValue], contract: &str, function: &str) -> Result<Address> {
    values
        .first()
        .and_then(|value| value.as_address())
        .ok_or_else(|| HarnessError::contract(contract, function, "expected an address return").into())
}

/// The protocol's version registry; tracks and sets up funds
pub struct Version {
    handle: ContractHandle,
}

impl Version {
    pub fn bind(client: EthereumClient, address: Address, registry: &AbiRegistry) -> Result<Self> {
        let abi = registry.get("Version")?.clone();
        Ok(Self {
            handle: ContractHandle::new(client, "Version", address, abi),
        })
    }

    /// Create a new fund managed by `opts.from`
    #[allow(clippy::too_many_arguments)]
    pub async fn setup_fund(
        &self,
        name: &str,
        reference_asset: Address,
        management_reward: U256,
        performance_reward: U256,
        participation: Address,
        risk_mgmt: Address,
        sphere: Address,
        opts: &TxOptions,
    ) -> Result<()> {
        self.handle
            .send(
                "setupFund",
                &[
                    DynSolValue::String(name.to_string()),
                    addr(reference_asset),
                    uint(management_reward),
                    uint(performance_reward),
                    addr(participation),
                    addr(risk_mgmt),
                    addr(sphere),
                ],
                opts,
            )
            .await?;
        Ok(())
    }

    /// Id of the most recently created fund
    pub async fn last_fund_id(&self) -> Result<U256> {
        let values = self.handle.call("getLastFundId", &[]).await?;
        single_uint(&values, "Version", "getLastFundId")
    }

    /// Address of a fund by id
    pub async fn fund_by_id(&self, id: U256) -> Result<Address> {
        let values = self.handle.call("getFundById", &[uint(id)]).await?;
        single_address(&values, "Version", "getFundById")
    }
}

/// A deployed fund: share issuance, redemption, and accounting views
pub struct Fund {
    handle: ContractHandle,
}

impl Fund {
    pub fn bind(client: EthereumClient, address: Address, registry: &AbiRegistry) -> Result<Self> {
        let abi = registry.get("Fund")?.clone();
        Ok(Self {
            handle: ContractHandle::new(client, "Fund", address, abi),
        })
    }

    pub fn address(&self) -> Address {
        self.handle.address()
    }

    /// Escrow a subscription request for later execution
    pub async fn request_subscription(
        &self,
        offered_value: U256,
        wanted_shares: U256,
        incentive: U256,
        opts: &TxOptions,
    ) -> Result<()> {
        self.handle
            .send(
                "requestSubscription",
                &[uint(offered_value), uint(wanted_shares), uint(incentive)],
                opts,
            )
            .await?;
        Ok(())
    }

    /// Escrow a redemption request for later execution
    pub async fn request_redemption(
        &self,
        wanted_shares: U256,
        wanted_value: U256,
        incentive: U256,
        opts: &TxOptions,
    ) -> Result<()> {
        self.handle
            .send(
                "requestRedemption",
                &[uint(wanted_shares), uint(wanted_value), uint(incentive)],
                opts,
            )
            .await?;
        Ok(())
    }

    /// Execute an escrowed request; callable by any worker
    pub async fn execute_request(&self, id: U256, opts: &TxOptions) -> Result<()> {
        self.handle.send("executeRequest", &[uint(id)], opts).await?;
        Ok(())
    }

    /// Id of the most recently escrowed request
    pub async fn last_request_id(&self) -> Result<U256> {
        let values = self.handle.call("getLastRequestId", &[]).await?;
        single_uint(&values, "Fund", "getLastRequestId")
    }

    /// Run the fund's accounting and return the full calculation tuple
    pub async fn perform_calculations(&self) -> Result<FundCalculations> {
        let values = self.handle.call("performCalculations", &[]).await?;
        FundCalculations::from_values(&values)
    }

    /// Current share price in reference-asset base units
    pub async fn share_price(&self) -> Result<U256> {
        let values = self.handle.call("calcSharePrice", &[]).await?;
        single_uint(&values, "Fund", "calcSharePrice")
    }

    /// Base units of one share
    pub async fn base_units(&self) -> Result<U256> {
        let values = self.handle.call("getBaseUnits", &[]).await?;
        single_uint(&values, "Fund", "getBaseUnits")
    }

    /// Share balance of an account
    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        let values = self.handle.call("balanceOf", &[addr(account)]).await?;
        single_uint(&values, "Fund", "balanceOf")
    }

    /// Total shares in existence
    pub async fn total_supply(&self) -> Result<U256> {
        let values = self.handle.call("totalSupply", &[]).await?;
        single_uint(&values, "Fund", "totalSupply")
    }

    /// `RequestUpdated` logs emitted since `from_block`
    pub async fn request_updates(&self, from_block: u64) -> Result<Vec<Log>> {
        self.handle.events("RequestUpdated", from_block).await
    }
}

/// A premined test token (ERC-20 surface)
pub struct Token {
    handle: ContractHandle,
}

impl Token {
    /// Bind a token proxy; `label` names the token in error messages
    pub fn bind(
        client: EthereumClient,
        label: &str,
        address: Address,
        registry: &AbiRegistry,
    ) -> Result<Self> {
        let abi = registry.get("PreminedAsset")?.clone();
        Ok(Self {
            handle: ContractHandle::new(client, label, address, abi),
        })
    }

    pub fn address(&self) -> Address {
        self.handle.address()
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        let values = self.handle.call("balanceOf", &[addr(account)]).await?;
        single_uint(&values, self.handle.name(), "balanceOf")
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        let values = self
            .handle
            .call("allowance", &[addr(owner), addr(spender)])
            .await?;
        single_uint(&values, self.handle.name(), "allowance")
    }

    pub async fn approve(&self, spender: Address, value: U256, opts: &TxOptions) -> Result<()> {
        self.handle
            .send("approve", &[addr(spender), uint(value)], opts)
            .await?;
        Ok(())
    }

    pub async fn transfer(&self, to: Address, value: U256, opts: &TxOptions) -> Result<()> {
        self.handle
            .send("transfer", &[addr(to), uint(value)], opts)
            .await?;
        Ok(())
    }
}

/// Investor whitelist of the protocol
pub struct Participation {
    handle: ContractHandle,
}

impl Participation {
    pub fn bind(client: EthereumClient, address: Address, registry: &AbiRegistry) -> Result<Self> {
        let abi = registry.get("Participation")?.clone();
        Ok(Self {
            handle: ContractHandle::new(client, "Participation", address, abi),
        })
    }

    /// Whitelist an investor
    pub async fn attest_for_identity(&self, who: Address, opts: &TxOptions) -> Result<()> {
        self.handle
            .send("attestForIdentity", &[addr(who)], opts)
            .await?;
        Ok(())
    }
}

/// The price oracle the fund values assets against
pub struct DataFeed {
    handle: ContractHandle,
}

impl DataFeed {
    pub fn bind(client: EthereumClient, address: Address, registry: &AbiRegistry) -> Result<Self> {
        let abi = registry.get("DataFeed")?.clone();
        Ok(Self {
            handle: ContractHandle::new(client, "DataFeed", address, abi),
        })
    }

    /// Publish a new price vector for the given assets
    pub async fn update(&self, assets: &[Address], prices: &[U256], opts: &TxOptions) -> Result<()> {
        let assets = DynSolValue::Array(assets.iter().copied().map(addr).collect());
        let prices = DynSolValue::Array(prices.iter().copied().map(uint).collect());
        self.handle.send("update", &[assets, prices], opts).await?;
        Ok(())
    }
}

/// Snapshot the tracked token balances of investor, manager, and fund
pub async fn snapshot_balances(
    mln_token: &Token,
    eth_token: &Token,
    investor: Address,
    manager: Address,
    fund: Address,
) -> Result<BalanceSheet> {
    let balances_of = |account: Address| async move {
        Ok::<AccountBalances, eyre::Report>(AccountBalances {
            mln: mln_token.balance_of(account).await?,
            eth: eth_token.balance_of(account).await?,
        })
    };

    Ok(BalanceSheet {
        investor: balances_of(investor).await?,
        manager: balances_of(manager).await?,
        fund: balances_of(fund).await?,
    })
}
