use alloy::primitives::{Address, U256};
use eyre::Result;

use fund_harness::{
    abi::AbiRegistry,
    config::{AddressBook, DeployedAddresses, Settings, TokenRegistry},
    models::{BalanceSheet, TxOptions},
    pricefeed::{DatafeedUpdater, PriceFeedClient},
    protocol::{self, DataFeed, Fund, Participation, Token, Version},
    rpc::EthereumClient,
};

/// Tokens the liquidity provider seeds the investor with
pub const INITIAL_TOKEN_AMOUNT: u64 = 10_000_000_000;

pub fn u(value: u64) -> U256 {
    U256::from(value)
}

/// Everything a lifecycle test needs: the shared client, the bound protocol
/// contracts, and the four actor accounts of the scenario.
pub struct TestEnv {
    pub settings: Settings,
    pub client: EthereumClient,
    pub registry: AbiRegistry,
    pub addresses: DeployedAddresses,

    /// Liquidity provider and datafeed operator
    pub deployer: Address,
    /// Creates and manages the fund
    pub manager: Address,
    /// Subscribes to and redeems fund shares
    pub investor: Address,
    /// Executes escrowed requests for the incentive
    pub worker: Address,

    pub version: Version,
    pub participation: Participation,
    pub mln_token: Token,
    pub eth_token: Token,

    updater: DatafeedUpdater,
}

impl TestEnv {
    /// Connect, load the deployment artifacts, and bind every contract
    pub async fn bootstrap() -> Result<Self> {
        let settings = Settings::load()?;
        let client = EthereumClient::shared().await?.clone();

        let registry = AbiRegistry::load_dir(&settings.abi_dir)?;
        let book = AddressBook::load(&settings.address_book)?;
        let addresses = book.environment(&settings.environment)?.clone();
        let tokens = TokenRegistry::load(&settings.token_info)?;

        let accounts = client.accounts().await?;
        eyre::ensure!(
            accounts.len() >= 4,
            "dev chain must manage deployer, manager, investor and worker accounts"
        );

        let version = Version::bind(client.clone(), addresses.version, &registry)?;
        let participation = Participation::bind(client.clone(), addresses.participation, &registry)?;
        let mln_token = Token::bind(client.clone(), "MlnToken", addresses.mln_token, &registry)?;
        let eth_token = Token::bind(client.clone(), "EthToken", addresses.eth_token, &registry)?;

        let feed = DataFeed::bind(client.clone(), addresses.datafeed, &registry)?;
        let prices = PriceFeedClient::new(&settings.price_api_url)?;
        let updater = DatafeedUpdater::new(feed, prices, &addresses, &tokens)?;

        Ok(Self {
            settings,
            deployer: accounts[0],
            manager: accounts[1],
            investor: accounts[2],
            worker: accounts[3],
            client,
            registry,
            addresses,
            version,
            participation,
            mln_token,
            eth_token,
            updater,
        })
    }

    /// Transaction options for a sender, with the configured gas defaults
    pub fn opts(&self, from: Address) -> TxOptions {
        TxOptions::new(from, &self.settings)
    }

    /// Bind the most recently created fund
    pub async fn bind_fund(&self) -> Result<Fund> {
        let id = self.version.last_fund_id().await?;
        let address = self.version.fund_by_id(id).await?;
        Fund::bind(self.client.clone(), address, &self.registry)
    }

    /// Balances of investor, manager, and the fund, in both tracked tokens
    pub async fn snapshot(&self, fund: &Fund) -> Result<BalanceSheet> {
        protocol::snapshot_balances(
            &self.mln_token,
            &self.eth_token,
            self.investor,
            self.manager,
            fund.address(),
        )
        .await
    }

    /// Publish one datafeed update, operated by the deployer
    pub async fn update_datafeed(&self) -> Result<()> {
        self.updater.update(&self.opts(self.deployer)).await
    }

    /// Two update+mine cycles, so the feed history is fresh enough for the
    /// fund to accept request execution
    pub async fn refresh_datafeed(&self) -> Result<()> {
        for _ in 0..2 {
            self.update_datafeed().await?;
            self.client.mine_block().await?;
        }
        Ok(())
    }
}
