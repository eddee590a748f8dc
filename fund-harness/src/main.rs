use eyre::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fund_harness::{config, rpc};

/// Deployment status check
///
/// This is the main function that:
/// 1. Sets up logging
/// 2. Loads configuration and the deployment address book
/// 3. Establishes connection to the Ethereum node
/// 4. Verifies that every protocol contract has code at its address
#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging with appropriate log levels for different components
    // - Info level for the harness
    // - Lower levels for dependencies to reduce noise
    let filter = EnvFilter::from_default_env()
        .add_directive("fund_harness=info".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    // Initialize the tracing subscriber with our filter
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration and deployment artifacts
    let settings = config::Settings::load()?;
    let book = config::AddressBook::load(&settings.address_book)?;
    let addresses = book.environment(&settings.environment)?;

    // Connect and report chain state
    let client = rpc::EthereumClient::connect(&settings.rpc_url).await?;
    let block = client.block_number().await?;
    let accounts = client.accounts().await?;
    info!(
        "chain head at block {}, node manages {} accounts",
        block,
        accounts.len()
    );
    if accounts.len() < 4 {
        warn!("lifecycle tests need at least 4 unlocked accounts (deployer, manager, investor, worker)");
    }

    // Verify each deployed contract is actually present
    let mut missing = 0usize;
    for (name, address) in addresses.entries() {
        let code = client.code_at(address).await?;
        if code.is_empty() {
            error!("{name} at {address}: no code");
            missing += 1;
        } else {
            info!("{name} at {address}: {} bytes of code", code.len());
        }
    }

    if missing > 0 {
        return Err(eyre::eyre!(
            "{missing} contract(s) missing from environment '{}'",
            settings.environment
        ));
    }

    info!("deployment '{}' looks healthy", settings.environment);
    Ok(())
}
