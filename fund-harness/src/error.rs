use thiserror::Error;

/// Harness-specific error types
///
/// This enum defines all possible errors that can occur while driving the
/// deployed fund protocol. Each variant represents a specific error case and
/// includes relevant details.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Error loading or validating harness configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Error resolving a deployment address
    #[error("address book error: {0}")]
    AddressBook(String),

    /// Error loading or using a contract ABI
    #[error("ABI error: {0}")]
    Abi(String),

    /// Error talking to the Ethereum RPC node
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A contract call or transaction failed
    #[error("contract {contract}.{function} failed: {reason}")]
    Contract {
        contract: String,
        function: String,
        reason: String,
    },

    /// Error querying the external price API
    #[error("price feed error: {0}")]
    PriceFeed(String),

    /// A transaction was not mined within the allowed window
    #[error("timed out waiting for {0}")]
    Timeout(String),
}

impl HarnessError {
    /// Shorthand for a failed call/send on a named contract method
    pub fn contract(contract: &str, function: &str, reason: impl Into<String>) -> Self {
        Self::Contract {
            contract: contract.to_string(),
            function: function.to_string(),
            reason: reason.into(),
        }
    }
}
