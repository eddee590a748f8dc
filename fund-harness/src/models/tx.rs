use alloy::primitives::Address;

use crate::config::Settings;

/// Options for a node-signed transaction
///
/// Mirrors the `{from, gas, gasPrice}` object the protocol's deployment
/// tooling passes on every send. The sender must be an unlocked account on
/// the dev node.
#[derive(Debug, Clone, Copy)]
pub struct TxOptions {
    /// Sender account
    pub from: Address,

    /// Gas limit
    pub gas: u64,

    /// Gas price in wei; `None` lets the node choose
    pub gas_price: Option<u128>,
}

impl TxOptions {
    /// Options for a sender, using the configured gas defaults
    pub fn new(from: Address, settings: &Settings) -> Self {
        Self {
            from,
            gas: settings.gas,
            gas_price: Some(settings.gas_price as u128),
        }
    }

    /// Same options with a different gas limit
    pub fn with_gas(self, gas: u64) -> Self {
        Self { gas, ..self }
    }
}
