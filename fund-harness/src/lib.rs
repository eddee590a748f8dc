// Export modules for the status binary and the integration suite
pub mod abi;
pub mod config;
pub mod contract;
pub mod error;
pub mod models;
pub mod pricefeed;
pub mod protocol;
pub mod rpc;
