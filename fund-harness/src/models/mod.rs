//! Data models used throughout the harness
//!
//! This module contains the value types exchanged with the deployed
//! protocol: transaction options, fund accounting snapshots, and the round
//! tables driven by the lifecycle suite.

// Fund accounting and balance snapshot types
pub mod fund;
// Transaction submission options
pub mod tx;

pub use fund::{AccountBalances, BalanceSheet, FundCalculations, RedemptionRound, SubscriptionRound};
pub use tx::TxOptions;
