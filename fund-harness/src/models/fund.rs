use alloy::primitives::U256;
use alloy_dyn_abi::DynSolValue;
use eyre::Result;

use crate::error::HarnessError;

/// Result of the fund's `performCalculations` view
///
/// The contract returns a six-tuple of uint256 values describing the fund's
/// accounting state at the current price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundCalculations {
    /// Gross asset value
    pub gav: U256,
    /// Accrued management reward
    pub management_reward: U256,
    /// Accrued performance reward
    pub performance_reward: U256,
    /// Rewards accrued but not yet claimed by the manager
    pub unclaimed_rewards: U256,
    /// Net asset value
    pub nav: U256,
    /// Price of one share in reference-asset base units
    pub share_price: U256,
}

impl FundCalculations {
    /// Decode from the raw six-tuple returned by the contract
    pub fn from_values(values: &[DynSolValue]) -> Result<Self> {
        if values.len() != 6 {
            return Err(HarnessError::Contract {
                contract: "Fund".to_string(),
                function: "performCalculations".to_string(),
                reason: format!("expected 6 return values, got {}", values.len()),
            }
            .into());
        }
        Ok(Self {
            gav: uint_at(values, 0)?,
            management_reward: uint_at(values, 1)?,
            performance_reward: uint_at(values, 2)?,
            unclaimed_rewards: uint_at(values, 3)?,
            nav: uint_at(values, 4)?,
            share_price: uint_at(values, 5)?,
        })
    }
}

fn uint_at(values: &[DynSolValue], index: usize) -> Result<U256> {
    values
        .get(index)
        .and_then(|value| value.as_uint())
        .map(|(value, _)| value)
        .ok_or_else(|| {
            HarnessError::Contract {
                contract: "Fund".to_string(),
                function: "performCalculations".to_string(),
                reason: format!("return value {} is not a uint", index),
            }
            .into()
        })
}

/// Token balances of one tracked party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountBalances {
    /// Reference asset (MLN) balance
    pub mln: U256,
    /// ETH token balance
    pub eth: U256,
}

/// Balances of the three parties the lifecycle suite tracks
///
/// Captured before and after every protocol interaction so the tests can
/// assert exactly which balances moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceSheet {
    pub investor: AccountBalances,
    pub manager: AccountBalances,
    pub fund: AccountBalances,
}

impl BalanceSheet {
    /// True when no tracked balance differs from `other`
    pub fn matches(&self, other: &BalanceSheet) -> bool {
        self == other
    }
}

/// One row of the subscription round table
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionRound {
    /// Shares the investor asks for
    pub wanted_shares: u64,
    /// Reference-asset amount offered in exchange
    pub offered_value: u64,
    /// Incentive paid to whichever worker executes the request
    pub incentive: u64,
}

/// One row of the redemption round table
#[derive(Debug, Clone, Copy)]
pub struct RedemptionRound {
    /// Shares the investor redeems
    pub wanted_shares: u64,
    /// Reference-asset amount asked for the shares
    pub wanted_value: u64,
    /// Incentive paid to whichever worker executes the request
    pub incentive: u64,
}
