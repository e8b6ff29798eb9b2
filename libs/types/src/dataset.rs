//! The per-domain collection bundle both producers populate.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::asset::Asset;
use crate::banking::{Deposit, Transfer, Withdrawal};
use crate::governance::Proposal;
use crate::liquidity::LiquidityProvision;
use crate::market::Market;
use crate::network::{NetworkLimits, NetworkParameter};
use crate::order::Order;
use crate::party::Party;
use crate::position::Position;
use crate::staking::{Delegation, Epoch, StakeLink, ValidatorNode};

/// One side of the comparison: every domain collection, built once by a
/// producer and treated as immutable afterward.
///
/// Collections are plain vectors in arrival order; the comparator sorts
/// both sides canonically before pairing, so producer ordering never
/// affects the outcome. `network_limits` and `epoch` are singletons;
/// `current_time` is a Unix nanosecond scalar truncated to microsecond
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub accounts: Vec<Account>,
    pub orders: Vec<Order>,
    pub markets: Vec<Market>,
    pub parties: Vec<Party>,
    pub network_limits: Option<NetworkLimits>,
    pub assets: Vec<Asset>,
    pub current_time: i64,
    pub delegations: Vec<Delegation>,
    pub epoch: Option<Epoch>,
    pub nodes: Vec<ValidatorNode>,
    pub network_parameters: Vec<NetworkParameter>,
    pub proposals: Vec<Proposal>,
    pub deposits: Vec<Deposit>,
    pub withdrawals: Vec<Withdrawal>,
    pub transfers: Vec<Transfer>,
    pub positions: Vec<Position>,
    pub liquidity_provisions: Vec<LiquidityProvision>,
    pub stake_links: Vec<StakeLink>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::empty();
        assert!(ds.accounts.is_empty());
        assert!(ds.network_limits.is_none());
        assert!(ds.epoch.is_none());
        assert_eq!(ds.current_time, 0);
    }
}
