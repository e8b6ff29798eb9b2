//! Collateral account records
//!
//! Accounts have no single id; their identity is the composite key
//! (owner, market, asset, kind). The snapshot side uses sentinel owners
//! and markets which must be translated before records from the two
//! producers can be paired.

use serde::{Deserialize, Serialize};

/// Account kind discriminating the ledger sub-account an amount sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    General,
    Margin,
    Bond,
    Insurance,
    FeeInfrastructure,
    GlobalReward,
}

/// A single collateral account balance.
///
/// `owner` is empty for the network party; `market` is empty for accounts
/// not scoped to a market. Balances are asset-precision integer strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub owner: String,
    pub market: String,
    pub asset: String,
    pub kind: AccountKind,
    pub balance: String,
}

impl Account {
    /// Composite identity used for canonical sorting and pairing.
    pub fn key(&self) -> (&str, &str, &str, AccountKind) {
        (&self.owner, &self.market, &self.asset, self.kind)
    }
}
