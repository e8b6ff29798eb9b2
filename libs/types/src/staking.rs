//! Staking records: delegations, epoch, validator nodes, stake links

use serde::{Deserialize, Serialize};

/// A delegation of stake from a party to a validator node for one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub party: String,
    pub node_id: String,
    pub epoch_seq: u64,
    pub amount: String,
}

impl Delegation {
    /// Composite identity used for canonical sorting and pairing.
    pub fn key(&self) -> (u64, &str, &str) {
        (self.epoch_seq, &self.node_id, &self.party)
    }
}

/// The current epoch. Singleton within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub seq: u64,
    pub start_time: i64,
    pub expire_time: i64,
}

/// Validator node status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    Validator,
    NonValidator,
}

/// A validator node registered in the topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorNode {
    pub id: String,
    pub pub_key: String,
    pub ethereum_address: String,
    pub status: NodeStatus,
}

/// Whether a stake link adds or removes stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StakeLinkKind {
    Link,
    Unlink,
}

/// Stake link lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StakeLinkStatus {
    Pending,
    Accepted,
    Rejected,
}

/// A stake linking/unlinking event attributed to a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeLink {
    pub id: String,
    pub party: String,
    pub kind: StakeLinkKind,
    pub amount: String,
    pub timestamp: i64,
    pub status: StakeLinkStatus,
}
