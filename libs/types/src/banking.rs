//! Banking records: deposits, withdrawals, transfers
//!
//! Withdrawals and transfers are append-only on the read-model side: it
//! never deletes them, while the snapshot may have pruned settled entries.
//! The comparator therefore pairs these domains on the id intersection.

use serde::{Deserialize, Serialize};

/// Deposit lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositStatus {
    Open,
    Cancelled,
    Finalized,
}

/// A deposit of an external asset into the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: String,
    pub party: String,
    pub asset: String,
    pub amount: String,
    pub status: DepositStatus,
    pub created_at: i64,
    pub credited_at: i64,
}

/// Withdrawal lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    Open,
    Rejected,
    Finalized,
}

/// A withdrawal of an asset out of the ledger.
///
/// `foreign_tx_hash` carries bridge details only the snapshot knows; the
/// reader clears it so both sides stay comparable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: String,
    pub party: String,
    pub asset: String,
    pub amount: String,
    pub status: WithdrawalStatus,
    pub reference: String,
    pub expiry: i64,
    pub created_at: i64,
    pub withdrawn_at: i64,
    pub foreign_tx_hash: String,
}

/// Transfer lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    Done,
    Rejected,
    Stopped,
    Cancelled,
}

/// A party-to-party transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: String,
    pub from: String,
    pub to: String,
    pub asset: String,
    pub amount: String,
    pub reference: String,
    pub status: TransferStatus,
    pub timestamp: i64,
}
