//! Liquidity provision records

use serde::{Deserialize, Serialize};

/// Liquidity provision lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidityStatus {
    Active,
    Stopped,
    Cancelled,
    Rejected,
    Undeployed,
    Pending,
}

impl LiquidityStatus {
    /// Whether a provision in this status is still live on the snapshot side.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            LiquidityStatus::Active | LiquidityStatus::Undeployed | LiquidityStatus::Pending
        )
    }
}

/// A liquidity commitment on one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityProvision {
    pub id: String,
    pub party: String,
    pub market: String,
    pub commitment_amount: String,
    pub fee: String,
    pub status: LiquidityStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub version: u64,
}
