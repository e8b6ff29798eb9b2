//! Resting order records
//!
//! Orders recovered from the matching book carry market-precision prices;
//! extraction rescales them to the asset-precision integer strings the
//! read-model serves, so both sides compare on the same representation.

use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order status.
///
/// Parked orders exist only in the read-model view (the matching book does
/// not hold them) and are filtered out during collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Active,
    Expired,
    Cancelled,
    Stopped,
    Filled,
    Rejected,
    PartiallyFilled,
    Parked,
}

/// A resting order as both representations can express it.
///
/// `price` is an asset-precision integer string. Timestamps are Unix
/// nanoseconds truncated to microsecond resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub market: String,
    pub party: String,
    pub side: Side,
    pub price: String,
    pub size: u64,
    pub remaining: u64,
    pub status: OrderStatus,
    pub reference: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub version: u64,
}
