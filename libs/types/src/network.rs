//! Network parameters and limits

use serde::{Deserialize, Serialize};

/// A single network parameter key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParameter {
    pub key: String,
    pub value: String,
}

/// Network-wide proposal limits. Singleton within a dataset.
///
/// The `*_enabled_from` fields are Unix nanosecond timestamps truncated
/// to microsecond resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLimits {
    pub can_propose_market: bool,
    pub can_propose_asset: bool,
    pub propose_market_enabled: bool,
    pub propose_asset_enabled: bool,
    pub propose_market_enabled_from: i64,
    pub propose_asset_enabled_from: i64,
}
