//! Market records

use serde::{Deserialize, Serialize};

/// Market lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketStatus {
    Proposed,
    Pending,
    Active,
    Suspended,
    Closed,
    Settled,
}

/// A market as both representations can express it.
///
/// `decimal_places` is the market price precision; joined with the
/// settlement asset's precision it determines the order price rescale
/// factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub id: String,
    pub code: String,
    pub settlement_asset: String,
    pub decimal_places: u32,
    pub status: MarketStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_roundtrip() {
        let m = Market {
            id: "mkt-1".into(),
            code: "BTC/DEC26".into(),
            settlement_asset: "asset-1".into(),
            decimal_places: 5,
            status: MarketStatus::Active,
        };
        let json = serde_json::to_string(&m).unwrap();
        let back: Market = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
