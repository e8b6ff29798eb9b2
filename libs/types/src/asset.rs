//! Asset records

use serde::{Deserialize, Serialize};

/// Asset listing status. Rejected assets exist only in the read-model
/// view and are filtered out during collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Proposed,
    Rejected,
    PendingListing,
    Enabled,
}

/// An asset as both representations can express it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub quantum: String,
    pub status: AssetStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_roundtrip() {
        let a = Asset {
            id: "asset-1".into(),
            name: "Tether".into(),
            symbol: "USDT".into(),
            decimals: 18,
            quantum: "1000000".into(),
            status: AssetStatus::Enabled,
        };
        let json = serde_json::to_string(&a).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}
