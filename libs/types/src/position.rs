//! Position records
//!
//! The two representations build positions from abstractions that cannot
//! be reconciled at this layer, so both producers leave the collection
//! empty. The record type is kept so the domain still appears in every
//! report.

use serde::{Deserialize, Serialize};

/// A party's open position on one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub party: String,
    pub market: String,
    pub open_volume: i64,
    pub realised_pnl: String,
}

impl Position {
    /// Composite identity used for canonical sorting and pairing.
    pub fn key(&self) -> (&str, &str) {
        (&self.party, &self.market)
    }
}
