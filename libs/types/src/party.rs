//! Party identities
//!
//! The snapshot never stores parties directly; they are derived from the
//! owners appearing in other collections, with the `"*"` sentinel mapped
//! to the reserved network party.

use serde::{Deserialize, Serialize};

/// The reserved identity standing in for the network itself.
pub const NETWORK_PARTY: &str = "network";

/// A party known to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
}

impl Party {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
