//! Canonical model shared by both state producers and the comparator.
//!
//! Both the consensus-layer snapshot reader and the read-model collector
//! populate the same [`dataset::Dataset`]; the comparator consumes two of
//! them and emits a [`report::Report`].
//!
//! # Modules
//! - `account`: collateral account records and account kinds
//! - `order`: resting order records
//! - `market`: market records
//! - `asset`: asset records
//! - `party`: party identities
//! - `banking`: deposits, withdrawals, transfers
//! - `staking`: delegations, epoch, validator nodes, stake links
//! - `governance`: proposal records
//! - `network`: network parameters and limits
//! - `liquidity`: liquidity provision records
//! - `position`: position records
//! - `dataset`: the per-domain collection bundle
//! - `report`: per-domain statuses and report rendering

pub mod account;
pub mod asset;
pub mod banking;
pub mod dataset;
pub mod governance;
pub mod liquidity;
pub mod market;
pub mod network;
pub mod order;
pub mod party;
pub mod position;
pub mod report;
pub mod staking;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::account::*;
    pub use crate::asset::*;
    pub use crate::banking::*;
    pub use crate::dataset::*;
    pub use crate::governance::*;
    pub use crate::liquidity::*;
    pub use crate::market::*;
    pub use crate::network::*;
    pub use crate::order::*;
    pub use crate::party::*;
    pub use crate::position::*;
    pub use crate::report::*;
    pub use crate::staking::*;
}
