//! Self-describing payload envelopes
//!
//! Every value stored in the versioned store is an envelope carrying a
//! discriminator tag and a bincode-encoded body. The tag selects one of a
//! fixed closed set of payload kinds; unknown tags decode to
//! [`Payload::Ignored`] and are skipped, never fatal. A corrupt body for a
//! known tag is fatal for the traversal: a store that cannot be decoded
//! cannot be partially trusted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use types::prelude::*;

/// Payload discriminator tags.
pub mod kind {
    pub const APP_STATE: u16 = 1;
    pub const COLLATERAL_ACCOUNTS: u16 = 2;
    pub const MATCHING_BOOK: u16 = 3;
    pub const EXECUTION_MARKETS: u16 = 4;
    pub const ACTIVE_ASSETS: u16 = 5;
    pub const PENDING_ASSETS: u16 = 6;
    pub const NETWORK_LIMITS: u16 = 7;
    pub const ACTIVE_DELEGATIONS: u16 = 8;
    pub const EPOCH: u16 = 9;
    pub const GOVERNANCE_ACTIVE: u16 = 10;
    pub const GOVERNANCE_ENACTED: u16 = 11;
    pub const GOVERNANCE_NODE: u16 = 12;
    pub const BANKING_WITHDRAWALS: u16 = 13;
    pub const BANKING_DEPOSITS: u16 = 14;
    pub const SCHEDULED_TRANSFERS: u16 = 15;
    pub const RECURRING_TRANSFERS: u16 = 16;
    pub const STAKING_ACCOUNTS: u16 = 17;
    pub const LIQUIDITY_PROVISIONS: u16 = 18;
    pub const TOPOLOGY: u16 = 19;
    pub const NETWORK_PARAMETERS: u16 = 20;
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed envelope: {0}")]
    Envelope(String),

    #[error("malformed {kind} payload: {detail}")]
    Payload { kind: &'static str, detail: String },

    #[error("payload encoding failed: {0}")]
    Encode(String),
}

// ── Envelope ────────────────────────────────────────────────────────

/// A self-describing serialized unit: discriminator tag plus opaque body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: u16,
    pub body: Vec<u8>,
}

impl Envelope {
    /// Wrap a payload value under the given discriminator tag.
    pub fn encode<T: Serialize>(kind: u16, payload: &T) -> Result<Self, DecodeError> {
        let body = bincode::serialize(payload).map_err(|e| DecodeError::Encode(e.to_string()))?;
        Ok(Self { kind, body })
    }

    /// Serialize the envelope itself for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DecodeError> {
        bincode::serialize(self).map_err(|e| DecodeError::Encode(e.to_string()))
    }

    /// Deserialize an envelope from its stored form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        bincode::deserialize(bytes).map_err(|e| DecodeError::Envelope(e.to_string()))
    }
}

// ── Payload bodies ──────────────────────────────────────────────────

/// Application-level chain state: the block height this version was
/// committed at, and the block time in Unix nanoseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatePayload {
    pub height: u64,
    pub block_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralAccountsPayload {
    pub accounts: Vec<Account>,
}

/// One market's resting book. Order prices are market-precision here;
/// extraction rescales them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingBookPayload {
    pub market_id: String,
    pub buy: Vec<Order>,
    pub sell: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionMarketsPayload {
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAssetsPayload {
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAssetsPayload {
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLimitsPayload {
    pub limits: NetworkLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDelegationsPayload {
    pub delegations: Vec<Delegation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochPayload {
    pub epoch: Epoch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceActivePayload {
    pub proposals: Vec<Proposal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceEnactedPayload {
    pub proposals: Vec<Proposal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceNodePayload {
    pub proposals: Vec<Proposal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankingWithdrawalsPayload {
    pub withdrawals: Vec<Withdrawal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankingDepositsPayload {
    pub deposits: Vec<Deposit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTransfersPayload {
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTransfersPayload {
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingAccountsPayload {
    pub stake_links: Vec<StakeLink>,
}

/// One market's liquidity commitments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityProvisionsPayload {
    pub market_id: String,
    pub provisions: Vec<LiquidityProvision>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyPayload {
    pub nodes: Vec<ValidatorNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParametersPayload {
    pub parameters: Vec<NetworkParameter>,
}

// ── Decoded payload ─────────────────────────────────────────────────

/// Closed sum over the known payload kinds, one constructor each.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    AppState(AppStatePayload),
    CollateralAccounts(CollateralAccountsPayload),
    MatchingBook(MatchingBookPayload),
    ExecutionMarkets(ExecutionMarketsPayload),
    ActiveAssets(ActiveAssetsPayload),
    PendingAssets(PendingAssetsPayload),
    NetworkLimits(NetworkLimitsPayload),
    ActiveDelegations(ActiveDelegationsPayload),
    Epoch(EpochPayload),
    GovernanceActive(GovernanceActivePayload),
    GovernanceEnacted(GovernanceEnactedPayload),
    GovernanceNode(GovernanceNodePayload),
    BankingWithdrawals(BankingWithdrawalsPayload),
    BankingDeposits(BankingDepositsPayload),
    ScheduledTransfers(ScheduledTransfersPayload),
    RecurringTransfers(RecurringTransfersPayload),
    StakingAccounts(StakingAccountsPayload),
    LiquidityProvisions(LiquidityProvisionsPayload),
    Topology(TopologyPayload),
    NetworkParameters(NetworkParametersPayload),
    /// Unknown discriminator: skipped by consumers, never an error.
    Ignored(u16),
}

fn body<T: DeserializeOwned>(name: &'static str, bytes: &[u8]) -> Result<T, DecodeError> {
    bincode::deserialize(bytes).map_err(|e| DecodeError::Payload {
        kind: name,
        detail: e.to_string(),
    })
}

/// Decode an envelope body according to its discriminator tag.
pub fn decode(envelope: &Envelope) -> Result<Payload, DecodeError> {
    let payload = match envelope.kind {
        kind::APP_STATE => Payload::AppState(body("app state", &envelope.body)?),
        kind::COLLATERAL_ACCOUNTS => {
            Payload::CollateralAccounts(body("collateral accounts", &envelope.body)?)
        }
        kind::MATCHING_BOOK => Payload::MatchingBook(body("matching book", &envelope.body)?),
        kind::EXECUTION_MARKETS => {
            Payload::ExecutionMarkets(body("execution markets", &envelope.body)?)
        }
        kind::ACTIVE_ASSETS => Payload::ActiveAssets(body("active assets", &envelope.body)?),
        kind::PENDING_ASSETS => Payload::PendingAssets(body("pending assets", &envelope.body)?),
        kind::NETWORK_LIMITS => Payload::NetworkLimits(body("network limits", &envelope.body)?),
        kind::ACTIVE_DELEGATIONS => {
            Payload::ActiveDelegations(body("active delegations", &envelope.body)?)
        }
        kind::EPOCH => Payload::Epoch(body("epoch", &envelope.body)?),
        kind::GOVERNANCE_ACTIVE => {
            Payload::GovernanceActive(body("governance active", &envelope.body)?)
        }
        kind::GOVERNANCE_ENACTED => {
            Payload::GovernanceEnacted(body("governance enacted", &envelope.body)?)
        }
        kind::GOVERNANCE_NODE => Payload::GovernanceNode(body("governance node", &envelope.body)?),
        kind::BANKING_WITHDRAWALS => {
            Payload::BankingWithdrawals(body("banking withdrawals", &envelope.body)?)
        }
        kind::BANKING_DEPOSITS => {
            Payload::BankingDeposits(body("banking deposits", &envelope.body)?)
        }
        kind::SCHEDULED_TRANSFERS => {
            Payload::ScheduledTransfers(body("scheduled transfers", &envelope.body)?)
        }
        kind::RECURRING_TRANSFERS => {
            Payload::RecurringTransfers(body("recurring transfers", &envelope.body)?)
        }
        kind::STAKING_ACCOUNTS => {
            Payload::StakingAccounts(body("staking accounts", &envelope.body)?)
        }
        kind::LIQUIDITY_PROVISIONS => {
            Payload::LiquidityProvisions(body("liquidity provisions", &envelope.body)?)
        }
        kind::TOPOLOGY => Payload::Topology(body("topology", &envelope.body)?),
        kind::NETWORK_PARAMETERS => {
            Payload::NetworkParameters(body("network parameters", &envelope.body)?)
        }
        other => Payload::Ignored(other),
    };
    Ok(payload)
}

// ── Tests ───────────────────────────────────────────────────────────
