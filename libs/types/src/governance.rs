//! Governance proposal records

use serde::{Deserialize, Serialize};

/// Proposal lifecycle state.
///
/// Declined, rejected and failed proposals exist only in the read-model
/// view and are filtered out during collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalState {
    Open,
    Passed,
    Enacted,
    Declined,
    Rejected,
    Failed,
    WaitingForNodeVote,
}

impl ProposalState {
    /// States the snapshot never retains.
    pub fn is_discarded(&self) -> bool {
        matches!(
            self,
            ProposalState::Declined | ProposalState::Rejected | ProposalState::Failed
        )
    }
}

/// A governance proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub party: String,
    pub reference: String,
    pub state: ProposalState,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discarded_states() {
        assert!(ProposalState::Declined.is_discarded());
        assert!(ProposalState::Rejected.is_discarded());
        assert!(ProposalState::Failed.is_discarded());
        assert!(!ProposalState::Open.is_discarded());
        assert!(!ProposalState::Enacted.is_discarded());
    }
}
