//! Round lifecycle phases
//!
//! A round moves through:
//! `Idle -> AllPending -> Settled -> Evaluating -> (Scored | EvalFailed) -> Idle`
//!
//! Only one round instance exists at a time; submission while not `Idle` is
//! rejected at the session gate.

use serde::{Deserialize, Serialize};

/// Phase of the current (or last) round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No round in flight
    #[default]
    Idle,
    /// Every panel transitioned to pending; requests in flight
    AllPending,
    /// Every panel reached a terminal state; evaluation not yet triggered
    Settled,
    /// Aggregate evaluation request in flight
    Evaluating,
    /// Evaluation returned scores
    Scored,
    /// Evaluation failed; panel answers retained, no scores
    EvalFailed,
}

impl RoundPhase {
    /// Whether a new round may be submitted from this phase
    pub fn accepts_submission(self) -> bool {
        matches!(
            self,
            RoundPhase::Idle | RoundPhase::Scored | RoundPhase::EvalFailed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::AllPending => "all-pending",
            RoundPhase::Settled => "settled",
            RoundPhase::Evaluating => "evaluating",
            RoundPhase::Scored => "scored",
            RoundPhase::EvalFailed => "eval-failed",
        }
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_gate() {
        assert!(RoundPhase::Idle.accepts_submission());
        assert!(RoundPhase::Scored.accepts_submission());
        assert!(RoundPhase::EvalFailed.accepts_submission());
        assert!(!RoundPhase::AllPending.accepts_submission());
        assert!(!RoundPhase::Settled.accepts_submission());
        assert!(!RoundPhase::Evaluating.accepts_submission());
    }
}
