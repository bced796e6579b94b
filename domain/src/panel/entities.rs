//! Panel entity and its lifecycle state

use crate::panel::value_objects::{ModelId, PanelId, RetrievalStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle state of one panel within a round
///
/// Exactly one variant holds at any time. All response payload lives inside
/// the terminal variants, so transitioning to `Pending` structurally clears
/// the previous answer, error, latency, and context together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LiveState {
    /// No round submitted yet (or state was reset)
    #[default]
    Idle,
    /// Request dispatched, response not yet arrived
    Pending,
    /// Response arrived and parsed
    Succeeded {
        answer: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        latency: Option<Duration>,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<String>,
    },
    /// Request failed (transport error or non-success HTTP)
    Failed { error: String },
}

impl LiveState {
    /// Whether the panel has reached a terminal state for this round
    pub fn is_settled(&self) -> bool {
        matches!(self, LiveState::Succeeded { .. } | LiveState::Failed { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LiveState::Pending)
    }

    /// The text this panel contributes to evaluation: the answer on success,
    /// the error message on failure, so the evaluator always has a string
    pub fn display_text(&self) -> Option<&str> {
        match self {
            LiveState::Idle | LiveState::Pending => None,
            LiveState::Succeeded { answer, .. } => Some(answer),
            LiveState::Failed { error } => Some(error),
        }
    }
}

/// One comparison unit: a retrieval strategy paired with a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: PanelId,
    pub strategy: RetrievalStrategy,
    pub model: ModelId,
    pub state: LiveState,
}

impl Panel {
    /// Create a panel with default configuration
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            strategy: RetrievalStrategy::default(),
            model: ModelId::default(),
            state: LiveState::Idle,
        }
    }

    /// Create a panel with an explicit configuration
    pub fn with_config(id: PanelId, strategy: RetrievalStrategy, model: ModelId) -> Self {
        Self {
            id,
            strategy,
            model,
            state: LiveState::Idle,
        }
    }

    /// Enter the pending state, clearing any previous payload
    pub fn begin_round(&mut self) {
        self.state = LiveState::Pending;
    }

    /// Settle with a successful answer
    pub fn settle_success(
        &mut self,
        answer: impl Into<String>,
        latency: Option<Duration>,
        context: Option<String>,
    ) {
        self.state = LiveState::Succeeded {
            answer: answer.into(),
            latency,
            context,
        };
    }

    /// Settle with a failure message
    pub fn settle_failure(&mut self, error: impl Into<String>) {
        self.state = LiveState::Failed {
            error: error.into(),
        };
    }

    /// Return to idle, dropping any payload
    pub fn reset(&mut self) {
        self.state = LiveState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_panel_is_idle() {
        let panel = Panel::new(PanelId::FIRST);
        assert_eq!(panel.state, LiveState::Idle);
        assert!(!panel.state.is_settled());
    }

    #[test]
    fn test_begin_round_clears_payload() {
        let mut panel = Panel::new(PanelId::FIRST);
        panel.settle_success("March 1", Some(Duration::from_millis(300)), None);
        assert!(panel.state.is_settled());

        panel.begin_round();
        assert_eq!(panel.state, LiveState::Pending);
        assert!(panel.state.display_text().is_none());
    }

    #[test]
    fn test_failure_text_is_displayable() {
        let mut panel = Panel::new(PanelId::FIRST);
        panel.settle_failure("Error: timeout");
        assert_eq!(panel.state.display_text(), Some("Error: timeout"));
        assert!(panel.state.is_settled());
    }

    #[test]
    fn test_settled_states() {
        let mut panel = Panel::new(PanelId::FIRST);
        assert!(!panel.state.is_settled());
        panel.begin_round();
        assert!(panel.state.is_pending());
        panel.settle_success("answer", None, Some("ctx".to_string()));
        assert!(panel.state.is_settled());
    }
}
