//! Session state container
//!
//! All mutable session state (query text, panel set, round phase, evaluation)
//! lives here behind an explicit mutation API. The dispatch coordinator and
//! the panel-editing commands are the only callers, which keeps the round
//! invariants enforced in one place.

use crate::core::error::DomainError;
use crate::core::query::Query;
use crate::panel::registry::PanelRegistry;
use crate::panel::value_objects::{ModelId, PanelId, RetrievalStrategy};
use crate::round::phase::RoundPhase;
use crate::round::value_objects::{PanelOutput, RoundEvaluation, RoundResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reference to the most recently uploaded source document
///
/// Opaque to the orchestrator: its presence does not gate dispatch, queries
/// sent before an upload simply produce degraded answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentArtifact {
    pub file_name: String,
}

impl DocumentArtifact {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

/// Panel configuration captured at dispatch time
///
/// In-flight results are correlated by this snapshot, never by a fresh
/// registry lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedPanel {
    pub id: PanelId,
    pub strategy: RetrievalStrategy,
    pub model: ModelId,
}

/// Process-local state for one bench session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    query: Option<Query>,
    document: Option<DocumentArtifact>,
    registry: PanelRegistry,
    evaluation: Option<RoundEvaluation>,
    phase: RoundPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with an explicit panel seed
    pub fn with_panels(seed: &[(RetrievalStrategy, ModelId)]) -> Self {
        Self {
            registry: PanelRegistry::with_seed(seed),
            ..Self::default()
        }
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn document(&self) -> Option<&DocumentArtifact> {
        self.document.as_ref()
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn evaluation(&self) -> Option<&RoundEvaluation> {
        self.evaluation.as_ref()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Whether a round is currently in flight (the submission gate)
    pub fn round_in_flight(&self) -> bool {
        !self.phase.accepts_submission()
    }

    // ==================== Round lifecycle ====================

    /// Start a new round: store the query, clear the previous evaluation, and
    /// transition every panel to pending in one step
    ///
    /// The all-pending state is established synchronously before any request
    /// is issued, so observers see it atomically relative to any response.
    /// Returns the per-panel configuration snapshot for dispatch.
    pub fn begin_round(&mut self, query: Query) -> Result<Vec<DispatchedPanel>, DomainError> {
        if self.round_in_flight() {
            return Err(DomainError::RoundInFlight);
        }
        if self.registry.len() == 0 {
            return Err(DomainError::NoPanels);
        }

        self.evaluation = None;
        self.query = Some(query);
        self.registry.begin_round();
        self.phase = RoundPhase::AllPending;

        Ok(self
            .registry
            .panels()
            .iter()
            .map(|p| DispatchedPanel {
                id: p.id,
                strategy: p.strategy,
                model: p.model.clone(),
            })
            .collect())
    }

    /// Record a panel's successful answer, correlated by dispatched id
    ///
    /// Returns false if the id no longer resolves; the result is dropped
    /// rather than misapplied.
    pub fn apply_panel_success(
        &mut self,
        id: PanelId,
        answer: impl Into<String>,
        latency: Option<Duration>,
        context: Option<String>,
    ) -> bool {
        self.registry.settle_success(id, answer, latency, context)
    }

    /// Record a panel's failure, correlated by dispatched id
    pub fn apply_panel_failure(&mut self, id: PanelId, error: impl Into<String>) -> bool {
        self.registry.settle_failure(id, error)
    }

    /// Force any still-pending panel to failed (lost-task safety net)
    pub fn fail_unsettled(&mut self, error: &str) -> usize {
        self.registry.fail_unsettled(error)
    }

    /// Mark the round settled once every panel reached a terminal state
    ///
    /// Returns the ordered result set; failed panels contribute their error
    /// text as the answer.
    pub fn settle_round(&mut self) -> Option<RoundResult> {
        if !self.registry.all_settled() {
            return None;
        }
        self.phase = RoundPhase::Settled;

        let query = self.query.as_ref()?.text().to_string();
        let outputs = self
            .registry
            .panels()
            .iter()
            .filter_map(|p| match &p.state {
                crate::panel::entities::LiveState::Succeeded {
                    answer,
                    latency,
                    context,
                } => {
                    let mut output = PanelOutput::new(p.id, answer.clone());
                    output.latency = *latency;
                    output.context = context.clone();
                    Some(output)
                }
                crate::panel::entities::LiveState::Failed { error } => {
                    Some(PanelOutput::new(p.id, error.clone()))
                }
                _ => None,
            })
            .collect();

        Some(RoundResult::new(query, outputs))
    }

    /// Enter the evaluating phase
    pub fn begin_evaluation(&mut self) {
        self.phase = RoundPhase::Evaluating;
    }

    /// Merge the evaluation result into the session, keyed by panel id
    pub fn complete_evaluation(&mut self, evaluation: RoundEvaluation) {
        self.evaluation = Some(evaluation);
        self.phase = RoundPhase::Scored;
    }

    /// Record an evaluation failure: panel answers stay, scores stay unset,
    /// and the submission gate is released
    pub fn fail_evaluation(&mut self) {
        self.evaluation = None;
        self.phase = RoundPhase::EvalFailed;
    }

    // ==================== Panel editing ====================

    /// Append a default-configured panel; invalidates the last evaluation
    pub fn add_panel(&mut self) -> Result<PanelId, DomainError> {
        self.ensure_editable()?;
        let id = self.registry.add_panel()?;
        self.evaluation = None;
        Ok(id)
    }

    /// Delete a panel (remaining panels are renumbered); invalidates the last
    /// evaluation
    pub fn delete_panel(&mut self, id: PanelId) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.registry.delete_panel(id)?;
        self.evaluation = None;
        Ok(())
    }

    pub fn set_strategy(
        &mut self,
        id: PanelId,
        strategy: RetrievalStrategy,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.registry.set_strategy(id, strategy)
    }

    pub fn set_model(&mut self, id: PanelId, model: ModelId) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.registry.set_model(id, model)
    }

    /// Record a completed upload; previous answers and scores describe the
    /// old corpus, so panel states and the evaluation are cleared
    pub fn set_document(&mut self, artifact: DocumentArtifact) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.document = Some(artifact);
        self.evaluation = None;
        self.registry.reset_states();
        self.phase = RoundPhase::Idle;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.round_in_flight() {
            return Err(DomainError::RoundInFlight);
        }
        Ok(())
    }
}
