//! Panel registry - the ordered, dynamic set of comparison units
//!
//! The registry owns panel identity. Ids are positional: after any delete the
//! remaining panels are renumbered to dense contiguous ids starting at 1,
//! preserving relative order. To keep that renumbering from racing with
//! in-flight responses, every structural or configuration edit is rejected
//! while any panel is pending.

use crate::core::error::DomainError;
use crate::panel::entities::Panel;
use crate::panel::value_objects::{ModelId, PanelId, RetrievalStrategy};
use serde::{Deserialize, Serialize};

/// Ordered set of panels with dense positional identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelRegistry {
    panels: Vec<Panel>,
}

impl PanelRegistry {
    /// Create a registry seeded with the two stock panels
    /// (basic/groq and self-query/gemini)
    pub fn new() -> Self {
        Self::with_seed(&[
            (RetrievalStrategy::Basic, ModelId::Groq),
            (RetrievalStrategy::SelfQuery, ModelId::Gemini),
        ])
    }

    /// Create a registry from explicit (strategy, model) pairs
    ///
    /// An empty seed falls back to a single default panel so the minimum-one
    /// invariant holds from construction onward.
    pub fn with_seed(seed: &[(RetrievalStrategy, ModelId)]) -> Self {
        let mut panels: Vec<Panel> = seed
            .iter()
            .enumerate()
            .map(|(i, (strategy, model))| {
                Panel::with_config(PanelId::new(i as u32 + 1), *strategy, model.clone())
            })
            .collect();
        if panels.is_empty() {
            panels.push(Panel::new(PanelId::FIRST));
        }
        Self { panels }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        // The minimum-one invariant means this is always false for a live
        // registry; kept for the conventional len/is_empty pair.
        self.panels.is_empty()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id == id)
    }

    /// Whether any panel is currently awaiting a response
    pub fn any_pending(&self) -> bool {
        self.panels.iter().any(|p| p.state.is_pending())
    }

    /// Whether every panel has reached a terminal state for this round
    pub fn all_settled(&self) -> bool {
        self.panels.iter().all(|p| p.state.is_settled())
    }

    /// Append a panel with default configuration and id `len + 1`
    pub fn add_panel(&mut self) -> Result<PanelId, DomainError> {
        if self.any_pending() {
            return Err(DomainError::RoundInFlight);
        }
        let id = PanelId::new(self.panels.len() as u32 + 1);
        self.panels.push(Panel::new(id));
        Ok(id)
    }

    /// Remove a panel and renumber the remainder to dense contiguous ids
    ///
    /// Rejected if it would empty the set or while a round is in flight.
    pub fn delete_panel(&mut self, id: PanelId) -> Result<(), DomainError> {
        if self.any_pending() {
            return Err(DomainError::RoundInFlight);
        }
        if self.get(id).is_none() {
            return Err(DomainError::UnknownPanel(id));
        }
        if self.panels.len() == 1 {
            return Err(DomainError::LastPanel);
        }

        self.panels.retain(|p| p.id != id);
        self.renumber();
        Ok(())
    }

    /// Update one panel's retrieval strategy
    pub fn set_strategy(
        &mut self,
        id: PanelId,
        strategy: RetrievalStrategy,
    ) -> Result<(), DomainError> {
        if self.any_pending() {
            return Err(DomainError::RoundInFlight);
        }
        let panel = self.get_mut(id).ok_or(DomainError::UnknownPanel(id))?;
        panel.strategy = strategy;
        Ok(())
    }

    /// Update one panel's model
    pub fn set_model(&mut self, id: PanelId, model: ModelId) -> Result<(), DomainError> {
        if self.any_pending() {
            return Err(DomainError::RoundInFlight);
        }
        let panel = self.get_mut(id).ok_or(DomainError::UnknownPanel(id))?;
        panel.model = model;
        Ok(())
    }

    /// Transition every panel to pending, clearing previous payloads
    pub fn begin_round(&mut self) {
        for panel in &mut self.panels {
            panel.begin_round();
        }
    }

    /// Apply a successful result to the panel dispatched with `id`
    ///
    /// Unknown ids are ignored: the set is frozen while a round is in flight,
    /// so this only arises from misuse, and dropping beats misapplying.
    pub fn settle_success(
        &mut self,
        id: PanelId,
        answer: impl Into<String>,
        latency: Option<std::time::Duration>,
        context: Option<String>,
    ) -> bool {
        match self.get_mut(id) {
            Some(panel) => {
                panel.settle_success(answer, latency, context);
                true
            }
            None => false,
        }
    }

    /// Apply a failure to the panel dispatched with `id`
    pub fn settle_failure(&mut self, id: PanelId, error: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(panel) => {
                panel.settle_failure(error);
                true
            }
            None => false,
        }
    }

    /// Force any still-pending panel to failed
    ///
    /// Safety net for a dispatched task that was lost without reporting;
    /// the join barrier requires every panel to reach a terminal state.
    pub fn fail_unsettled(&mut self, error: &str) -> usize {
        let mut failed = 0;
        for panel in &mut self.panels {
            if panel.state.is_pending() {
                panel.settle_failure(error);
                failed += 1;
            }
        }
        failed
    }

    /// Return every panel to idle
    pub fn reset_states(&mut self) {
        for panel in &mut self.panels {
            panel.reset();
        }
    }

    fn renumber(&mut self) {
        for (i, panel) in self.panels.iter_mut().enumerate() {
            panel.id = PanelId::new(i as u32 + 1);
        }
    }

    fn ids(&self) -> Vec<u32> {
        self.panels.iter().map(|p| p.id.get()).collect()
    }

    /// Invariant check used by tests: ids are dense, contiguous, from 1
    pub fn ids_are_dense(&self) -> bool {
        self.ids() == (1..=self.panels.len() as u32).collect::<Vec<_>>()
    }
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
