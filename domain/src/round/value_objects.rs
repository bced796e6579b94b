//! Round value objects - immutable results of one comparison round
//!
//! These types represent the outputs of a round's two stages:
//! - [`RoundResult`] - Every panel's settled output, in panel-id order
//! - [`RoundEvaluation`] - Scores and benchmark answer from the evaluator

use crate::panel::value_objects::PanelId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settled output of a single panel
///
/// A failed panel contributes its error text as `answer`, so the evaluation
/// step always has a string to score for every panel in the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelOutput {
    pub id: PanelId,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<Duration>,
}

impl PanelOutput {
    pub fn new(id: PanelId, answer: impl Into<String>) -> Self {
        Self {
            id,
            answer: answer.into(),
            context: None,
            latency: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

/// The settled result of one round: every panel's output, ordered by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub query: String,
    pub outputs: Vec<PanelOutput>,
}

impl RoundResult {
    pub fn new(query: impl Into<String>, mut outputs: Vec<PanelOutput>) -> Self {
        outputs.sort_by_key(|o| o.id);
        Self {
            query: query.into(),
            outputs,
        }
    }

    pub fn output(&self, id: PanelId) -> Option<&PanelOutput> {
        self.outputs.iter().find(|o| o.id == id)
    }
}

/// Score breakdown for one panel, as produced by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelScore {
    pub similarity: f64,
    pub correctness: f64,
    pub total: f64,
}

/// Result of the aggregate evaluation call for one round
///
/// Present only after every panel in the round settled; the best panel and
/// any tie handling are decided by the evaluation service, never recomputed
/// client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEvaluation {
    /// Reference answer generated independently of any panel
    pub benchmark_answer: String,
    /// Per-panel score breakdown, keyed by panel id
    pub scores: Vec<(PanelId, PanelScore)>,
    /// Highest-scoring panel, if the evaluator named one
    pub best_panel: Option<PanelId>,
}

impl RoundEvaluation {
    pub fn score(&self, id: PanelId) -> Option<&PanelScore> {
        self.scores
            .iter()
            .find(|(panel, _)| *panel == id)
            .map(|(_, score)| score)
    }

    pub fn is_best(&self, id: PanelId) -> bool {
        self.best_panel == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_result_orders_by_id() {
        let result = RoundResult::new(
            "q",
            vec![
                PanelOutput::new(PanelId::new(2), "b"),
                PanelOutput::new(PanelId::new(1), "a"),
            ],
        );
        let ids: Vec<u32> = result.outputs.iter().map(|o| o.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_output_lookup() {
        let result = RoundResult::new(
            "q",
            vec![PanelOutput::new(PanelId::new(1), "a").with_latency(Duration::from_millis(300))],
        );
        assert_eq!(result.output(PanelId::new(1)).unwrap().answer, "a");
        assert!(result.output(PanelId::new(2)).is_none());
    }

    #[test]
    fn test_evaluation_score_lookup() {
        let eval = RoundEvaluation {
            benchmark_answer: "March 1".to_string(),
            scores: vec![(
                PanelId::new(1),
                PanelScore {
                    similarity: 0.9,
                    correctness: 0.9,
                    total: 0.9,
                },
            )],
            best_panel: Some(PanelId::new(1)),
        };
        assert_eq!(eval.score(PanelId::new(1)).unwrap().total, 0.9);
        assert!(eval.score(PanelId::new(2)).is_none());
        assert!(eval.is_best(PanelId::new(1)));
        assert!(!eval.is_best(PanelId::new(2)));
    }
}
