//! Wire types for the backend collaborator
//!
//! The backend speaks snake_case JSON. These DTOs map between the wire
//! contract and the domain types; nothing outside this module touches the
//! raw field names.

use arena_domain::{ModelId, PanelId, PanelScore, RetrievalStrategy, RoundEvaluation, RoundResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Request body for `POST /chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub rag_type: RetrievalStrategy,
    pub model_id: &'a ModelId,
    pub message: &'a str,
}

/// Success body for `POST /chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub response_time_seconds: Option<f64>,
    #[serde(default)]
    pub context: Option<Value>,
}

impl ChatResponse {
    pub fn latency(&self) -> Option<Duration> {
        self.response_time_seconds
            .filter(|s| *s >= 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Context may arrive as a plain string or a structured value;
    /// structured values are pretty-printed for display
    pub fn context_text(&self) -> Option<String> {
        match &self.context {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => serde_json::to_string_pretty(other).ok(),
        }
    }
}

/// One panel's entry in the evaluation request
#[derive(Debug, Clone, Serialize)]
pub struct PanelOutputWire {
    pub id: PanelId,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_seconds: Option<f64>,
}

/// Request body for `POST /evaluate`
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateRequest {
    pub panel_outputs: Vec<PanelOutputWire>,
}

impl EvaluateRequest {
    pub fn from_round(round: &RoundResult) -> Self {
        Self {
            panel_outputs: round
                .outputs
                .iter()
                .map(|o| PanelOutputWire {
                    id: o.id,
                    response: o.answer.clone(),
                    context: o.context.clone(),
                    response_time_seconds: o.latency.map(|d| d.as_secs_f64()),
                })
                .collect(),
        }
    }
}

/// One panel's score entry in the evaluation response
#[derive(Debug, Clone, Deserialize)]
pub struct PanelScoreWire {
    pub id: PanelId,
    pub similarity_score: f64,
    pub correctness_score: f64,
    pub total_score: f64,
}

/// Success body for `POST /evaluate`
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateResponse {
    pub scores: Vec<PanelScoreWire>,
    #[serde(default)]
    pub best_panel_id: Option<PanelId>,
    pub benchmark_answer: String,
}

impl From<EvaluateResponse> for RoundEvaluation {
    fn from(wire: EvaluateResponse) -> Self {
        RoundEvaluation {
            benchmark_answer: wire.benchmark_answer,
            scores: wire
                .scores
                .into_iter()
                .map(|s| {
                    (
                        s.id,
                        PanelScore {
                            similarity: s.similarity_score,
                            correctness: s.correctness_score,
                            total: s.total_score,
                        },
                    )
                })
                .collect(),
            best_panel: wire.best_panel_id,
        }
    }
}

/// Error body the backend attaches to non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
