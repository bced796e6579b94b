//! RAG Gateway port
//!
//! Defines the interface for communicating with the backend collaborator
//! (per-panel queries, aggregate evaluation, document upload).

use arena_domain::{ModelId, Query, RetrievalStrategy, RoundEvaluation, RoundResult};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while reaching the backend
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network failure, timeout, or unreadable body
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status with a server-supplied detail message
    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// A 2xx response whose body did not match the wire contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Human-readable text for a failed panel: the server's detail message
    /// when present, otherwise the raw transport error
    pub fn panel_error_text(&self) -> String {
        match self {
            GatewayError::Server { detail, .. } => format!("Error: {}", detail),
            other => format!("Error: {}", other),
        }
    }
}

/// One panel's parsed answer from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PanelAnswer {
    pub answer: String,
    pub latency: Option<Duration>,
    pub context: Option<String>,
}

impl PanelAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            latency: None,
            context: None,
        }
    }
}

/// Gateway to the backend collaborator
///
/// This port defines how the application layer reaches the retrieval and
/// evaluation service. Implementations (adapters) live in the infrastructure
/// layer.
#[async_trait]
pub trait RagGateway: Send + Sync {
    /// Ask one panel's configured pipeline to answer the query
    async fn query_panel(
        &self,
        strategy: RetrievalStrategy,
        model: &ModelId,
        query: &Query,
    ) -> Result<PanelAnswer, GatewayError>;

    /// Score a settled round's outputs against a generated benchmark answer
    async fn evaluate(&self, round: &RoundResult) -> Result<RoundEvaluation, GatewayError>;

    /// Upload a source document for indexing
    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_uses_detail() {
        let err = GatewayError::Server {
            status: 500,
            detail: "timeout".to_string(),
        };
        assert_eq!(err.panel_error_text(), "Error: timeout");
    }

    #[test]
    fn test_transport_error_uses_raw_message() {
        let err = GatewayError::Transport("connection refused".to_string());
        assert_eq!(
            err.panel_error_text(),
            "Error: Transport error: connection refused"
        );
    }
}
