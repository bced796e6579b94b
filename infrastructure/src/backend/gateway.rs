//! HTTP adapter for the RAG gateway port

use crate::backend::wire::{ChatRequest, ChatResponse, ErrorDetail, EvaluateRequest, EvaluateResponse};
use arena_application::ports::rag_gateway::{GatewayError, PanelAnswer, RagGateway};
use arena_domain::{ModelId, Query, RetrievalStrategy, RoundEvaluation, RoundResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default backend base URL (the development server)
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP implementation of [`RagGateway`]
///
/// One shared `reqwest::Client`; every panel request in a round rides the
/// same connection pool but progresses independently. The client-level
/// timeout is the only timeout: the coordinator itself never enforces one.
pub struct HttpRagGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRagGateway {
    /// Create a gateway against the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a gateway against the default development backend
    pub fn local() -> Result<Self, GatewayError> {
        Self::new(DEFAULT_BASE_URL, None)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read a response: 2xx bodies parse into `T`, everything else becomes a
    /// `Server` error carrying the backend's detail message when present
    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;
            return serde_json::from_slice(&body)
                .map_err(|e| GatewayError::InvalidResponse(e.to_string()));
        }

        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorDetail>(&body)
                .map(|d| d.detail)
                .unwrap_or_else(|_| Self::status_line(status)),
            Err(_) => Self::status_line(status),
        };
        Err(GatewayError::Server {
            status: status.as_u16(),
            detail,
        })
    }

    fn status_line(status: reqwest::StatusCode) -> String {
        format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )
    }
}

#[async_trait]
impl RagGateway for HttpRagGateway {
    async fn query_panel(
        &self,
        strategy: RetrievalStrategy,
        model: &ModelId,
        query: &Query,
    ) -> Result<PanelAnswer, GatewayError> {
        let request = ChatRequest {
            rag_type: strategy,
            model_id: model,
            message: query.text(),
        };
        debug!("POST /chat ({} / {})", strategy, model);

        let response = self
            .client
            .post(self.endpoint("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let parsed: ChatResponse = Self::read_response(response).await?;
        Ok(PanelAnswer {
            latency: parsed.latency(),
            context: parsed.context_text(),
            answer: parsed.answer,
        })
    }

    async fn evaluate(&self, round: &RoundResult) -> Result<RoundEvaluation, GatewayError> {
        let request = EvaluateRequest::from_round(round);
        debug!("POST /evaluate ({} panels)", request.panel_outputs.len());

        let response = self
            .client
            .post(self.endpoint("/evaluate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let parsed: EvaluateResponse = Self::read_response(response).await?;
        Ok(parsed.into())
    }

    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), GatewayError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        debug!("POST /upload/ ({})", file_name);

        let response = self
            .client
            .post(self.endpoint("/upload/"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorDetail>(&body)
                .map(|d| d.detail)
                .unwrap_or_else(|_| Self::status_line(status)),
            Err(_) => Self::status_line(status),
        };
        Err(GatewayError::Server {
            status: status.as_u16(),
            detail,
        })
    }
}
