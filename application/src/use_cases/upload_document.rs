//! Upload Document use case
//!
//! Ships a source document to the backend for indexing and records the
//! resulting artifact in the session. Uploading a new document invalidates
//! the previous round's answers and scores: they described the old corpus.

use crate::ports::rag_gateway::{GatewayError, RagGateway};
use crate::use_cases::SharedSession;
use arena_domain::{DocumentArtifact, DomainError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during document upload
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file selected")]
    EmptyFile,

    #[error("A round is already in flight")]
    RoundInFlight,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Use case for uploading a document to the backend index
pub struct UploadDocumentUseCase<G: RagGateway + 'static> {
    gateway: Arc<G>,
    session: SharedSession,
}

impl<G: RagGateway + 'static> UploadDocumentUseCase<G> {
    pub fn new(gateway: Arc<G>, session: SharedSession) -> Self {
        Self { gateway, session }
    }

    /// Upload the file and record the artifact on success
    pub async fn execute(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), UploadError> {
        if file_name.trim().is_empty() || bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        // Reject before the transfer rather than after it
        if self.session.lock().await.round_in_flight() {
            return Err(UploadError::RoundInFlight);
        }

        info!("Uploading {} ({} bytes)", file_name, bytes.len());
        self.gateway.upload_document(file_name, bytes).await?;

        let mut session = self.session.lock().await;
        session
            .set_document(DocumentArtifact::new(file_name))
            .map_err(|e| match e {
                DomainError::RoundInFlight => UploadError::RoundInFlight,
                // set_document only fails on the round gate
                _ => UploadError::RoundInFlight,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::rag_gateway::PanelAnswer;
    use crate::use_cases::shared_session;
    use arena_domain::{ModelId, Query, RetrievalStrategy, RoundEvaluation, RoundResult, Session};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct UploadGateway {
        uploads: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl RagGateway for UploadGateway {
        async fn query_panel(
            &self,
            _strategy: RetrievalStrategy,
            _model: &ModelId,
            _query: &Query,
        ) -> Result<PanelAnswer, GatewayError> {
            Ok(PanelAnswer::new("unused"))
        }

        async fn evaluate(&self, _round: &RoundResult) -> Result<RoundEvaluation, GatewayError> {
            Err(GatewayError::Transport("unused".to_string()))
        }

        async fn upload_document(
            &self,
            _file_name: &str,
            _bytes: Vec<u8>,
        ) -> Result<(), GatewayError> {
            if self.fail {
                return Err(GatewayError::Server {
                    status: 500,
                    detail: "index error".to_string(),
                });
            }
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_upload_records_artifact() {
        let session = shared_session(Session::new());
        let gateway = Arc::new(UploadGateway::default());
        let use_case = UploadDocumentUseCase::new(Arc::clone(&gateway), Arc::clone(&session));

        use_case.execute("contract.pdf", vec![1, 2, 3]).await.unwrap();

        assert_eq!(gateway.uploads.load(Ordering::SeqCst), 1);
        let session = session.lock().await;
        assert_eq!(session.document().unwrap().file_name, "contract.pdf");
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let session = shared_session(Session::new());
        let gateway = Arc::new(UploadGateway::default());
        let use_case = UploadDocumentUseCase::new(Arc::clone(&gateway), session);

        assert!(matches!(
            use_case.execute("contract.pdf", vec![]).await,
            Err(UploadError::EmptyFile)
        ));
        assert!(matches!(
            use_case.execute("  ", vec![1]).await,
            Err(UploadError::EmptyFile)
        ));
        assert_eq!(gateway.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_upload_leaves_session_unchanged() {
        let session = shared_session(Session::new());
        let gateway = Arc::new(UploadGateway {
            fail: true,
            ..Default::default()
        });
        let use_case = UploadDocumentUseCase::new(gateway, Arc::clone(&session));

        let err = use_case.execute("contract.pdf", vec![1]).await.unwrap_err();
        assert!(matches!(err, UploadError::Gateway(_)));
        assert!(session.lock().await.document().is_none());
    }

    #[tokio::test]
    async fn test_upload_rejected_mid_round() {
        let session = shared_session(Session::new());
        session
            .lock()
            .await
            .begin_round(Query::new("q"))
            .unwrap();

        let gateway = Arc::new(UploadGateway::default());
        let use_case = UploadDocumentUseCase::new(gateway, session);

        assert!(matches!(
            use_case.execute("contract.pdf", vec![1]).await,
            Err(UploadError::RoundInFlight)
        ));
    }
}
