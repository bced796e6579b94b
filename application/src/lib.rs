//! Application layer for rag-arena
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    progress::{NoProgress, RoundProgressNotifier},
    rag_gateway::{GatewayError, PanelAnswer, RagGateway},
};
pub use use_cases::run_round::{RoundOutcome, RunRoundError, RunRoundUseCase};
pub use use_cases::upload_document::{UploadDocumentUseCase, UploadError};
pub use use_cases::{SharedSession, shared_session};
