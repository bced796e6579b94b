//! Infrastructure layer for rag-arena
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.

pub mod backend;
pub mod config;

// Re-export commonly used types
pub use backend::gateway::HttpRagGateway;
pub use config::{
    file_config::{ConfigValidationError, FileBackendConfig, FileConfig, FilePanelConfig},
    loader::ConfigLoader,
};
