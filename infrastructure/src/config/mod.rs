//! Configuration loading and validation

pub mod file_config;
pub mod loader;

pub use file_config::{ConfigValidationError, FileBackendConfig, FileConfig, FilePanelConfig};
pub use loader::ConfigLoader;
