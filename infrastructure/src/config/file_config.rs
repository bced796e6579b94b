//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain types on demand.

use arena_domain::{ModelId, RetrievalStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("backend base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("unknown retrieval strategy: {0}")]
    UnknownStrategy(String),

    #[error("panel model cannot be empty")]
    EmptyModelName,
}

/// Raw backend configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL of the backend collaborator
    pub base_url: String,
    /// Client-level timeout in seconds for API calls
    pub timeout_seconds: Option<u64>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: crate::backend::gateway::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

/// One seed panel from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePanelConfig {
    pub strategy: String,
    pub model: String,
}

impl Default for FilePanelConfig {
    fn default() -> Self {
        Self {
            strategy: RetrievalStrategy::default().to_string(),
            model: ModelId::default().to_string(),
        }
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend settings
    pub backend: FileBackendConfig,
    /// Seed panels (empty means the two stock panels)
    pub panels: Vec<FilePanelConfig>,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.backend.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        for panel in &self.panels {
            panel
                .strategy
                .parse::<RetrievalStrategy>()
                .map_err(|e| ConfigValidationError::UnknownStrategy(e.0))?;
            if panel.model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName);
            }
        }
        Ok(())
    }

    /// Parse the seed panels into domain pairs
    ///
    /// An empty list yields the stock seed handled by the registry.
    pub fn seed_panels(
        &self,
    ) -> Result<Vec<(RetrievalStrategy, ModelId)>, ConfigValidationError> {
        self.panels
            .iter()
            .map(|p| {
                let strategy = p
                    .strategy
                    .parse::<RetrievalStrategy>()
                    .map_err(|e| ConfigValidationError::UnknownStrategy(e.0))?;
                if p.model.trim().is_empty() {
                    return Err(ConfigValidationError::EmptyModelName);
                }
                let model = p.model.parse::<ModelId>().expect("model parse is infallible");
                Ok((strategy, model))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[backend]
base_url = "http://bench.internal:9000"
timeout_seconds = 120

[[panels]]
strategy = "basic"
model = "groq"

[[panels]]
strategy = "reranker"
model = "jina"

[output]
color = false

[repl]
show_progress = false
history_file = "~/.local/share/rag-arena/history.txt"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "http://bench.internal:9000");
        assert_eq!(config.backend.timeout_seconds, Some(120));
        assert_eq!(config.panels.len(), 2);
        assert!(!config.output.color);
        assert!(!config.repl.show_progress);

        let seed = config.seed_panels().unwrap();
        assert_eq!(seed[1], (RetrievalStrategy::Reranker, ModelId::Jina));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[backend]
base_url = "http://localhost:8001"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8001");
        assert!(config.panels.is_empty());
        // Defaults should apply
        assert!(config.output.color);
        assert!(config.repl.show_progress);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.seed_panels().unwrap().is_empty());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let toml_str = r#"
[backend]
timeout_seconds = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_validate_unknown_strategy() {
        let toml_str = r#"
[[panels]]
strategy = "hybrid"
model = "groq"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_custom_model_passes_validation() {
        let toml_str = r#"
[[panels]]
strategy = "basic"
model = "mistral-large"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        let seed = config.seed_panels().unwrap();
        assert_eq!(seed[0].1, ModelId::Custom("mistral-large".to_string()));
    }
}
