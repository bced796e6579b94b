//! Panel value objects - identity and configuration

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Panel identity (Value Object)
///
/// Ids are positive, dense, and contiguous (1..=N) within the registry and
/// are re-derived on every add or delete. Identity is therefore positional:
/// results arriving for an in-flight round are correlated by the id captured
/// at dispatch time, never by a fresh lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(u32);

impl PanelId {
    /// The first panel id
    pub const FIRST: PanelId = PanelId(1);

    pub fn new(id: u32) -> Self {
        debug_assert!(id >= 1, "panel ids start at 1");
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing an unknown retrieval strategy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown retrieval strategy: {0}")]
pub struct ParseStrategyError(pub String);

/// Retrieval strategies offered by the backend (Value Object)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RetrievalStrategy {
    /// Plain similarity search over the indexed chunks
    #[default]
    Basic,
    /// Self-query retrieval with metadata filtering
    SelfQuery,
    /// Retrieval followed by a cross-encoder rerank pass
    Reranker,
}

impl RetrievalStrategy {
    /// Get the wire identifier for this strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalStrategy::Basic => "basic",
            RetrievalStrategy::SelfQuery => "self-query",
            RetrievalStrategy::Reranker => "reranker",
        }
    }

    /// All strategies, in menu order
    pub fn all() -> [RetrievalStrategy; 3] {
        [
            RetrievalStrategy::Basic,
            RetrievalStrategy::SelfQuery,
            RetrievalStrategy::Reranker,
        ]
    }
}

impl std::fmt::Display for RetrievalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RetrievalStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(RetrievalStrategy::Basic),
            "self-query" => Ok(RetrievalStrategy::SelfQuery),
            "reranker" => Ok(RetrievalStrategy::Reranker),
            other => Err(ParseStrategyError(other.to_string())),
        }
    }
}

impl Serialize for RetrievalStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RetrievalStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Backend model identifiers (Value Object)
///
/// The known variants mirror the models the backend ships with; `Custom`
/// passes through any identifier a newer backend may accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelId {
    Gemini,
    Groq,
    Jina,
    Custom(String),
}

impl ModelId {
    /// Get the wire identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            ModelId::Gemini => "gemini",
            ModelId::Groq => "groq",
            ModelId::Jina => "jina",
            ModelId::Custom(s) => s,
        }
    }

    /// Built-in models, in menu order
    pub fn known() -> [ModelId; 3] {
        [ModelId::Gemini, ModelId::Groq, ModelId::Jina]
    }
}

impl Default for ModelId {
    fn default() -> Self {
        ModelId::Groq
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gemini" => ModelId::Gemini,
            "groq" => ModelId::Groq,
            "jina" => ModelId::Jina,
            other => ModelId::Custom(other.to_string()),
        })
    }
}

impl Serialize for ModelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().expect("ModelId parsing is infallible"))
    }
}
