//! Query value object

use serde::{Deserialize, Serialize};

/// A query to be answered by every panel in a round (Value Object)
///
/// Immutable for the duration of one round: the text captured here is what
/// every panel receives, regardless of later edits in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
}

impl Query {
    /// Create a new query
    ///
    /// # Panics
    /// Panics if the text is empty or only whitespace
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        assert!(!text.trim().is_empty(), "Query cannot be empty");
        Self { text }
    }

    /// Try to create a new query, returning None if blank
    pub fn try_new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    /// Get the query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume and return the inner text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_creation() {
        let q = Query::new("What is the deadline?");
        assert_eq!(q.text(), "What is the deadline?");
    }

    #[test]
    #[should_panic]
    fn test_empty_query_panics() {
        Query::new("");
    }

    #[test]
    fn test_try_new_blank() {
        assert!(Query::try_new("").is_none());
        assert!(Query::try_new("   \t").is_none());
    }

    #[test]
    fn test_try_new_valid() {
        assert!(Query::try_new("What is the deadline?").is_some());
    }
}
