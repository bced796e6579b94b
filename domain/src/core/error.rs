//! Domain error types

use crate::panel::value_objects::PanelId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("No panels configured")]
    NoPanels,

    #[error("Cannot delete the last remaining panel")]
    LastPanel,

    #[error("No panel with id {0}")]
    UnknownPanel(PanelId),

    #[error("A round is already in flight")]
    RoundInFlight,
}

impl DomainError {
    /// Check whether this error should be rejected synchronously before any
    /// side effect (validation and invariant violations)
    pub fn is_rejection(&self) -> bool {
        !matches!(self, DomainError::RoundInFlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_panel_display() {
        let error = DomainError::LastPanel;
        assert_eq!(error.to_string(), "Cannot delete the last remaining panel");
    }

    #[test]
    fn test_unknown_panel_display() {
        let error = DomainError::UnknownPanel(PanelId::new(3));
        assert_eq!(error.to_string(), "No panel with id 3");
    }

    #[test]
    fn test_rejection_classification() {
        assert!(DomainError::EmptyQuery.is_rejection());
        assert!(DomainError::LastPanel.is_rejection());
        assert!(!DomainError::RoundInFlight.is_rejection());
    }
}
