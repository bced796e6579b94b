//! Domain layer for rag-arena
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! A panel is one independently configured comparison unit: a retrieval
//! strategy paired with a model. Every panel receives the same query.
//!
//! ## Round
//!
//! A round is one full cycle of submit-all-panels, settle-all-panels, and a
//! single aggregate evaluation that scores the panels' answers against a
//! benchmark answer produced by the evaluation service.

pub mod core;
pub mod panel;
pub mod round;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, query::Query};
pub use panel::{
    entities::{LiveState, Panel},
    registry::PanelRegistry,
    value_objects::{ModelId, PanelId, RetrievalStrategy},
};
pub use round::{
    phase::RoundPhase,
    value_objects::{PanelOutput, PanelScore, RoundEvaluation, RoundResult},
};
pub use session::entities::{DispatchedPanel, DocumentArtifact, Session};
