//! Port definitions (interfaces to the outside world)
//!
//! Ports are implemented by adapters in the infrastructure layer
//! (and by presentation for progress display).

pub mod progress;
pub mod rag_gateway;
