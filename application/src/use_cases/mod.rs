//! Application use cases

pub mod run_round;
pub mod upload_document;

use arena_domain::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Session state shared between use cases and the presentation layer
///
/// The lock is held only for short, synchronous mutations; every await point
/// in the use cases sits outside the critical section.
pub type SharedSession = Arc<Mutex<Session>>;

/// Convenience constructor for a shared session
pub fn shared_session(session: Session) -> SharedSession {
    Arc::new(Mutex::new(session))
}
