//! Session module - process-local state for the current bench session

pub mod entities;
