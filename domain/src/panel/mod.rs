//! Panel module - comparison units and the registry that owns them

pub mod entities;
pub mod registry;
pub mod value_objects;
