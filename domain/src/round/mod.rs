//! Round module - results and evaluation of one submit/settle/score cycle

pub mod phase;
pub mod value_objects;
