//! Backend adapter - HTTP implementation of the RAG gateway port

pub mod gateway;
pub mod wire;
