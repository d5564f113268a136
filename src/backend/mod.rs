//! Typed client for the RAG backend REST surface.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{
    BackendError, CompletionResult, DocumentRecord, QueryRequest, SourceCitation,
};
