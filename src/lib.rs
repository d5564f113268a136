#![deny(missing_docs)]

//! Core library for the Raggate RAG gateway.

/// HTTP routing and REST handlers.
pub mod api;
/// Typed client for the RAG backend REST surface.
pub mod backend;
/// Environment-driven configuration management.
pub mod config;
/// Upload conversion into ingestible text.
pub mod convert;
/// Completion response flattening.
pub mod format;
/// Gateway orchestration service.
pub mod gateway;
/// Document listing aggregation.
pub mod listing;
/// Structured logging and tracing setup.
pub mod logging;
