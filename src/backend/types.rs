//! Shared types used by the backend client.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while interacting with the RAG backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before a usable response was decoded.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend responded with an unexpected status code.
    #[error("Unexpected backend response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the backend.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Completion payload decoded but carried no choices.
    #[error("Backend completion response contained no choices")]
    MissingChoices,
}

impl BackendError {
    /// Whether the underlying failure is a connect or timeout error, meaning
    /// the backend never produced a response at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}

/// One ingested document as reported by the backend.
///
/// A single uploaded file is chunked by the backend into several documents,
/// so many records may share one `file_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Backend-assigned document identifier.
    pub doc_id: String,
    /// Name of the source file the document was ingested from.
    pub file_name: String,
}

/// Query payload forwarded verbatim to the backend completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Natural-language prompt submitted by the client.
    pub prompt: String,
    /// Whether the backend should stream the completion (always forwarded as given).
    pub stream: bool,
    /// Whether the backend should ground the completion in ingested context.
    pub use_context: bool,
    /// Whether the backend should attach the retrieval sources it used.
    pub include_sources: bool,
}

/// One retrieval chunk the backend cited for a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCitation {
    /// Name of the file the cited passage came from.
    pub file_name: String,
    /// The cited passage text.
    pub text: String,
}

/// A completion answer together with its citations, in backend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// Generated answer text.
    pub answer: String,
    /// Cited source passages, preserved in the order the backend returned them.
    pub citations: Vec<SourceCitation>,
}

#[derive(Deserialize)]
pub(crate) struct IngestListResponse {
    pub(crate) data: Vec<IngestedDocument>,
}

#[derive(Deserialize)]
pub(crate) struct IngestedDocument {
    pub(crate) doc_id: String,
    pub(crate) doc_metadata: DocMetadata,
}

#[derive(Deserialize)]
pub(crate) struct DocMetadata {
    pub(crate) file_name: String,
}

#[derive(Deserialize)]
pub(crate) struct CompletionsResponse {
    pub(crate) choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
pub(crate) struct CompletionChoice {
    pub(crate) message: ChoiceMessage,
    #[serde(default)]
    pub(crate) sources: Vec<RawSource>,
}

#[derive(Deserialize)]
pub(crate) struct ChoiceMessage {
    pub(crate) content: String,
}

#[derive(Deserialize)]
pub(crate) struct RawSource {
    pub(crate) document: SourceDocument,
    pub(crate) text: String,
}

#[derive(Deserialize)]
pub(crate) struct SourceDocument {
    pub(crate) doc_metadata: DocMetadata,
}
