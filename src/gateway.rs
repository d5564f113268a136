//! Gateway orchestration tying conversion, proxying, aggregation, and
//! formatting together behind one service trait.

use crate::backend::{BackendClient, BackendError, QueryRequest};
use crate::config::Config;
use crate::convert::{self, ConversionError, UploadedFile};
use crate::format::format_completion;
use crate::listing::{FileListing, group_documents};
use async_trait::async_trait;

/// Errors surfaced to the client, one variant per gateway operation.
///
/// Every variant carries the failing operation's name in its message and the
/// backend-reported detail where one exists. Nothing is retried; a failure in
/// any step aborts the whole operation with no partial result.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Upload conversion failed; no ingestion was attempted.
    #[error("Document conversion failed: {0}")]
    Conversion(#[from] ConversionError),
    /// The backend rejected an ingestion upload.
    #[error("Document ingestion failed: {0}")]
    Ingestion(#[source] BackendError),
    /// The backend rejected or mangled the document listing call.
    #[error("Document listing failed: {0}")]
    Listing(#[source] BackendError),
    /// The backend rejected or mangled the completion call.
    #[error("Completion request failed: {0}")]
    Completion(#[source] BackendError),
    /// The backend rejected a deletion, including unknown-id rejections.
    #[error("Document deletion failed: {0}")]
    Deletion(#[source] BackendError),
    /// The backend never answered: connection failure or timeout.
    #[error("RAG backend unreachable: {0}")]
    Unreachable(#[source] BackendError),
}

impl GatewayError {
    /// Machine-readable error kind included in failure response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Conversion(_) => "conversion_error",
            Self::Ingestion(_) => "ingestion_error",
            Self::Listing(_) => "listing_error",
            Self::Completion(_) => "completion_error",
            Self::Deletion(_) => "deletion_error",
            Self::Unreachable(_) => "backend_unreachable",
        }
    }
}

/// Route a backend failure to its operation's variant, except when the
/// backend never answered at all.
fn classify(error: BackendError, operation: fn(BackendError) -> GatewayError) -> GatewayError {
    if error.is_unreachable() {
        GatewayError::Unreachable(error)
    } else {
        operation(error)
    }
}

/// Abstraction over the gateway operations exposed through HTTP.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Convert an uploaded file and forward it to the ingestion endpoint.
    async fn upload_document(&self, file: UploadedFile) -> Result<(), GatewayError>;

    /// Fetch the backend's document list and group it by source file name.
    async fn list_documents(&self) -> Result<FileListing, GatewayError>;

    /// Proxy a query to the completion endpoint and flatten the result.
    async fn submit_query(&self, request: QueryRequest) -> Result<String, GatewayError>;

    /// Delete one ingested document by id.
    async fn delete_document(&self, doc_id: &str) -> Result<(), GatewayError>;
}

/// Production gateway service backed by the typed backend client.
///
/// Holds no mutable state; construct it once near process start and share it
/// through an `Arc`.
pub struct GatewayService {
    backend: BackendClient,
}

impl GatewayService {
    /// Build the service from the gateway configuration.
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        Ok(Self {
            backend: BackendClient::new(config)?,
        })
    }
}

#[async_trait]
impl GatewayApi for GatewayService {
    async fn upload_document(&self, file: UploadedFile) -> Result<(), GatewayError> {
        let uploaded_name = file.name.clone();
        let content = convert::convert(file)?;
        tracing::info!(
            uploaded = %uploaded_name,
            ingested_as = %content.name,
            bytes = content.text.len(),
            "Forwarding converted upload"
        );
        self.backend
            .ingest_file(&content.name, content.text)
            .await
            .map_err(|error| classify(error, GatewayError::Ingestion))
    }

    async fn list_documents(&self) -> Result<FileListing, GatewayError> {
        let records = self
            .backend
            .list_documents()
            .await
            .map_err(|error| classify(error, GatewayError::Listing))?;
        tracing::debug!(records = records.len(), "Grouping document listing");
        Ok(group_documents(records))
    }

    async fn submit_query(&self, request: QueryRequest) -> Result<String, GatewayError> {
        let result = self
            .backend
            .submit_completion(&request)
            .await
            .map_err(|error| classify(error, GatewayError::Completion))?;
        tracing::info!(citations = result.citations.len(), "Completion received");
        Ok(format_completion(&result))
    }

    async fn delete_document(&self, doc_id: &str) -> Result<(), GatewayError> {
        self.backend
            .delete_document(doc_id)
            .await
            .map_err(|error| classify(error, GatewayError::Deletion))
    }
}
