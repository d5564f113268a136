//! HTTP client wrapper for the RAG backend REST surface.

use crate::backend::types::{
    BackendError, CompletionResult, CompletionsResponse, DocumentRecord, IngestListResponse,
    QueryRequest, SourceCitation,
};
use crate::config::Config;
use reqwest::{Client, Method, multipart};
use std::time::Duration;

/// Typed HTTP client for the backend ingestion and completion endpoints.
///
/// One client is constructed at startup and shared across requests; every
/// call issues exactly one HTTP request with the configured timeout applied.
pub struct BackendClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl BackendClient {
    /// Construct a new client from the gateway configuration.
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent("raggate/0.1")
            .timeout(Duration::from_secs(config.backend_timeout_secs))
            .build()?;

        let base_url = normalize_base_url(&config.backend_url).map_err(BackendError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            timeout_secs = config.backend_timeout_secs,
            "Initialized backend HTTP client"
        );

        Ok(Self { client, base_url })
    }

    /// Fetch the flat list of ingested documents.
    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>, BackendError> {
        let response = self.request(Method::GET, "v1/ingest/list").send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = BackendError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Failed to list ingested documents");
            return Err(error);
        }

        let payload: IngestListResponse = response.json().await?;
        let records = payload
            .data
            .into_iter()
            .map(|document| DocumentRecord {
                doc_id: document.doc_id,
                file_name: document.doc_metadata.file_name,
            })
            .collect();
        Ok(records)
    }

    /// Forward a query payload to the completion endpoint and decode the result.
    pub async fn submit_completion(
        &self,
        request: &QueryRequest,
    ) -> Result<CompletionResult, BackendError> {
        let response = self
            .request(Method::POST, "v1/completions")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = BackendError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Backend completion call failed");
            return Err(error);
        }

        let payload: CompletionsResponse = response.json().await?;
        let choice = payload
            .choices
            .into_iter()
            .next()
            .ok_or(BackendError::MissingChoices)?;
        let citations = choice
            .sources
            .into_iter()
            .map(|source| SourceCitation {
                file_name: source.document.doc_metadata.file_name,
                text: source.text,
            })
            .collect();

        Ok(CompletionResult {
            answer: choice.message.content,
            citations,
        })
    }

    /// Delete one ingested document by id.
    ///
    /// The backend is the source of truth for existence; its error response
    /// for an unknown id is surfaced unchanged.
    pub async fn delete_document(&self, doc_id: &str) -> Result<(), BackendError> {
        let response = self
            .request(Method::DELETE, &format!("v1/ingest/{doc_id}"))
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::debug!(doc_id, "Document deleted");
        })
        .await
    }

    /// Submit converted file content to the ingestion endpoint as a multipart upload.
    pub async fn ingest_file(&self, file_name: &str, text: Vec<u8>) -> Result<(), BackendError> {
        let part = multipart::Part::bytes(text).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .request(Method::POST, "v1/ingest/file")
            .multipart(form)
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::debug!(file = file_name, "File forwarded for ingestion");
        })
        .await
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, format_endpoint(&self.base_url, path))
    }

    async fn ensure_success<F>(
        &self,
        response: reqwest::Response,
        on_success: F,
    ) -> Result<(), BackendError>
    where
        F: FnOnce(),
    {
        if response.status().is_success() {
            on_success();
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = BackendError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Backend request failed");
            Err(error)
        }
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
