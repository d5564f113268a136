//! HTTP surface for the gateway.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /upload-document/` – Convert an uploaded file and forward it to the
//!   backend ingestion endpoint.
//! - `GET /get-file-list/` – Return ingested document ids grouped by source
//!   file name.
//! - `POST /submit-query/` – Proxy a query to the backend completion endpoint
//!   and return the flattened answer-plus-citations string.
//! - `POST /delete/` – Delete one ingested document by id.
//!
//! Handlers are generic over [`GatewayApi`] so the routing layer can be tested
//! against a stub service.

use crate::backend::QueryRequest;
use crate::config::Config;
use crate::convert::UploadedFile;
use crate::gateway::{GatewayApi, GatewayError};
use crate::listing::FileListing;
use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartError},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the HTTP router exposing the gateway API surface.
pub fn create_router<S>(service: Arc<S>, config: &Config) -> Router
where
    S: GatewayApi + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/get-file-list/", get(get_file_list::<S>))
        .route("/submit-query/", post(submit_query::<S>))
        .route("/delete/", post(delete_document::<S>))
        .route("/upload-document/", post(upload_document::<S>))
        .layer(cors_layer(config))
        .with_state(service)
}

/// CORS layer restricted to the configured origins; permissive when none are set.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Liveness probe.
async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Response body for `GET /get-file-list/`.
#[derive(Serialize)]
struct FileListResponse {
    file_list: FileListing,
}

/// Return ingested document ids grouped by source file name.
async fn get_file_list<S>(State(service): State<Arc<S>>) -> Result<Json<FileListResponse>, AppError>
where
    S: GatewayApi,
{
    let file_list = service.list_documents().await?;
    Ok(Json(FileListResponse { file_list }))
}

/// Proxy a query and return the flattened response string as the body.
async fn submit_query<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<QueryRequest>,
) -> Result<String, AppError>
where
    S: GatewayApi,
{
    let formatted = service.submit_query(request).await?;
    Ok(formatted)
}

/// Request body for `POST /delete/`.
#[derive(Deserialize)]
struct DeleteRequest {
    doc_id: String,
}

/// Confirmation body for `POST /delete/`, echoing the deleted id.
#[derive(Serialize)]
struct DeleteResponse {
    doc_id: String,
}

/// Delete one ingested document by id.
async fn delete_document<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, AppError>
where
    S: GatewayApi,
{
    service.delete_document(&request.doc_id).await?;
    tracing::info!(doc_id = %request.doc_id, "Delete request completed");
    Ok(Json(DeleteResponse {
        doc_id: request.doc_id,
    }))
}

/// Success response for `POST /upload-document/`.
#[derive(Serialize)]
struct UploadResponse {
    upload_status: &'static str,
}

/// Convert the uploaded file and forward it for ingestion.
///
/// The first multipart field carrying a file name is used; the request fails
/// when no field does.
async fn upload_document<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError>
where
    S: GatewayApi,
{
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?.to_vec();
        service.upload_document(UploadedFile { name, bytes }).await?;
        return Ok(Json(UploadResponse {
            upload_status: "successful",
        }));
    }
    Err(AppError::MissingFile)
}

enum AppError {
    Gateway(GatewayError),
    Multipart(MultipartError),
    MissingFile,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            Self::Gateway(error) => (gateway_status(error), error.kind(), error.to_string()),
            Self::Multipart(error) => (
                StatusCode::BAD_REQUEST,
                "invalid_upload",
                error.to_string(),
            ),
            Self::MissingFile => (
                StatusCode::BAD_REQUEST,
                "invalid_upload",
                "Multipart request contained no file field".to_string(),
            ),
        };
        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

fn gateway_status(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::Conversion(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl From<GatewayError> for AppError {
    fn from(inner: GatewayError) -> Self {
        Self::Gateway(inner)
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        Self::Multipart(inner)
    }
}
