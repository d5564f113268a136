//! End-to-end gateway flows against a mocked RAG backend.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use httpmock::{Method::DELETE, Method::GET, Method::POST, MockServer};
use raggate::{api, config::Config, format::SECTION_DELIMITER, gateway::GatewayService};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn gateway_config(backend_url: &str) -> Config {
    Config {
        backend_url: backend_url.to_string(),
        backend_timeout_secs: 5,
        allowed_origins: vec!["http://localhost:5173".into()],
        server_port: None,
    }
}

fn app(backend_url: &str) -> Router {
    let config = gateway_config(backend_url);
    let service = GatewayService::new(&config).expect("gateway service");
    api::create_router(Arc::new(service), &config)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn multipart_upload(uri: &str, filename: &str, contents: &[u8]) -> Request<Body> {
    let boundary = "raggate-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn text_upload_is_forwarded_unchanged() {
    let server = MockServer::start_async().await;
    let ingest = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/ingest/file")
                .body_contains("uploaded text body");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let response = app(&server.base_url())
        .oneshot(multipart_upload(
            "/upload-document/",
            "notes.txt",
            b"uploaded text body",
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("successful"));
    ingest.assert();
}

#[tokio::test]
async fn failed_pdf_conversion_never_reaches_the_backend() {
    let server = MockServer::start_async().await;
    let ingest = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/ingest/file");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let response = app(&server.base_url())
        .oneshot(multipart_upload(
            "/upload-document/",
            "broken.pdf",
            b"this is not a pdf",
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_string(response).await;
    assert!(body.contains("conversion_error"));
    assert_eq!(ingest.hits_async().await, 0);
}

#[tokio::test]
async fn query_flow_returns_the_delimited_answer() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/completions").json_body(json!({
                "prompt": "summarize",
                "stream": false,
                "use_context": true,
                "include_sources": true
            }));
            then.status(200).json_body(json!({
                "choices": [{
                    "message": { "content": "A" },
                    "sources": [
                        { "document": { "doc_metadata": { "file_name": "f1.md" } }, "text": "T1" },
                        { "document": { "doc_metadata": { "file_name": "f2.md" } }, "text": "T2" }
                    ]
                }]
            }));
        })
        .await;

    let response = app(&server.base_url())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/submit-query/")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "prompt": "summarize",
                        "stream": false,
                        "use_context": true,
                        "include_sources": true
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(
        body,
        format!("A{d}f1.md{d}T1{d}f2.md{d}T2", d = SECTION_DELIMITER)
    );
}

#[tokio::test]
async fn query_without_sources_returns_the_bare_answer() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/completions");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "content": "Plain answer." } }]
            }));
        })
        .await;

    let response = app(&server.base_url())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/submit-query/")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "prompt": "summarize",
                        "stream": false,
                        "use_context": false,
                        "include_sources": false
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Plain answer.");
}

#[tokio::test]
async fn listing_flow_groups_documents_by_file_name() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/ingest/list");
            then.status(200).json_body(json!({
                "data": [
                    { "doc_id": "id-1", "doc_metadata": { "file_name": "a.md" } },
                    { "doc_id": "id-2", "doc_metadata": { "file_name": "b.md" } },
                    { "doc_id": "id-3", "doc_metadata": { "file_name": "a.md" } }
                ]
            }));
        })
        .await;

    let response = app(&server.base_url())
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/get-file-list/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json body");
    assert_eq!(json["file_list"]["a.md"], json!(["id-1", "id-3"]));
    assert_eq!(json["file_list"]["b.md"], json!(["id-2"]));
}

#[tokio::test]
async fn backend_failure_on_listing_is_never_a_success() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/ingest/list");
            then.status(500).body("ingest store exploded");
        })
        .await;

    let response = app(&server.base_url())
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/get-file-list/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json body");
    assert_eq!(json["error"], "listing_error");
    assert!(
        json["message"]
            .as_str()
            .expect("message")
            .contains("ingest store exploded")
    );
}

#[tokio::test]
async fn deleting_an_unknown_id_surfaces_the_backend_error() {
    let server = MockServer::start_async().await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v1/ingest/ghost-id");
            then.status(404).body("{\"detail\":\"document not found\"}");
        })
        .await;

    let response = app(&server.base_url())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/delete/")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "doc_id": "ghost-id" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    delete.assert();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json body");
    assert_eq!(json["error"], "deletion_error");
    assert!(
        json["message"]
            .as_str()
            .expect("message")
            .contains("document not found")
    );
}

#[tokio::test]
async fn delete_confirmation_echoes_the_id() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v1/ingest/id-42");
            then.status(204);
        })
        .await;

    let response = app(&server.base_url())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/delete/")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "doc_id": "id-42" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json body");
    assert_eq!(json["doc_id"], "id-42");
}

#[tokio::test]
async fn unreachable_backend_maps_to_its_own_error_kind() {
    // Nothing listens on this port; the connection is refused immediately.
    let response = app("http://127.0.0.1:9")
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/get-file-list/")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json body");
    assert_eq!(json["error"], "backend_unreachable");
}
