//! Integration tests for the starter endpoint.
//!
//! The router is driven in-process with `oneshot`; remote documents come from
//! a stub fetcher so no network access is needed.

use std::io::{Cursor, Read};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::json;
use tower::ServiceExt;
use url::Url;
use zip_starter_core::error::BoxError;
use zip_starter_core::{read_entries, Fetcher};
use zip_starter_server::{create_router, AppState};

/// Returns `<html></html>` for every URL.
struct StubFetcher;

impl Fetcher for StubFetcher {
    fn get(&self, _url: &Url) -> Result<Box<dyn Read + Send>, BoxError> {
        Ok(Box::new(Cursor::new(b"<html></html>".to_vec())))
    }
}

/// Fails every request as if the host were down.
struct DownFetcher;

impl Fetcher for DownFetcher {
    fn get(&self, _url: &Url) -> Result<Box<dyn Read + Send>, BoxError> {
        Err("connection refused".into())
    }
}

fn app(fetcher: impl Fetcher + 'static) -> axum::Router {
    create_router(AppState::new(Arc::new(fetcher)))
}

fn json_post(path: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

async fn entry_names(response: Response) -> Vec<String> {
    let bytes = body_bytes(response).await;
    read_entries(Cursor::new(bytes))
        .expect("response should be a ZIP archive")
        .into_iter()
        .map(|e| e.name)
        .collect()
}

#[tokio::test]
async fn test_uuid_and_url_build_full_archive() {
    let response = app(StubFetcher)
        .oneshot(json_post(
            "/",
            json!({"uuid": "abc", "url": "https://example.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/zip, application/octet-stream"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"abc.zip\""
    );
    assert_eq!(
        entry_names(response).await,
        vec!["abc.json", "abc.html", "/data/", "/tools/"]
    );
}

#[tokio::test]
async fn test_path_names_archive() {
    let response = app(StubFetcher)
        .oneshot(json_post("/foo/", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"foo.zip\""
    );
    assert_eq!(
        entry_names(response).await,
        vec!["foo.json", "/data/", "/tools/"]
    );
}

#[tokio::test]
async fn test_root_without_uuid_is_rejected() {
    let response = app(StubFetcher)
        .oneshot(json_post("/", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(text.starts_with("please provide the name of the zip"));
    assert!(text.ends_with('\n'));
}

#[tokio::test]
async fn test_unreachable_url_is_bad_request() {
    let response = app(DownFetcher)
        .oneshot(json_post(
            "/site",
            json!({"url": "https://unreachable.invalid/"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "error fetching url 'https://unreachable.invalid/': connection refused\n"
    );
}

#[tokio::test]
async fn test_malformed_url_is_bad_request() {
    let response = app(StubFetcher)
        .oneshot(json_post("/site", json!({"url": "http://[::1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response)
        .await
        .starts_with("error fetching url 'http://[::1'"));
}

#[tokio::test]
async fn test_get_is_rejected() {
    let response = app(StubFetcher)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/foo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "this server only accepts JSON POST requests\n"
    );
}

#[tokio::test]
async fn test_wrong_content_type_is_rejected() {
    let response = app(StubFetcher)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/foo")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "this server only accepts JSON POST requests\n"
    );
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    for body in [json!([1, 2, 3]), json!("uuid"), json!(42)] {
        let response = app(StubFetcher)
            .oneshot(json_post("/foo", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let response = app(StubFetcher)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/foo")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_options_returns_empty_ok() {
    let response = app(StubFetcher)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/foo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_cors_preflight() {
    let response = app(StubFetcher)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/foo")
                .header(header::ORIGIN, "https://harvest.example.org")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn test_cors_header_on_archive_response() {
    let mut request = json_post("/foo", json!({}));
    request
        .headers_mut()
        .insert(header::ORIGIN, "https://harvest.example.org".parse().unwrap());

    let response = app(StubFetcher).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_percent_encoded_path_is_decoded() {
    let response = app(StubFetcher)
        .oneshot(json_post("/my%20site/", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"my site.zip\""
    );
    assert_eq!(
        entry_names(response).await,
        vec!["my site.json", "/data/", "/tools/"]
    );
}

#[tokio::test]
async fn test_path_with_invalid_utf8_is_rejected() {
    let response = app(StubFetcher)
        .oneshot(json_post("/bad%FF/", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_in_uuid_is_rejected() {
    let response = app(StubFetcher)
        .oneshot(json_post(
            "/",
            json!({"uuid": "a\"; filename=\"evil.exe"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .is_none());
}
