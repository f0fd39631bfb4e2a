mod helpers;

use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_root_describes_service() {
    let server = setup_test_app();

    let response = server.get("/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["service"], "HEIC/JPEG to AVIF Converter");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["quality"], 80);
    assert_eq!(body["max_file_size_mb"], 50);

    #[cfg(feature = "heic")]
    let expected = serde_json::json!(["HEIC", "HEIF", "JPEG", "JPG"]);
    #[cfg(not(feature = "heic"))]
    let expected = serde_json::json!(["JPEG", "JPG"]);
    assert_eq!(body["supported_formats"], expected);
}

#[tokio::test]
async fn test_health() {
    let server = setup_test_app();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = setup_test_app();

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static("client-trace-42"),
        )
        .await;

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "client-trace-42"
    );

    let response = server.get("/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_openapi_document_lists_endpoints() {
    let server = setup_test_app();

    let response = server.get("/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    let paths = body["paths"].as_object().unwrap();
    for path in ["/", "/health", "/convert", "/convert-stream", "/convert-jpeg"] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
}

#[tokio::test]
async fn test_docs_page_is_served() {
    let server = setup_test_app();

    let response = server.get("/docs").await;

    response.assert_status_ok();
    assert!(response.text().contains("rapi-doc"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = setup_test_app();

    server.get("/nope").await.assert_status_not_found();
}

#[tokio::test]
async fn test_get_on_convert_is_not_allowed() {
    let server = setup_test_app();

    let response = server.get("/convert").await;

    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}
