use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use htmlgo_server::{ServerConfig, app};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

fn test_app() -> Router {
    let config = ServerConfig {
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
        ..Default::default()
    };
    app(&config)
}

async fn post_convert(body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_html_to_go_with_prefix() {
    let (status, body) = post_convert(json!({
        "html": "<div class=\"container\">Hello World</div>",
        "packagePrefix": "h",
        "direction": "html2go",
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "code": "h.Div(h.Text(\"Hello World\")).Class(\"container\")",
            "html": "",
        })
    );
}

#[tokio::test]
async fn test_direction_defaults_to_html2go() {
    let (status, body) = post_convert(json!({ "html": "<p>x</p>" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "P(Text(\"x\"))");
}

#[tokio::test]
async fn test_empty_html_is_bad_request() {
    let (status, body) = post_convert(json!({ "html": "  ", "packagePrefix": "h" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "HTML content cannot be empty", "type": "html_error" })
    );
}

#[tokio::test]
async fn test_conversion_failure_is_server_error() {
    let (status, body) = post_convert(json!({ "html": "<div><unclosed>" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "unclosed tag detected",
            "type": "html_error",
            "kind": "InvalidHTML",
        })
    );
}

#[tokio::test]
async fn test_go_to_html() {
    let (status, body) = post_convert(json!({
        "goCode": "var n = h.Div(h.H1(\"Hello\").Class(\"title\")).Class(\"container\")",
        "direction": "go2html",
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "code": "",
            "html": "<div class=\"container\">\n<h1 class=\"title\">Hello</h1>\n</div>",
        })
    );
}

#[tokio::test]
async fn test_go_to_html_failure_is_reported_inline() {
    let (status, body) = post_convert(json!({
        "goCode": "var n = h.Div(\"Hello World\").Class(",
        "direction": "go2html",
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["html"].as_str().unwrap().starts_with("<!-- syntax error"));
    assert!(body["error"].as_str().unwrap().contains("expected expression"));
}

#[tokio::test]
async fn test_empty_go_code_is_bad_request() {
    let (status, body) = post_convert(json!({ "goCode": "", "direction": "go2html" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "go_error");
}

#[tokio::test]
async fn test_malformed_json_is_request_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["type"], "request_error");
}

#[tokio::test]
async fn test_get_convert_is_not_allowed() {
    let request = Request::builder()
        .uri("/convert")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_front_end_is_served() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("script.js"));
}
