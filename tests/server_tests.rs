mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use http::{header, HeaderMap, HeaderValue, Request, StatusCode, Uri};
use common::{create_test_config, multipart_content_type, plex_multipart_body, plex_multipart_body_with_thumb, scrobble_event};
use plex_anilist_scrobbler::handlers::webhook_server::request_url;
use plex_anilist_scrobbler::handlers::{Dispatcher, WebhookServer};
use plex_anilist_scrobbler::services::InMemoryTokenStore;
use serde_json::Value;
use tower::ServiceExt;

fn test_server() -> WebhookServer {
    let config = create_test_config("https://anilist.test", "http://127.0.0.1:9");
    let store = Arc::new(InMemoryTokenStore::new(Duration::from_secs(60)));
    let dispatcher = Dispatcher::new(&config, store).unwrap();
    WebhookServer::new(config.server.clone(), dispatcher)
}

#[tokio::test]
async fn test_health_check() {
    let app = test_server().create_router();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "success");
}

#[tokio::test]
async fn test_authorize_page_through_router() {
    let app = test_server().create_router();

    let response = app
        .oneshot(
            Request::get("/api/scrobble")
                .header(header::HOST, "scrobbler.example.com")
                .header("x-forwarded-proto", "https")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=UTF-8"
    );
    assert!(response.headers().contains_key("x-request-id"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("client_id=12345"));
    assert!(body.contains("redirect_uri=https%3A%2F%2Fscrobbler.example.com%2Fapi%2Fscrobble"));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = test_server().create_router();

    let response = app
        .oneshot(
            Request::get("/api/scrobble")
                .header(header::HOST, "localhost")
                .header("x-request-id", "req-from-caller")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-from-caller");
}

#[tokio::test]
async fn test_plex_webhook_through_router() {
    let app = test_server().create_router();
    let payload = scrobble_event("com.plexapp.agents.thetvdb://81797/1/1?lang=en", 1, 1).to_string();

    let response = app
        .oneshot(
            Request::post("/api/scrobble?token=user-token")
                .header(header::HOST, "localhost:8080")
                .header(header::CONTENT_TYPE, multipart_content_type())
                .body(Body::from(plex_multipart_body(&payload)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["outcome"], "ignored");
}

#[tokio::test]
async fn test_router_accepts_thumb_up_to_configured_limit() {
    let mut config = create_test_config("https://anilist.test", "http://127.0.0.1:9");
    config.server.max_body_bytes = 8 * 1024 * 1024;
    let store = Arc::new(InMemoryTokenStore::new(Duration::from_secs(60)));
    let dispatcher = Dispatcher::new(&config, store).unwrap();
    let app = WebhookServer::new(config.server.clone(), dispatcher).create_router();

    let payload = scrobble_event("com.plexapp.agents.thetvdb://81797/1/1?lang=en", 1, 1).to_string();
    let thumb = vec![0xabu8; 3 * 1024 * 1024];

    let response = app
        .oneshot(
            Request::post("/api/scrobble?token=user-token")
                .header(header::HOST, "localhost:8080")
                .header(header::CONTENT_TYPE, multipart_content_type())
                .body(Body::from(plex_multipart_body_with_thumb(&payload, &thumb)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["outcome"], "ignored");
}

#[tokio::test]
async fn test_other_methods_are_not_found() {
    let app = test_server().create_router();

    let response = app
        .oneshot(
            Request::put("/api/scrobble?token=user-token")
                .header(header::HOST, "localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!response.headers().contains_key(header::CONTENT_TYPE));
}

#[test]
fn test_request_url_from_host_headers() {
    let config = create_test_config("https://anilist.test", "https://relations.test");
    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, HeaderValue::from_static("internal:8080"));
    headers.insert("x-forwarded-host", HeaderValue::from_static("scrobbler.example.com"));
    headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
    let uri: Uri = "/api/scrobble?code=abc".parse().unwrap();

    let url = request_url(&config.server, &headers, &uri).unwrap();
    assert_eq!(url.as_str(), "https://scrobbler.example.com/api/scrobble?code=abc");
}

#[test]
fn test_request_url_prefers_public_base_url() {
    let mut config = create_test_config("https://anilist.test", "https://relations.test");
    config.server.public_base_url = Some("https://public.example.com/ignored/path".to_string());
    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, HeaderValue::from_static("internal:8080"));
    let uri: Uri = "/api/scrobble".parse().unwrap();

    let url = request_url(&config.server, &headers, &uri).unwrap();
    assert_eq!(url.as_str(), "https://public.example.com/api/scrobble");
}

#[test]
fn test_request_url_requires_host() {
    let config = create_test_config("https://anilist.test", "https://relations.test");
    let uri: Uri = "/api/scrobble".parse().unwrap();

    assert!(request_url(&config.server, &HeaderMap::new(), &uri).is_err());
}
