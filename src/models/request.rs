use axum::body::Bytes;
use axum::http::Method;
use serde::Serialize;
use url::Url;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One inbound HTTP request, detached from the hosting runtime.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: Url,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub request_id: String,
}

impl InboundRequest {
    /// Value of a query parameter. Empty values count as absent.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    pub fn query_keys(&self) -> Vec<String> {
        self.url
            .query_pairs()
            .map(|(key, _)| key.into_owned())
            .collect()
    }
}

/// What the dispatcher answers with. The server layer turns it into a real
/// HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub http_status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl DispatchResponse {
    pub fn html(body: String) -> Self {
        Self {
            http_status: 200,
            content_type: Some(HTML_CONTENT_TYPE),
            body,
        }
    }

    pub fn json<T: Serialize>(http_status: u16, value: &T) -> Self {
        Self {
            http_status,
            content_type: Some(JSON_CONTENT_TYPE),
            body: serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string()),
        }
    }

    pub fn empty(http_status: u16) -> Self {
        Self {
            http_status,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn not_found() -> Self {
        Self::empty(404)
    }
}
