use axum::http::HeaderMap;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn new_request_id() -> String {
    format!("req-{}", Uuid::new_v4())
}

/// Uses the inbound `x-request-id` when the caller (or the tower-http layer)
/// set one, otherwise generates a fresh id.
pub fn extract_request_id(headers: &HeaderMap) -> String {
    match headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
    {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => new_request_id(),
    }
}
