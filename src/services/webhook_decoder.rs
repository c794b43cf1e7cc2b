use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart};
use axum::http::{header, Request};
use tower::{service_fn, Layer, ServiceExt};

use crate::models::WebhookEvent;
use crate::utils::error::{AppError, Result};

/// A named multipart field and its raw bytes.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub data: Bytes,
}

/// Opens a `multipart/form-data` body for streaming field by field.
///
/// The body is already in memory and bounded by the router's limit, so the
/// extractor's own default limit is disabled here.
async fn open_multipart(content_type: &str, body: Bytes) -> Result<Multipart> {
    let request = Request::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .map_err(|e| AppError::malformed_payload(e.to_string()))?;

    DefaultBodyLimit::disable()
        .layer(service_fn(|request: Request<Body>| Multipart::from_request(request, &())))
        .oneshot(request)
        .await
        .map_err(|e| AppError::malformed_payload(e.to_string()))
}

/// The first field of a `multipart/form-data` body. Later fields are never
/// read. This is the only place that knows about multipart framing.
pub async fn first_multipart_field(content_type: &str, body: Bytes) -> Result<Option<FormField>> {
    let mut multipart = open_multipart(content_type, body).await?;

    let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::malformed_payload(e.to_string()))?
    else {
        return Ok(None);
    };

    let name = field.name().unwrap_or_default().to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::malformed_payload(e.to_string()))?;

    Ok(Some(FormField { name, data }))
}

fn is_multipart(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Extracts the event document from a webhook body.
///
/// PLEX posts `multipart/form-data` whose first field is `payload` (a JSON
/// document) optionally followed by a `thumb` image. The event is always read
/// from field index 0; the field name is not checked. Any other content type
/// is parsed as a bare JSON document.
pub async fn decode(content_type: Option<&str>, body: Bytes) -> Result<WebhookEvent> {
    let json = if is_multipart(content_type) {
        let content_type = content_type.unwrap_or_default();
        first_multipart_field(content_type, body)
            .await?
            .ok_or_else(|| AppError::malformed_payload("multipart body has no fields"))?
            .data
    } else {
        body
    };

    if json.is_empty() {
        return Err(AppError::malformed_payload("empty body"));
    }

    serde_json::from_slice(&json).map_err(|e| AppError::malformed_payload(e.to_string()))
}
