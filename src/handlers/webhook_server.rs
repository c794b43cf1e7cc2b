use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use url::Url;

use crate::config::ServerConfig;
use crate::handlers::Dispatcher;
use crate::models::{DispatchResponse, InboundRequest};
use crate::providers::StructuredLogger;
use crate::utils::error::{AppError, Result};
use crate::utils::request_id::{extract_request_id, REQUEST_ID_HEADER};

#[async_trait]
pub trait WebhookServerTrait {
    async fn start(&self) -> Result<()>;
    async fn shutdown(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub server_config: ServerConfig,
}

#[derive(Clone)]
pub struct WebhookServer {
    config: ServerConfig,
    dispatcher: Dispatcher,
}

impl WebhookServer {
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        Self { config, dispatcher }
    }

    pub fn create_router(&self) -> Router {
        let app_state = AppState {
            dispatcher: self.dispatcher.clone(),
            server_config: self.config.clone(),
        };
        let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

        Router::new()
            .route(&self.config.webhook_path, any(dispatch_handler))
            .route("/health", get(health_check_handler))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id_header.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(request_id_header)),
            )
            .with_state(app_state)
    }
}

/// Absolute URL of the request as the user's browser saw it.
pub fn request_url(config: &ServerConfig, headers: &HeaderMap, uri: &Uri) -> Result<Url> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let origin = match &config.public_base_url {
        Some(base) => {
            let base = Url::parse(base)?;
            base.origin().ascii_serialization()
        }
        None => {
            let host = headers
                .get("x-forwarded-host")
                .or_else(|| headers.get(header::HOST))
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AppError::malformed_payload("request has no Host header"))?;
            let scheme = headers
                .get("x-forwarded-proto")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("http");
            format!("{}://{}", scheme, host)
        }
    };

    Ok(Url::parse(&format!("{}{}", origin, path_and_query))?)
}

impl IntoResponse for DispatchResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
            None => {
                response.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        response
    }
}

pub async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = extract_request_id(&headers);

    let url = match request_url(&state.server_config, &headers, &uri) {
        Ok(url) => url,
        Err(e) => {
            StructuredLogger::log_error(
                &format!("Could not rebuild request URL: {}", e),
                Some(&request_id),
            );
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let request = InboundRequest {
        method,
        url,
        content_type,
        body,
        request_id,
    };

    state.dispatcher.handle(request).await.into_response()
}

pub async fn health_check_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "success",
            "message": "Application is healthy"
        })),
    )
}

#[async_trait]
impl WebhookServerTrait for WebhookServer {
    async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.listen_host, self.config.listen_port)
            .parse()
            .map_err(|e| AppError::configuration(format!("Invalid server address: {}", e)))?;

        let app = self.create_router();

        info!("Scrobble server listening on {}", addr);
        StructuredLogger::log_info(
            "Scrobble server started",
            None,
            Some(serde_json::json!({
                "address": addr.to_string(),
                "webhook_path": self.config.webhook_path
            })),
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::configuration(format!("Failed to bind to address {}: {}", addr, e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        StructuredLogger::log_info("Scrobble server shutting down", None, None);
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            StructuredLogger::log_error(&format!("Failed to install Ctrl+C handler: {}", e), None);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                StructuredLogger::log_error(&format!("Failed to install SIGTERM handler: {}", e), None);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    StructuredLogger::log_info("Signal received, starting graceful shutdown", None, None);
}
