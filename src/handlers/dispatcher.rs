use std::sync::Arc;

use axum::http::Method;
use serde_json::json;

use crate::config::{AppConfig, TokenDelivery};
use crate::handlers::pages::{render_authorize_page, render_webhook_url_page};
use crate::models::{DispatchResponse, InboundRequest};
use crate::providers::StructuredLogger;
use crate::services::token_store::new_handle;
use crate::services::{
    webhook_decoder, AniListAuthClient, AniListGraphQlClient, IdMappingClient, TokenStore,
    WatchSync, WebhookProcessor, WebhookProcessorTrait,
};
use crate::utils::error::{AppError, Result};
use crate::utils::webhook_url::{build_webhook_url, exceeds_plex_limit, strip_query, TOKEN_PARAM};
use crate::utils::PLEX_WEBHOOK_URL_LIMIT;

/// Routes one request to the authorize, exchange or webhook branch.
///
/// Holds no per-request state: every call to [`handle`](Self::handle) is
/// independent, and the only thing shared between calls is the token store.
#[derive(Clone)]
pub struct Dispatcher {
    auth: AniListAuthClient,
    processor: Arc<dyn WebhookProcessorTrait + Send + Sync>,
    token_store: Arc<dyn TokenStore + Send + Sync>,
    token_delivery: TokenDelivery,
}

impl Dispatcher {
    pub fn new(config: &AppConfig, token_store: Arc<dyn TokenStore + Send + Sync>) -> Result<Self> {
        let auth = AniListAuthClient::new(config)?;
        let graphql = Arc::new(AniListGraphQlClient::new(config)?);
        let mapper = Arc::new(IdMappingClient::new(config)?);
        let processor = WebhookProcessor::new(&config.webhook, mapper, WatchSync::new(graphql));

        Ok(Self::with_components(
            auth,
            Arc::new(processor),
            token_store,
            config.webhook.token_delivery,
        ))
    }

    pub fn with_components(
        auth: AniListAuthClient,
        processor: Arc<dyn WebhookProcessorTrait + Send + Sync>,
        token_store: Arc<dyn TokenStore + Send + Sync>,
        token_delivery: TokenDelivery,
    ) -> Self {
        Self {
            auth,
            processor,
            token_store,
            token_delivery,
        }
    }

    pub async fn handle(&self, request: InboundRequest) -> DispatchResponse {
        let request_id = request.request_id.clone();

        // Query values are left out: they carry codes and tokens.
        StructuredLogger::log_info(
            "Received request",
            Some(&request_id),
            Some(json!({
                "method": request.method.as_str(),
                "path": request.url.path(),
                "query_keys": request.query_keys(),
                "content_type": request.content_type,
                "body_size": request.body.len(),
            })),
        );

        let result = if request.method == Method::GET {
            match request.query_param("code") {
                None => self.authorize(&request),
                Some(code) => self.exchange(&request, &code).await,
            }
        } else if request.method == Method::POST {
            match request.query_param(TOKEN_PARAM) {
                Some(token) => self.webhook(&request, &token).await,
                None => Ok(DispatchResponse::not_found()),
            }
        } else {
            Ok(DispatchResponse::not_found())
        };

        let response = result.unwrap_or_else(|e| error_response(&e, &request_id));
        StructuredLogger::log_info(
            "Request completed",
            Some(&request_id),
            Some(json!({ "status": response.http_status })),
        );
        response
    }

    fn authorize(&self, request: &InboundRequest) -> Result<DispatchResponse> {
        let redirect_uri = strip_query(&request.url);
        let authorize_url = self.auth.authorize_url(redirect_uri.as_str())?;
        Ok(DispatchResponse::html(render_authorize_page(&authorize_url)?))
    }

    async fn exchange(&self, request: &InboundRequest, code: &str) -> Result<DispatchResponse> {
        let redirect_uri = strip_query(&request.url);
        let exchanged = self
            .auth
            .exchange(code, redirect_uri.as_str(), &request.request_id)
            .await?;

        let url_token = match self.token_delivery {
            TokenDelivery::Inline => exchanged.access_token,
            TokenDelivery::Handle => {
                let handle = new_handle();
                self.token_store.put(&handle, &exchanged.access_token).await?;
                handle
            }
        };

        let webhook_url = build_webhook_url(&redirect_uri, &url_token);
        if exceeds_plex_limit(&webhook_url) {
            StructuredLogger::log_warning(
                &format!(
                    "Issued webhook URL is {} characters, above the PLEX limit of {}",
                    webhook_url.as_str().len(),
                    PLEX_WEBHOOK_URL_LIMIT
                ),
                Some(&request.request_id),
            );
        }

        StructuredLogger::log_info(
            "Issued webhook URL",
            Some(&request.request_id),
            Some(json!({ "token_delivery": self.token_delivery })),
        );

        Ok(DispatchResponse::html(render_webhook_url_page(&webhook_url)?))
    }

    async fn webhook(&self, request: &InboundRequest, url_token: &str) -> Result<DispatchResponse> {
        let access_token = self.resolve_token(url_token).await?;
        let event = webhook_decoder::decode(request.content_type.as_deref(), request.body.clone()).await?;
        let outcome = self
            .processor
            .process(&event, &access_token, &request.request_id)
            .await?;

        Ok(DispatchResponse::json(200, &outcome))
    }

    async fn resolve_token(&self, url_token: &str) -> Result<String> {
        match self.token_delivery {
            TokenDelivery::Inline => Ok(url_token.to_string()),
            TokenDelivery::Handle => self
                .token_store
                .get(url_token)
                .await?
                .ok_or_else(|| AppError::invalid_token("unknown or expired webhook handle")),
        }
    }
}

fn error_response(error: &AppError, request_id: &str) -> DispatchResponse {
    let status = error.http_status();
    StructuredLogger::log_error(
        &format!("Request failed with status {}: {}", status, error),
        Some(request_id),
    );

    match error {
        AppError::UpstreamAuth { .. } | AppError::InvalidToken { .. } => DispatchResponse::empty(status),
        AppError::MalformedPayload { .. } => {
            DispatchResponse::json(status, &json!({ "error": "malformed webhook payload" }))
        }
        AppError::HttpRequest(_) | AppError::GraphQl { .. } => {
            DispatchResponse::json(status, &json!({ "error": "upstream service unavailable" }))
        }
        _ => DispatchResponse::json(status, &json!({ "error": "internal error" })),
    }
}
