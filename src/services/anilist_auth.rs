use std::time::Duration;

use reqwest::Client;

use crate::config::{AppConfig, ClientCredentials};
use crate::models::{TokenExchangeResult, TokenRequest, TokenResponse};
use crate::providers::StructuredLogger;
use crate::utils::error::{AppError, Result};
use crate::utils::fingerprint;

/// Exchanges an OAuth authorization code for an AniList access token.
#[derive(Clone)]
pub struct AniListAuthClient {
    client: Client,
    credentials: ClientCredentials,
    authorize_url: String,
    token_url: String,
}

impl AniListAuthClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.webclient.timeout);
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            credentials: config.credentials()?,
            authorize_url: config.anilist.authorize_url.clone(),
            token_url: config.anilist.token_url.clone(),
        })
    }

    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    /// The link the user follows to grant access. `redirect_uri` must be the
    /// same value later passed to [`exchange`](Self::exchange).
    pub fn authorize_url(&self, redirect_uri: &str) -> Result<url::Url> {
        Ok(url::Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", self.credentials.client_id()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
            ],
        )?)
    }

    pub async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
        request_id: &str,
    ) -> Result<TokenExchangeResult> {
        let body = TokenRequest {
            grant_type: "authorization_code",
            client_id: self.credentials.client_id(),
            client_secret: self.credentials.client_secret(),
            redirect_uri,
            code,
        };

        StructuredLogger::log_info(
            "Exchanging authorization code with AniList",
            Some(request_id),
            Some(serde_json::json!({
                "token_url": self.token_url,
                "redirect_uri": redirect_uri,
            })),
        );

        let response = self
            .client
            .post(&self.token_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .inspect_err(|e| {
                StructuredLogger::log_error(
                    &format!("AniList token request failed: {}", e),
                    Some(request_id),
                );
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            StructuredLogger::log_error(
                &format!("AniList token exchange failed with status {}: {}", status, body),
                Some(request_id),
            );
            return Err(AppError::upstream_auth(status.as_u16(), body));
        }

        let token_response: TokenResponse = response.json().await?;
        StructuredLogger::log_info(
            "Successfully obtained AniList access token",
            Some(request_id),
            Some(serde_json::json!({
                "token": fingerprint(&token_response.access_token),
                "expires_in": token_response.expires_in,
            })),
        );

        Ok(TokenExchangeResult {
            access_token: token_response.access_token,
        })
    }
}
