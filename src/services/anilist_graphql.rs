use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::AppConfig;
use crate::models::GraphQlRequest;
use crate::providers::StructuredLogger;
use crate::utils::error::Result;

#[async_trait]
pub trait GraphQlApi {
    /// Runs `document` with `variables` as the user owning `token`. The parsed
    /// body is returned as-is; inspecting `errors` is up to the caller.
    async fn query(&self, document: &str, variables: Value, token: &str, request_id: &str) -> Result<Value>;
}

#[derive(Clone)]
pub struct AniListGraphQlClient {
    client: Client,
    graphql_url: String,
}

impl AniListGraphQlClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.webclient.timeout);
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            graphql_url: config.anilist.graphql_url.clone(),
        })
    }
}

#[async_trait]
impl GraphQlApi for AniListGraphQlClient {
    async fn query(&self, document: &str, variables: Value, token: &str, request_id: &str) -> Result<Value> {
        let request = GraphQlRequest {
            query: document,
            variables,
        };

        let response = self
            .client
            .post(&self.graphql_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .inspect_err(|e| {
                StructuredLogger::log_error(
                    &format!("AniList GraphQL request failed: {}", e),
                    Some(request_id),
                );
            })?;

        let status = response.status();
        let body: Value = response.json().await?;

        StructuredLogger::log_info(
            &format!("AniList GraphQL responded with status {}", status),
            Some(request_id),
            Some(serde_json::json!({
                "has_errors": body.get("errors").is_some(),
            })),
        );

        Ok(body)
    }
}
