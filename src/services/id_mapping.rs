use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::AppConfig;
use crate::models::IdMappingResult;
use crate::providers::StructuredLogger;
use crate::utils::error::Result;

#[async_trait]
pub trait IdMapping {
    /// AniList id for an AniDB id, or `None` when the mapping service has
    /// nothing usable. Only transport failures are errors.
    async fn resolve(&self, anidb_id: u32, request_id: &str) -> Result<Option<u32>>;
}

/// Client for the relations service (`/api/ids?source=anidb&id=..`).
#[derive(Clone)]
pub struct IdMappingClient {
    client: Client,
    base_url: String,
}

impl IdMappingClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.webclient.timeout);
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.mapping.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl IdMapping for IdMappingClient {
    async fn resolve(&self, anidb_id: u32, request_id: &str) -> Result<Option<u32>> {
        let url = format!("{}/api/ids", self.base_url);
        let id = anidb_id.to_string();

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&[("source", "anidb"), ("id", id.as_str())])
            .send()
            .await
            .inspect_err(|e| {
                StructuredLogger::log_error(
                    &format!("Mapping request for anidb {} failed: {}", anidb_id, e),
                    Some(request_id),
                );
            })?;

        let status = response.status();
        if !status.is_success() {
            StructuredLogger::log_warning(
                &format!("Mapping service returned status {} for anidb {}", status, anidb_id),
                Some(request_id),
            );
            return Ok(None);
        }

        // The service answers `null` for ids it has never seen.
        let mapping = match response.json::<Option<IdMappingResult>>().await {
            Ok(mapping) => mapping,
            Err(e) => {
                StructuredLogger::log_warning(
                    &format!("Unreadable mapping for anidb {}: {}", anidb_id, e),
                    Some(request_id),
                );
                return Ok(None);
            }
        };

        let anilist_id = mapping.and_then(|m| m.anilist);
        StructuredLogger::log_info(
            "Resolved AniDB id",
            Some(request_id),
            Some(serde_json::json!({
                "anidb_id": anidb_id,
                "anilist_id": anilist_id,
            })),
        );

        Ok(anilist_id)
    }
}
