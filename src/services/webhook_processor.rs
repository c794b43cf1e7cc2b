use std::sync::Arc;

use async_trait::async_trait;

use crate::config::WebhookConfig;
use crate::models::{IgnoreReason, SyncStatus, WebhookEvent, WebhookOutcome};
use crate::providers::StructuredLogger;
use crate::services::media_identifier::{self, ExtractError};
use crate::services::{IdMapping, WatchSync};
use crate::utils::error::Result;

/// hama numbers regular AniDB episodes as season 1.
const MAIN_SEASON: i64 = 1;

#[async_trait]
pub trait WebhookProcessorTrait {
    async fn process(&self, event: &WebhookEvent, token: &str, request_id: &str) -> Result<WebhookOutcome>;
}

/// Turns a decoded PLEX event into an AniList progress update.
#[derive(Clone)]
pub struct WebhookProcessor {
    mapper: Arc<dyn IdMapping + Send + Sync>,
    watch_sync: WatchSync,
    owner_only: bool,
}

impl WebhookProcessor {
    pub fn new(
        config: &WebhookConfig,
        mapper: Arc<dyn IdMapping + Send + Sync>,
        watch_sync: WatchSync,
    ) -> Self {
        Self {
            mapper,
            watch_sync,
            owner_only: config.owner_only,
        }
    }

    fn ignored(reason: IgnoreReason, request_id: &str) -> Result<WebhookOutcome> {
        StructuredLogger::log_info(
            "Ignoring webhook event",
            Some(request_id),
            Some(serde_json::json!({ "reason": reason })),
        );
        Ok(WebhookOutcome::Ignored { reason })
    }
}

#[async_trait]
impl WebhookProcessorTrait for WebhookProcessor {
    async fn process(&self, event: &WebhookEvent, token: &str, request_id: &str) -> Result<WebhookOutcome> {
        StructuredLogger::log_info(
            "Processing PLEX webhook event",
            Some(request_id),
            Some(serde_json::json!({
                "event": event.event,
                "user": event.user,
                "account": event.account.as_ref().and_then(|a| a.title.clone()),
                "guid": event.metadata.as_ref().and_then(|m| m.guid.clone()),
            })),
        );

        if !event.is_scrobble() {
            return Self::ignored(IgnoreReason::NotScrobble, request_id);
        }
        if self.owner_only && !event.user {
            return Self::ignored(IgnoreReason::NotOwner, request_id);
        }
        let Some(metadata) = event.metadata.as_ref() else {
            return Self::ignored(IgnoreReason::MissingMetadata, request_id);
        };

        let media = match media_identifier::extract(metadata) {
            Ok(media) => media,
            Err(ExtractError::UnrecognizedGuid) => {
                return Self::ignored(IgnoreReason::UnrecognizedGuid, request_id)
            }
            Err(ExtractError::MissingEpisode) => {
                return Self::ignored(IgnoreReason::MissingMetadata, request_id)
            }
        };

        if media.season != MAIN_SEASON {
            return Self::ignored(IgnoreReason::UnsupportedSeason, request_id);
        }

        let Some(anilist_id) = self.mapper.resolve(media.anidb_id, request_id).await? else {
            StructuredLogger::log_warning(
                &format!("No AniList id known for anidb {}", media.anidb_id),
                Some(request_id),
            );
            return Ok(WebhookOutcome::MappingFailed {
                anidb_id: media.anidb_id,
            });
        };

        // Sync failures end up in the outcome, not in the status code.
        let sync = match self
            .watch_sync
            .mark_watched(anilist_id, media.episode, token, request_id)
            .await
        {
            Ok(sync) => sync,
            Err(e) => {
                StructuredLogger::log_error(
                    &format!("Failed to update AniList progress for {}: {}", anilist_id, e),
                    Some(request_id),
                );
                SyncStatus::Failed {
                    message: e.to_string(),
                }
            }
        };

        Ok(WebhookOutcome::Handled {
            anidb_id: media.anidb_id,
            anilist_id,
            episode: media.episode,
            sync,
        })
    }
}
