use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::models::{MediaListStatus, MediaProgress, SavedMediaListEntry, SyncStatus};
use crate::providers::StructuredLogger;
use crate::services::GraphQlApi;
use crate::utils::error::{AppError, Result};
use crate::utils::json::{graphql_error_messages, navigate_json_path};

pub const MEDIA_PROGRESS_QUERY: &str = "\
query ($mediaId: Int) {
  Media (id: $mediaId, type: ANIME) {
    id
    episodes
    mediaListEntry {
      id
      status
      progress
    }
  }
}";

pub const SAVE_PROGRESS_MUTATION: &str = "\
mutation ($mediaId: Int, $progress: Int, $status: MediaListStatus) {
  SaveMediaListEntry (mediaId: $mediaId, progress: $progress, status: $status) {
    id
    status
    progress
  }
}";

/// Brings the user's list entry for one anime up to a watched episode.
#[derive(Clone)]
pub struct WatchSync {
    graphql: Arc<dyn GraphQlApi + Send + Sync>,
}

impl WatchSync {
    pub fn new(graphql: Arc<dyn GraphQlApi + Send + Sync>) -> Self {
        Self { graphql }
    }

    /// Reads the current progress and only writes when `episode` is ahead
    /// of it. Progress never moves backwards.
    pub async fn mark_watched(
        &self,
        anilist_id: u32,
        episode: i64,
        token: &str,
        request_id: &str,
    ) -> Result<SyncStatus> {
        let document = self
            .graphql
            .query(MEDIA_PROGRESS_QUERY, json!({ "mediaId": anilist_id }), token, request_id)
            .await?;
        let media: MediaProgress = data_field(&document, "Media")?;

        let entry = media.media_list_entry.as_ref();
        let current = entry.and_then(|e| e.progress).unwrap_or(0);
        if episode <= current {
            StructuredLogger::log_info(
                "AniList progress already current",
                Some(request_id),
                Some(json!({
                    "anilist_id": anilist_id,
                    "progress": current,
                    "episode": episode,
                })),
            );
            return Ok(SyncStatus::AlreadyCurrent { progress: current });
        }

        let status = next_status(media.episodes, entry.and_then(|e| e.status), episode);
        let document = self
            .graphql
            .query(
                SAVE_PROGRESS_MUTATION,
                json!({ "mediaId": anilist_id, "progress": episode, "status": status }),
                token,
                request_id,
            )
            .await?;
        let saved: SavedMediaListEntry = data_field(&document, "SaveMediaListEntry")?;

        let progress = saved.progress.unwrap_or(episode);
        let status = saved.status.unwrap_or(status);
        StructuredLogger::log_info(
            "AniList progress updated",
            Some(request_id),
            Some(json!({
                "anilist_id": anilist_id,
                "entry_id": saved.id,
                "previous_progress": current,
                "progress": progress,
                "status": status,
            })),
        );

        Ok(SyncStatus::Updated { progress, status })
    }
}

/// List status after watching `episode`.
pub fn next_status(
    total_episodes: Option<i64>,
    current: Option<MediaListStatus>,
    episode: i64,
) -> MediaListStatus {
    match (total_episodes, current) {
        (Some(total), _) if total > 0 && episode >= total => MediaListStatus::Completed,
        (_, Some(MediaListStatus::Repeating)) => MediaListStatus::Repeating,
        _ => MediaListStatus::Current,
    }
}

fn data_field<T: DeserializeOwned>(document: &Value, field: &str) -> Result<T> {
    let errors = graphql_error_messages(document);
    if !errors.is_empty() {
        return Err(AppError::graphql(errors.join("; ")));
    }

    let value = navigate_json_path(document, &["data", field])
        .into_iter()
        .next()
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::graphql(format!("response has no data.{}", field)))?;

    Ok(serde_json::from_value(value.clone())?)
}
