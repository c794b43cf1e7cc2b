use serde::{Deserialize, Serialize};

use crate::models::anilist::MediaListStatus;

pub const SCROBBLE_EVENT: &str = "media.scrobble";

/// The JSON document PLEX posts as the `payload` form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    /// True when the event was triggered by the account the webhook belongs to.
    #[serde(default)]
    pub user: bool,
    #[serde(rename = "Account", default)]
    pub account: Option<PlexAccount>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Option<EventMetadata>,
}

impl WebhookEvent {
    pub fn is_scrobble(&self) -> bool {
        self.event == SCROBBLE_EVENT
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexAccount {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub parent_index: Option<i64>,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub grandparent_title: Option<String>,
}

/// An episode identified by its AniDB id, extracted from a hama GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaIdentifier {
    pub anidb_id: u32,
    pub season: i64,
    pub episode: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NotScrobble,
    NotOwner,
    MissingMetadata,
    UnrecognizedGuid,
    /// hama season 0 holds AniDB specials, which AniList lists as separate media.
    UnsupportedSeason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SyncStatus {
    Updated { progress: i64, status: MediaListStatus },
    AlreadyCurrent { progress: i64 },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WebhookOutcome {
    Handled {
        anidb_id: u32,
        anilist_id: u32,
        episode: i64,
        sync: SyncStatus,
    },
    Ignored {
        reason: IgnoreReason,
    },
    MappingFailed {
        anidb_id: u32,
    },
}
