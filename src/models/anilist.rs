use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body sent to the AniList token endpoint.
#[derive(Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// The bearer credential obtained from the code exchange. Lives only for the
/// request that produced it, unless parked in a token store.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenExchangeResult {
    pub access_token: String,
}

impl std::fmt::Debug for TokenExchangeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenExchangeResult")
            .field("access_token", &crate::utils::fingerprint(&self.access_token))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

/// Response of the AniDB -> AniList mapping service. Only the field this
/// bridge needs is modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct IdMappingResult {
    #[serde(default)]
    pub anilist: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaListStatus {
    Current,
    Planning,
    Completed,
    Dropped,
    Paused,
    Repeating,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListEntry {
    pub id: u64,
    pub status: Option<MediaListStatus>,
    pub progress: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaProgress {
    pub id: u32,
    pub episodes: Option<i64>,
    pub media_list_entry: Option<MediaListEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedMediaListEntry {
    pub id: u64,
    pub status: Option<MediaListStatus>,
    pub progress: Option<i64>,
}
