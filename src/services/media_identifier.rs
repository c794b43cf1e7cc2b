use std::sync::OnceLock;

use regex::Regex;

use crate::models::{EventMetadata, MediaIdentifier};

/// `com.plexapp.agents.hama://anidb-12345/1/2?lang=en`
const HAMA_ANIDB_PATTERN: &str = r"hama://anidb-(\d+)";

fn hama_anidb_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(HAMA_ANIDB_PATTERN).expect("hama GUID pattern is valid"))
}

/// AniDB id embedded in a hama agent GUID. Other agents, an id of zero, or an
/// id too large for AniDB yield `None`.
pub fn anidb_id_from_guid(guid: &str) -> Option<u32> {
    let captures = hama_anidb_regex().captures(guid)?;
    let anidb_id: u32 = captures.get(1)?.as_str().parse().ok()?;
    (anidb_id > 0).then_some(anidb_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// The GUID is absent or not a hama AniDB GUID.
    UnrecognizedGuid,
    /// The GUID matched but the episode number is missing.
    MissingEpisode,
}

pub fn extract(metadata: &EventMetadata) -> Result<MediaIdentifier, ExtractError> {
    let anidb_id = metadata
        .guid
        .as_deref()
        .and_then(anidb_id_from_guid)
        .ok_or(ExtractError::UnrecognizedGuid)?;
    let episode = metadata.index.ok_or(ExtractError::MissingEpisode)?;

    Ok(MediaIdentifier {
        anidb_id,
        season: metadata.parent_index.unwrap_or(1),
        episode,
    })
}
