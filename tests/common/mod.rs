#![allow(dead_code)]

use plex_anilist_scrobbler::config::*;
use serde_json::{json, Value};

pub const CLIENT_ID: &str = "12345";
pub const CLIENT_SECRET: &str = "super-secret-value";

pub fn create_test_config(anilist_url: &str, mapping_url: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            listen_host: "127.0.0.1".to_string(),
            listen_port: 8080,
            webhook_path: "/api/scrobble".to_string(),
            public_base_url: None,
            max_body_bytes: 1024 * 1024,
        },
        webclient: WebClientConfig { timeout: 10 },
        anilist: AnilistConfig {
            client_id: CLIENT_ID.to_string(),
            client_secret: CLIENT_SECRET.to_string(),
            authorize_url: format!("{}/api/v2/oauth/authorize", anilist_url),
            token_url: format!("{}/api/v2/oauth/token", anilist_url),
            graphql_url: format!("{}/graphql", anilist_url),
        },
        mapping: MappingConfig {
            base_url: mapping_url.to_string(),
        },
        webhook: WebhookConfig {
            token_delivery: TokenDelivery::Inline,
            handle_ttl_secs: 3600,
            sweep_interval_secs: 60,
            owner_only: false,
        },
        logger: LoggerConfig {
            level: "info".to_string(),
            dir: None,
            file_name: "test".to_string(),
            local_time: false,
        },
    }
}

pub fn scrobble_event(guid: &str, season: i64, episode: i64) -> Value {
    json!({
        "event": "media.scrobble",
        "user": true,
        "owner": true,
        "Account": { "id": 1, "title": "plexuser" },
        "Server": { "title": "home" },
        "Metadata": {
            "librarySectionType": "show",
            "type": "episode",
            "guid": guid,
            "title": "Episode Title",
            "grandparentTitle": "Show Title",
            "parentIndex": season,
            "index": episode
        }
    })
}

pub const BOUNDARY: &str = "------------------------a1b2c3d4e5f6";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// A PLEX-style body: the JSON `payload` field followed by a `thumb` image.
pub fn plex_multipart_body(payload: &str) -> Vec<u8> {
    plex_multipart_body_with_thumb(payload, &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46])
}

pub fn plex_multipart_body_with_thumb(payload: &str, thumb: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"payload\"\r\n");
    body.extend_from_slice(b"Content-Type: application/json\r\n\r\n");
    body.extend_from_slice(payload.as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"thumb\"; filename=\"image.jpg\"\r\n");
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(thumb);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// A token with the length and alphabet of a real AniList JWT.
pub fn long_token(len: usize) -> String {
    let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_.";
    (0..len)
        .map(|i| alphabet[(i * 7 + 3) % alphabet.len()] as char)
        .collect()
}

pub fn unescape_html(text: &str) -> String {
    text.replace("&#x2f;", "/")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// The URL shown inside `<code>` on the webhook page.
pub fn webhook_url_from_page(body: &str) -> Option<String> {
    let start = body.find("<code>")? + "<code>".len();
    let end = body[start..].find("</code>")? + start;
    Some(unescape_html(body[start..end].trim()))
}
