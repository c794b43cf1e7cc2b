use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, Result};

pub const DEFAULT_AUTHORIZE_URL: &str = "https://anilist.co/api/v2/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://anilist.co/api/v2/oauth/token";
pub const DEFAULT_GRAPHQL_URL: &str = "https://graphql.anilist.co";
pub const DEFAULT_MAPPING_URL: &str = "https://relations.yuna.moe";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub webclient: WebClientConfig,
    pub anilist: AnilistConfig,
    pub mapping: MappingConfig,
    pub webhook: WebhookConfig,
    pub logger: LoggerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_host: String,
    pub listen_port: u16,
    pub webhook_path: String,
    /// Scheme and host used to rebuild the request URL when running behind a
    /// proxy that rewrites `Host`. Only scheme, host and port are read.
    pub public_base_url: Option<String>,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebClientConfig {
    pub timeout: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AnilistConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub graphql_url: String,
}

impl fmt::Debug for AnilistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnilistConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("graphql_url", &self.graphql_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    pub base_url: String,
}

/// How the AniList access token reaches PLEX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenDelivery {
    /// A short random handle goes in the URL; the token stays server-side.
    Handle,
    /// The raw access token goes in the URL.
    Inline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub token_delivery: TokenDelivery,
    pub handle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
    /// Only act on events PLEX flags with `user: true`.
    pub owner_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub level: String,
    pub dir: Option<String>,
    pub file_name: String,
    pub local_time: bool,
}

/// The OAuth client pair. Immutable once loaded and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(AppError::configuration("ANILIST_CLIENT_ID is missing or empty"));
        }
        if client_secret.trim().is_empty() {
            return Err(AppError::configuration("ANILIST_CLIENT_SECRET is missing or empty"));
        }

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("server.listen_host", "0.0.0.0")?
            .set_default("server.listen_port", 8080)?
            .set_default("server.webhook_path", "/scrobble")?
            .set_default("server.max_body_bytes", 16 * 1024 * 1024)?
            .set_default("webclient.timeout", 30)?
            .set_default("anilist.client_id", "")?
            .set_default("anilist.client_secret", "")?
            .set_default("anilist.authorize_url", DEFAULT_AUTHORIZE_URL)?
            .set_default("anilist.token_url", DEFAULT_TOKEN_URL)?
            .set_default("anilist.graphql_url", DEFAULT_GRAPHQL_URL)?
            .set_default("mapping.base_url", DEFAULT_MAPPING_URL)?
            .set_default("webhook.token_delivery", "handle")?
            .set_default("webhook.handle_ttl_secs", 60 * 60 * 24 * 365)?
            .set_default("webhook.sweep_interval_secs", 60 * 60)?
            .set_default("webhook.owner_only", false)?
            .set_default("logger.level", "info")?
            .set_default("logger.file_name", "plex-anilist-scrobbler")?
            .set_default("logger.local_time", false)?
            .add_source(config::File::with_name("config.yaml").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("anilist.client_id", std::env::var("ANILIST_CLIENT_ID").ok())?
            .set_override_option(
                "anilist.client_secret",
                std::env::var("ANILIST_CLIENT_SECRET").ok(),
            )?
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Fails when the credentials are unusable or a URL is malformed, so the
    /// process never starts serving with a half-configured client.
    pub fn validate(&self) -> Result<()> {
        self.credentials()?;

        for (name, value) in [
            ("anilist.authorize_url", &self.anilist.authorize_url),
            ("anilist.token_url", &self.anilist.token_url),
            ("anilist.graphql_url", &self.anilist.graphql_url),
            ("mapping.base_url", &self.mapping.base_url),
        ] {
            url::Url::parse(value).map_err(|e| {
                AppError::configuration(format!("{} is not a valid URL: {}", name, e))
            })?;
        }

        if let Some(base) = &self.server.public_base_url {
            url::Url::parse(base).map_err(|e| {
                AppError::configuration(format!("server.public_base_url is not a valid URL: {}", e))
            })?;
        }

        if !self.server.webhook_path.starts_with('/') {
            return Err(AppError::configuration(
                "server.webhook_path must start with '/'",
            ));
        }

        Ok(())
    }

    pub fn credentials(&self) -> Result<ClientCredentials> {
        ClientCredentials::new(&self.anilist.client_id, &self.anilist.client_secret)
    }
}
