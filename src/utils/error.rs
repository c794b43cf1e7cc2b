use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("AniList authorization failed with status {status}: {message}")]
    UpstreamAuth { status: u16, message: String },

    #[error("Invalid webhook token: {message}")]
    InvalidToken { message: String },

    #[error("Malformed webhook payload: {message}")]
    MalformedPayload { message: String },

    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging initialization error: {0}")]
    LoggingInit(#[from] tracing_appender::rolling::InitError),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream_auth(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamAuth {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    pub fn graphql(message: impl Into<String>) -> Self {
        Self::GraphQl {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The HTTP status a request fails with when this error reaches the
    /// dispatcher.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UpstreamAuth { .. } | Self::InvalidToken { .. } => 401,
            Self::MalformedPayload { .. } => 400,
            Self::HttpRequest(_) | Self::GraphQl { .. } => 502,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
