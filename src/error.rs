//! Custom error types for release-herald.

use thiserror::Error;

/// Main error type for release-herald operations.
#[derive(Error, Debug)]
pub enum HeraldError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Collaborator failures surfaced by the release run
    #[error("Label lookup failed for change {change}: {reason}")]
    LookupFailure { change: String, reason: String },

    #[error("Unable to resolve range {from}..{to} in {repo}: {reason}")]
    RangeResolutionFailure {
        repo: String,
        from: String,
        to: String,
        reason: String,
    },

    #[error("Failed to publish release: {0}")]
    PublishFailure(String),

    #[error("Failed to post chat notification: {0}")]
    NotificationFailure(String),

    #[error("Tag {0} is not signed or its signature could not be verified")]
    UnsignedTag(String),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("Git URL parse error: {0}")]
    GitUrlError(#[from] git_url_parse::GitUrlParseError),

    // Version/parsing errors - automatic conversions via #[from]
    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using HeraldError
pub type Result<T> = std::result::Result<T, HeraldError>;

impl HeraldError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    /// Create a label lookup failure for a change
    pub fn lookup(
        change: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::LookupFailure {
            change: change.into(),
            reason: reason.into(),
        }
    }

    /// Create a range resolution failure
    pub fn range(
        repo: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::RangeResolutionFailure {
            repo: repo.into(),
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }

    /// Create a publish failure
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::PublishFailure(msg.into())
    }

    /// Create a chat notification failure
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::NotificationFailure(msg.into())
    }

    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for HeraldError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for HeraldError {
    fn from(err: reqwest::Error) -> Self {
        match err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => Self::AuthenticationError(err.to_string()),
            Some(429) => Self::RateLimitExceeded,
            _ => Self::NetworkError(err.to_string()),
        }
    }
}

// Implement From for reqwest header errors (needs custom message)
impl From<reqwest::header::InvalidHeaderValue> for HeraldError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::AuthenticationError(format!("Invalid header value: {}", err))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for HeraldError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
