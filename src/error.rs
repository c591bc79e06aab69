use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketplaceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to parse HTML response: {reason}")]
    Parse { reason: String },

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("Rate limited by upstream site, try again later")]
    RateLimited,

    #[error("Invalid parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl MarketplaceError {
    /// Whether the fetcher should try the request again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::RateLimited)
    }
}

pub type Result<T> = std::result::Result<T, MarketplaceError>;
