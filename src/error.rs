// Error types for trendly.
// Separates fetch-stage failures (rendered in the widget) from application errors.

use thiserror::Error;

/// Failure of a single fetch against the keyword feed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server responded with HTTP {0}")]
    BadStatus(u16),

    #[error("Malformed keyword feed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Keyword feed returned no usable entries")]
    EmptyResult,
}

#[derive(Error, Debug)]
pub enum TrendlyError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Corrupt widget data: {0}")]
    CorruptSnapshot(String),

    #[error("Could not determine a cache directory")]
    NoCacheDir,
}

pub type Result<T> = std::result::Result<T, TrendlyError>;
