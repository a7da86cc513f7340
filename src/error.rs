//! Error types for the corscan scanner

use thiserror::Error;

/// Main error type for corscan operations
#[derive(Debug, Error)]
pub enum CorscanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No targets supplied: specify a URL (-u) or a file of URLs (--url-file)")]
    NoTargets,

    #[error("Specify either a URL or a file of URLs, not both")]
    ConflictingTargetSources,

    #[error("Invalid target '{0}': expected proto://address[:port]")]
    InvalidTarget(String),

    #[error("Scanner error: {0}")]
    ScanError(String),
}

/// Result type alias for corscan operations
pub type Result<T> = std::result::Result<T, CorscanError>;
