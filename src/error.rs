//! Error types for Tycho.

use thiserror::Error;

/// Library-level error type for Tycho operations.
#[derive(Error, Debug)]
pub enum TychoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed source record: {0}")]
    SourceRecord(String),

    #[error("Failed to load vector index: {0}")]
    IndexLoad(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("NASA API error: {0}")]
    NasaApi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Tycho operations.
pub type Result<T> = std::result::Result<T, TychoError>;
