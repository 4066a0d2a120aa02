//! Error types for the calorie_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for calorie_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed profile or food entry input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A food entry with this id is already logged
    #[error("Duplicate food entry id: {0}")]
    DuplicateId(String),

    /// Key-value storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Food image analysis failed or timed out
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A second analysis was requested while one is still pending
    #[error("An analysis is already in progress")]
    AnalysisInProgress,
}
