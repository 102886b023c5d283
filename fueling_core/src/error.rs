//! Error types for the fueling_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fueling_core operations
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

    /// Enhanced plan failed shape or tolerance validation; recovered by
    /// substituting the deterministic fallback plan
    #[error("Enhancement validation failed: {0}")]
    Enhancement(String),

    /// No candidates and no fallback entry exist for a meal type
    #[error("No recipes available for meal type '{0}'")]
    EmptyRecipePool(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
