//! Error types for DocQA.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! LLM provider, prompt, and model catalog failures.

use thiserror::Error;

/// Unified error type for DocQA.
///
/// Only `Config` is expected to reach a caller during normal operation:
/// malformed model output and catalog outages are absorbed into result
/// values by the crates that produce them.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown provider, missing credentials, invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider transport or API errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Model catalog fetch errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error is a fatal configuration failure.
    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
