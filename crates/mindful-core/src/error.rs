//! Error types for the Mindful core.
//!
//! Only `Config` and `Validation` ever leave the core: adapter, timeout and parse failures
//! are recovered inside the component that hit them (see the fallback paths in `pipeline`,
//! `hosted_analysis`, `summary` and `session`).

use std::time::Duration;
use thiserror::Error;

/// Result type alias for core operations
pub type MindfulResult<T> = Result<T, MindfulError>;

/// Errors that can occur while talking to the classifier/generator capabilities
#[derive(Error, Debug)]
pub enum MindfulError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("Adapter call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MindfulError {
    fn from(err: reqwest::Error) -> Self {
        MindfulError::Adapter(err.to_string())
    }
}

impl From<serde_json::Error> for MindfulError {
    fn from(err: serde_json::Error) -> Self {
        MindfulError::Parse(err.to_string())
    }
}

impl From<config::ConfigError> for MindfulError {
    fn from(err: config::ConfigError) -> Self {
        MindfulError::Config(err.to_string())
    }
}
