//! Error types for wellness metrics

use thiserror::Error;

/// Errors that can occur while turning raw records into metrics
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Invalid clock time {hour}:{minute:02}: hour must be 0-23 and minute 0-59")]
    InvalidInput { hour: u32, minute: u32 },

    #[error("Failed to parse time of day: {0}")]
    TimeParseError(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Failed to parse record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
