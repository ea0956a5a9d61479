//! Error types for Review Insights

use thiserror::Error;

/// Main error type for Review Insights operations
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Configuration errors (unreadable or malformed config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation errors (missing column, no rows, malformed CSV).
    /// The message is shown to the user as is.
    #[error("{0}")]
    Input(String),
}

/// Result type alias for Review Insights operations
pub type Result<T> = std::result::Result<T, InsightsError>;
