use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// The completion service failed or returned an unusable response.
    /// This is the one error class that terminates a turn abnormally;
    /// retrieval faults are degraded to empty results instead.
    #[error("Completion request failed: {0}")]
    Completion(String),

    /// Represents errors originating from the feedback database (`sqlx`).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents errors from a knowledge-store backend. Swallowed to empty
    /// results inside the retriever; carried here only for logging.
    #[error("Knowledge store error: {0}")]
    Store(String),

    /// Represents configuration-related errors (e.g., malformed endpoint URLs).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else {
            AppError::Store(format!("HTTP error: {}", err))
        }
    }
}
