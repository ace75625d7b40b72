//! Common error types for the ballot store

use std::time::Duration;
use thiserror::Error;

/// Common result type for ballot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced by every store operation
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required fields were missing or blank; nothing was written
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A second vote from the same voter under the one-vote-per-voter policy
    #[error("Voter {0} has already voted")]
    DuplicateVote(String),

    /// Operation did not finish before its deadline
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Field-level messages when this is a validation failure
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            Error::Validation(messages) => Some(messages),
            _ => None,
        }
    }
}
