//! Error types for the session layer

use thiserror::Error;

/// Errors surfaced by session operations
///
/// Extraction and reclaim failures are not errors here: they resolve into
/// session state and notices. Only input validation and local I/O escape.
#[derive(Error, Debug)]
pub enum SessionError {
    /// File offered to intake is not an accepted image
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task failed to join
    #[error("Task error: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for SessionError {
    fn from(e: tokio::task::JoinError) -> Self {
        SessionError::Task(e.to_string())
    }
}
