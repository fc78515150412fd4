//! Error types for the davlib library.

use thiserror::Error;

use crate::dav::status::DavStatus;

/// Main error type for davlib operations.
#[derive(Error, Debug)]
pub enum DavError {
    /// The server answered with a non-success status.
    ///
    /// `body` holds whatever the server sent back, which is usually the most
    /// useful thing to show the user.
    #[error("HTTP {status} ({}): {body}", status_text(.status))]
    Transport { status: u16, body: String },

    /// No response was obtained at all (connection refused, reset, DNS...).
    #[error("Network error: {0}")]
    Network(String),

    /// A successful response whose body violates the protocol.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Operation rejected locally before any request was issued.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A path or name that cannot be used for the requested operation.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The user backed out of a confirmation or prompt.
    #[error("Cancelled")]
    Cancelled,

    /// A background task panicked or was aborted.
    #[error("Task failed: {0}")]
    Task(String),

    /// Building the HTTP client or request failed.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Local file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),
}

impl DavError {
    /// Status code carried by a [`DavError::Transport`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            DavError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for errors raised locally without touching the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            DavError::Unsupported(_) | DavError::InvalidPath(_) | DavError::Cancelled
        )
    }
}

fn status_text(status: &u16) -> &'static str {
    DavStatus::from(*status).description()
}

/// Result type alias for davlib operations.
pub type Result<T> = std::result::Result<T, DavError>;
