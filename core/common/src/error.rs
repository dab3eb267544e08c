//! Common error types for drivemcp.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for drivemcp operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The OAuth client-secret file needed to bootstrap authorization is absent.
    #[error("Credentials file not found: {}", .0.display())]
    MissingCredentialsFile(PathBuf),

    /// The interactive flow was aborted or a token exchange failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A Drive API call failed in transport or returned a non-success status.
    #[error("{}", remote_message(.status, .message))]
    RemoteRequest {
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
        /// Error text from the server or the transport.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build a remote request error.
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteRequest {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a failed remote request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequest { status, .. } => *status,
            _ => None,
        }
    }
}

fn remote_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Drive API error ({}): {}", status, message),
        None => format!("Drive API request failed: {}", message),
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
