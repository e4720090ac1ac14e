//! Error types for recording-dl
//!
//! The taxonomy follows the failure modes of a scripted API client:
//! configuration errors (missing credentials, wrong region), authentication
//! errors (rejected client credentials), network/request errors (timeouts,
//! unexpected status codes), and server-reported export job failures.

use std::time::Duration;
use thiserror::Error;

use crate::types::JobState;

/// Result type alias for recording-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for recording-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "GENESYS_CLOUD_REGION")
        key: Option<String>,
    },

    /// Client credentials were rejected by the OAuth endpoint (HTTP 401)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The API returned a status code the client does not handle
    #[error("unexpected status {status} from {endpoint}: {body}")]
    UnexpectedStatus {
        /// HTTP status code returned by the API
        status: u16,
        /// The endpoint path that produced the response
        endpoint: String,
        /// Response body, for diagnostics
        body: String,
    },

    /// Network error (timeout, connection failure, TLS, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server reported the export job as failed or cancelled
    #[error("export job {id} ended in state {state}: {message}")]
    JobFailed {
        /// Identifier of the failed job
        id: String,
        /// Terminal state the job ended in (FAILED or CANCELLED)
        state: JobState,
        /// Error message reported by the server
        message: String,
    },

    /// The export job did not reach a terminal state within the allowed wait
    #[error("export job {id} did not complete within {waited:?}")]
    PollTimeout {
        /// Identifier of the job that was being polled
        id: String,
        /// How long the poller waited before giving up
        waited: Duration,
    },

    /// The operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error without an associated key
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: None,
        }
    }

    /// Create a configuration error tied to a specific configuration key
    pub fn config_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
