//! # recording-dl
//!
//! Client library for retrieving call-recording media from Genesys Cloud.
//!
//! Two independent flows are supported, mirroring the platform's two retrieval
//! paths:
//!
//! - **Direct download** — walk the recordings collection for a date range page
//!   by page, then stream each recording's media to a local file.
//! - **Bulk export** — preview the match count through the analytics API, submit
//!   a server-side export job, and poll it until it reaches a terminal state.
//!
//! All authenticated calls go through a cached OAuth client-credentials token
//! that is refreshed shortly before expiry.
//!
//! ## Quick Start
//!
//! ```no_run
//! use recording_dl::{Config, Credentials, RecordingClient};
//! use chrono::Utc;
//!
//! #[tokio::main]
//! async fn main() -> recording_dl::Result<()> {
//!     let credentials = Credentials::from_env()?;
//!     let client = RecordingClient::new(credentials, Config::default())?;
//!
//!     let end = Utc::now();
//!     let start = end - chrono::Duration::days(1);
//!     let recordings = client.list_recordings(start, end).await?;
//!
//!     for recording in &recordings {
//!         client.download_media(recording, "./recordings".as_ref()).await;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// OAuth client-credentials authentication with token caching
pub mod auth;
/// Client context object holding credentials, config, and the HTTP client
pub mod client;
/// Configuration and credential types
pub mod config;
/// Error types
pub mod error;
/// Bulk export job submission and polling
pub mod jobs;
/// Paginated recording listing and media download
pub mod recordings;
/// Retry logic with exponential backoff for transient API failures
pub mod retry;
/// Core wire types
pub mod types;

#[cfg(test)]
mod test_util;

// Re-export commonly used types
pub use auth::Authenticator;
pub use client::RecordingClient;
pub use config::{Config, Credentials, Region, RetryConfig};
pub use error::{Error, Result};
pub use jobs::should_submit;
pub use types::{ExportQuery, Interval, JobState, JobStatus, Recording, SortOrder};
