//! Client context object for the Genesys Cloud recording APIs
//!
//! [`RecordingClient`] bundles the configuration, the region-derived base URL,
//! a shared HTTP client, and the token-caching authenticator. It is
//! constructed once at startup and passed to each operation, so there is no
//! hidden process-wide state.

use crate::auth::Authenticator;
use crate::config::{Config, Credentials};
use crate::error::Result;

/// Client for the recordings, analytics, and export job APIs
pub struct RecordingClient {
    pub(crate) config: Config,
    pub(crate) base_url: String,
    pub(crate) http: reqwest::Client,
    pub(crate) auth: Authenticator,
}

impl RecordingClient {
    /// Create a client for the region configured in `credentials`
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(credentials: Credentials, config: Config) -> Result<Self> {
        let base_url = credentials.base_url();
        Self::with_base_url(credentials, config, base_url)
    }

    /// Create a client against an explicit API base URL
    ///
    /// Overrides the region-derived host; intended for tests and private
    /// deployments.
    pub fn with_base_url(
        credentials: Credentials,
        config: Config,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let auth = Authenticator::new(
            &credentials,
            base_url.clone(),
            http.clone(),
            config.token_refresh_margin,
        );

        tracing::debug!(base_url = %base_url, "recording client created");
        Ok(Self {
            config,
            base_url,
            http,
            auth,
        })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The API base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
