//! Configuration and credential types for recording-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the OAuth client id
pub const ENV_CLIENT_ID: &str = "GENESYS_CLOUD_CLIENT_ID";
/// Environment variable holding the OAuth client secret
pub const ENV_CLIENT_SECRET: &str = "GENESYS_CLOUD_CLIENT_SECRET";
/// Environment variable holding the cloud region
pub const ENV_REGION: &str = "GENESYS_CLOUD_REGION";

/// API host used when no region is configured or the region is unrecognized
pub const DEFAULT_API_HOST: &str = "api.mypurecloud.com";

/// Known Genesys Cloud regions and their API hosts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// us-east-1
    UsEast1,
    /// us-west-2
    UsWest2,
    /// eu-west-1
    EuWest1,
    /// ap-southeast-2
    ApSoutheast2,
    /// ap-northeast-1
    ApNortheast1,
}

impl Region {
    /// API hostname for this region
    pub fn api_host(&self) -> &'static str {
        match self {
            Region::UsEast1 => "api.mypurecloud.com",
            Region::UsWest2 => "api.usw2.pure.cloud",
            Region::EuWest1 => "api.mypurecloud.ie",
            Region::ApSoutheast2 => "api.mypurecloud.com.au",
            Region::ApNortheast1 => "api.mypurecloud.jp",
        }
    }

    /// Parse a region identifier; `None` for unrecognized values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "us-east-1" => Some(Region::UsEast1),
            "us-west-2" => Some(Region::UsWest2),
            "eu-west-1" => Some(Region::EuWest1),
            "ap-southeast-2" => Some(Region::ApSoutheast2),
            "ap-northeast-1" => Some(Region::ApNortheast1),
            _ => None,
        }
    }
}

/// OAuth client credentials and region, loaded once at startup
///
/// Immutable after construction. Absence of the client id or secret is fatal;
/// an unrecognized region falls back to [`DEFAULT_API_HOST`] with a warning.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Cloud region, when recognized
    pub region: Option<Region>,
}

impl Credentials {
    /// Construct credentials from explicit values
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        region: Option<Region>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            region,
        }
    }

    /// Load credentials from the `GENESYS_CLOUD_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the client id or client secret is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_parts(
            std::env::var(ENV_CLIENT_ID).ok(),
            std::env::var(ENV_CLIENT_SECRET).ok(),
            std::env::var(ENV_REGION).ok(),
        )
    }

    fn from_parts(
        client_id: Option<String>,
        client_secret: Option<String>,
        region: Option<String>,
    ) -> Result<Self> {
        let client_id = client_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_key("client id must be set", ENV_CLIENT_ID))?;
        let client_secret = client_secret
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_key("client secret must be set", ENV_CLIENT_SECRET))?;

        let region = match region.as_deref() {
            Some(raw) => {
                let parsed = Region::parse(raw);
                if parsed.is_none() {
                    tracing::warn!(
                        region = raw,
                        fallback = DEFAULT_API_HOST,
                        "unrecognized region, falling back to default API host"
                    );
                }
                parsed
            }
            None => None,
        };

        Ok(Self {
            client_id,
            client_secret,
            region,
        })
    }

    /// Base URL of the region's API host
    pub fn base_url(&self) -> String {
        let host = self.region.map_or(DEFAULT_API_HOST, |r| r.api_host());
        format!("https://{host}")
    }
}

/// Retry behavior for transient page-fetch failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial try (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (default: 500ms)
    #[serde(default = "default_initial_delay")]
    pub initial_delay: Duration,

    /// Upper bound on the backoff delay (default: 10s)
    #[serde(default = "default_max_delay")]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each attempt (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays to avoid synchronized retries (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Main configuration for [`RecordingClient`](crate::RecordingClient)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Page size for the recordings collection (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Directory downloaded media is written to (default: "./recordings")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Timeout applied to every HTTP request (default: 30s)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Pause between collection pages, to respect rate limits (default: 100ms)
    #[serde(default = "default_page_delay")]
    pub page_delay: Duration,

    /// Interval between export job status polls (default: 5s)
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// Maximum total time to wait for an export job (default: 1h)
    #[serde(default = "default_max_poll_wait")]
    pub max_poll_wait: Duration,

    /// Tokens are refreshed this long before their reported expiry (default: 300s)
    #[serde(default = "default_token_refresh_margin")]
    pub token_refresh_margin: Duration,

    /// Retry behavior for transient page-fetch failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            output_dir: default_output_dir(),
            request_timeout: default_request_timeout(),
            page_delay: default_page_delay(),
            poll_interval: default_poll_interval(),
            max_poll_wait: default_max_poll_wait(),
            token_refresh_margin: default_token_refresh_margin(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./recordings")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_page_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_max_poll_wait() -> Duration {
    Duration::from_secs(3600)
}

fn default_token_refresh_margin() -> Duration {
    Duration::from_secs(300)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(10)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_regions_map_to_their_api_hosts() {
        let cases = [
            ("us-east-1", "api.mypurecloud.com"),
            ("us-west-2", "api.usw2.pure.cloud"),
            ("eu-west-1", "api.mypurecloud.ie"),
            ("ap-southeast-2", "api.mypurecloud.com.au"),
            ("ap-northeast-1", "api.mypurecloud.jp"),
        ];
        for (raw, host) in cases {
            let region = Region::parse(raw).unwrap();
            assert_eq!(region.api_host(), host, "region {raw}");
        }
    }

    #[test]
    fn unknown_region_falls_back_to_default_host() {
        let creds = Credentials::from_parts(
            Some("id".into()),
            Some("secret".into()),
            Some("mars-north-1".into()),
        )
        .unwrap();
        assert!(creds.region.is_none());
        assert_eq!(creds.base_url(), "https://api.mypurecloud.com");
    }

    #[test]
    fn missing_region_uses_default_host() {
        let creds =
            Credentials::from_parts(Some("id".into()), Some("secret".into()), None).unwrap();
        assert_eq!(creds.base_url(), "https://api.mypurecloud.com");
    }

    #[test]
    fn known_region_builds_regional_base_url() {
        let creds = Credentials::from_parts(
            Some("id".into()),
            Some("secret".into()),
            Some("eu-west-1".into()),
        )
        .unwrap();
        assert_eq!(creds.base_url(), "https://api.mypurecloud.ie");
    }

    #[test]
    fn missing_client_id_is_a_config_error() {
        let err = Credentials::from_parts(None, Some("secret".into()), None).unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some(ENV_CLIENT_ID)),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn empty_client_secret_is_a_config_error() {
        let err =
            Credentials::from_parts(Some("id".into()), Some(String::new()), None).unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some(ENV_CLIENT_SECRET)),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn default_config_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.page_delay, Duration::from_millis(100));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.token_refresh_margin, Duration::from_secs(300));
    }
}
