//! Shared helpers for wiremock-backed tests

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::RecordingClient;
use crate::config::{Config, Credentials, RetryConfig};

/// Config with sub-millisecond pacing so paginated and polling tests run fast
pub(crate) fn fast_config() -> Config {
    Config {
        page_size: 2,
        page_delay: Duration::from_millis(1),
        poll_interval: Duration::from_millis(10),
        max_poll_wait: Duration::from_secs(5),
        retry: RetryConfig {
            max_attempts: 0,
            initial_delay: Duration::from_millis(1),
            jitter: false,
            ..RetryConfig::default()
        },
        ..Config::default()
    }
}

#[allow(clippy::expect_used)]
pub(crate) fn test_client(server: &MockServer, config: Config) -> RecordingClient {
    RecordingClient::with_base_url(
        Credentials::new("test-client", "test-secret", None),
        config,
        server.uri(),
    )
    .expect("client construction")
}

/// Mount a standard long-lived token response on the mock server
pub(crate) async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v2/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "test-token",
            "token_type": "bearer",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}
