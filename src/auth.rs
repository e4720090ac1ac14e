//! OAuth client-credentials authentication with token caching
//!
//! The authenticator exchanges the client id/secret for a bearer token and
//! caches it. A cached token is reused until shortly before its reported
//! expiry (the refresh margin, 300s by default), after which the next
//! authenticated call triggers exactly one refresh.

use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::types::TokenResponse;

/// Cached access token with its refresh deadline
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    /// Refresh margin already subtracted; the token is stale once `now >= expires_at`
    expires_at: Instant,
}

/// Exchanges client credentials for bearer tokens and caches them
///
/// Owned by [`RecordingClient`](crate::RecordingClient); the token never leaves
/// the authenticator except as the value of an `Authorization` header.
pub struct Authenticator {
    client_id: String,
    client_secret: String,
    base_url: String,
    http: reqwest::Client,
    refresh_margin: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl Authenticator {
    /// Create an authenticator for the given credentials and API base URL
    pub fn new(
        credentials: &Credentials,
        base_url: impl Into<String>,
        http: reqwest::Client,
        refresh_margin: Duration,
    ) -> Self {
        Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            base_url: base_url.into(),
            http,
            refresh_margin,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, refreshing it if the cached one is stale
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] when the OAuth endpoint rejects the credentials (401)
    /// - [`Error::Config`] when the endpoint does not exist (404, wrong region)
    /// - [`Error::UnexpectedStatus`] for any other non-200 response
    /// - [`Error::Network`] on transport failure or timeout
    pub async fn get_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    /// Perform the client-credentials exchange against the token endpoint
    async fn fetch_token(&self) -> Result<CachedToken> {
        let endpoint = "/api/v2/oauth/token";
        let url = format!("{}{}", self.base_url, endpoint);

        tracing::debug!(url = %url, "requesting OAuth token");
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let token: TokenResponse = response.json().await?;
                let lifetime =
                    Duration::from_secs(token.expires_in).saturating_sub(self.refresh_margin);
                tracing::info!(
                    expires_in = token.expires_in,
                    refresh_in = lifetime.as_secs(),
                    "obtained OAuth token"
                );
                Ok(CachedToken {
                    access_token: token.access_token,
                    expires_at: Instant::now() + lifetime,
                })
            }
            StatusCode::UNAUTHORIZED => {
                tracing::error!("OAuth token request rejected with 401");
                Err(Error::Auth(
                    "client id or client secret rejected by the token endpoint".into(),
                ))
            }
            StatusCode::NOT_FOUND => {
                tracing::error!(url = %url, "OAuth token endpoint not found");
                Err(Error::config_key(
                    "token endpoint not found; check the configured region",
                    crate::config::ENV_REGION,
                ))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(status = status.as_u16(), body = %body, "OAuth token request failed");
                Err(Error::UnexpectedStatus {
                    status: status.as_u16(),
                    endpoint: endpoint.into(),
                    body,
                })
            }
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Region;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials() -> Credentials {
        Credentials::new("test-client", "test-secret", Some(Region::UsEast1))
    }

    fn authenticator(base_url: &str, refresh_margin: Duration) -> Authenticator {
        Authenticator::new(
            &test_credentials(),
            base_url,
            reqwest::Client::new(),
            refresh_margin,
        )
    }

    fn token_response(access_token: &str, expires_in: u64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": expires_in,
        }))
    }

    #[tokio::test]
    async fn unexpired_token_is_reused_without_a_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(token_response("tok-1", 3600))
            .expect(1)
            .mount(&server)
            .await;

        let auth = authenticator(&server.uri(), Duration::from_secs(300));

        let first = auth.get_token().await.unwrap();
        let second = auth.get_token().await.unwrap();
        let third = auth.get_token().await.unwrap();

        assert_eq!(first, "tok-1");
        assert_eq!(second, "tok-1");
        assert_eq!(third, "tok-1");
    }

    #[tokio::test]
    async fn expired_token_triggers_exactly_one_refresh() {
        let server = MockServer::start().await;
        // expires_in equal to the refresh margin leaves a zero effective
        // lifetime, so the cached token is stale immediately.
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth/token"))
            .respond_with(token_response("tok", 300))
            .expect(2)
            .mount(&server)
            .await;

        let auth = authenticator(&server.uri(), Duration::from_secs(300));

        auth.get_token().await.unwrap();
        auth.get_token().await.unwrap();
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let auth = authenticator(&server.uri(), Duration::from_secs(300));
        let err = auth.get_token().await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_endpoint_maps_to_config_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth/token"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let auth = authenticator(&server.uri(), Duration::from_secs(300));
        let err = auth.get_token().await.unwrap_err();
        match err {
            Error::Config { key, .. } => {
                assert_eq!(key.as_deref(), Some(crate::config::ENV_REGION))
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_statuses_map_to_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth/token"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oauth backend down"))
            .mount(&server)
            .await;

        let auth = authenticator(&server.uri(), Duration::from_secs(300));
        let err = auth.get_token().await.unwrap_err();
        match err {
            Error::UnexpectedStatus { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "oauth backend down");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }
}
