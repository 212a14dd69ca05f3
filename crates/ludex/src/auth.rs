//! Short-lived bearer credentials for sources that require OAuth.
//!
//! IGDB and Twitch both authenticate against the Twitch identity service
//! using the client-credentials grant. Each driver owns its own
//! [`TokenProvider`] instance; token state is never shared across sources
//! and is never persisted.

use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::http::{HttpMethod, HttpRequest, HttpTransport, url_with_params};

/// Default token endpoint for the Twitch identity service.
pub const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Safety margin subtracted from the token lifetime.
///
/// A token is treated as expiring once it is within this margin of its
/// actual expiry, so a long page fetch never straddles the boundary.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(300);

/// Errors raised by the token provider.
///
/// A failed exchange is fatal for the calling driver operation; it is
/// surfaced, not retried beyond the bounded transport retry.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token exchange transport failure: {0}")]
    Exchange(String),

    #[error("token exchange rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("token response could not be decoded: {0}")]
    Decode(String),
}

/// An access token held only in process memory.
#[derive(Debug, Clone)]
struct Credential {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Obtains and caches client-credentials bearer tokens.
///
/// `token()` returns the cached token while it is comfortably inside its
/// lifetime, otherwise performs the exchange and caches the result. Any
/// caller observing a 401 from the API must call [`TokenProvider::invalidate`]
/// and re-request, which models a token revoked mid-session.
pub struct TokenProvider {
    transport: Arc<dyn HttpTransport>,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<Credential>>,
}

impl TokenProvider {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::with_token_url(transport, TWITCH_TOKEN_URL, client_id, client_secret)
    }

    pub fn with_token_url(
        transport: Arc<dyn HttpTransport>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
        }
    }

    /// The OAuth client id, needed by callers that send a `Client-ID` header.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Return a valid access token, exchanging credentials if needed.
    pub async fn token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;

        if let Some(ref credential) = *cached {
            if credential.expires_at > Utc::now() {
                return Ok(credential.access_token.clone());
            }
        }

        let credential = self.exchange().await?;
        let token = credential.access_token.clone();
        *cached = Some(credential);
        Ok(token)
    }

    /// Drop the cached token so the next `token()` call re-exchanges.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        *cached = None;
        tracing::debug!("cached credential invalidated, next call will re-exchange");
    }

    /// Perform the client-credentials exchange.
    ///
    /// Transport-level failures are retried with bounded exponential
    /// backoff; a rejection from the identity service is not.
    async fn exchange(&self) -> Result<Credential, AuthError> {
        let url = url_with_params(
            &self.token_url,
            &[
                ("client_id", self.client_id.clone()),
                ("client_secret", self.client_secret.clone()),
                ("grant_type", "client_credentials".to_string()),
            ],
        );

        let operation = || async {
            let request = HttpRequest {
                method: HttpMethod::Post,
                url: url.clone(),
                headers: Vec::new(),
                body: Vec::new(),
            };
            self.transport
                .send(request)
                .await
                .map_err(|e| AuthError::Exchange(e.to_string()))
        };

        let response = operation
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(500))
                    .with_max_delay(Duration::from_secs(10))
                    .with_max_times(3)
                    .with_jitter(),
            )
            .when(|e| matches!(e, AuthError::Exchange(_)))
            .notify(|err, dur| {
                tracing::warn!(error = %err, retry_in_ms = dur.as_millis() as u64, "token exchange failed, retrying");
            })
            .await?;

        if !(200..300).contains(&response.status) {
            return Err(AuthError::Rejected {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let parsed: TokenResponse =
            serde_json::from_slice(&response.body).map_err(|e| AuthError::Decode(e.to_string()))?;

        let lifetime = Duration::from_secs(parsed.expires_in.max(0) as u64);
        let effective = lifetime.saturating_sub(EXPIRY_MARGIN);
        let expires_at = Utc::now()
            + chrono::Duration::from_std(effective).unwrap_or_else(|_| chrono::Duration::zero());

        tracing::info!(expires_at = %expires_at, "access token obtained");

        Ok(Credential {
            access_token: parsed.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;

    fn token_url() -> String {
        url_with_params(
            TWITCH_TOKEN_URL,
            &[
                ("client_id", "id".to_string()),
                ("client_secret", "secret".to_string()),
                ("grant_type", "client_credentials".to_string()),
            ],
        )
    }

    fn provider(transport: &MockTransport) -> TokenProvider {
        TokenProvider::new(Arc::new(transport.clone()), "id", "secret")
    }

    #[tokio::test]
    async fn token_is_cached_until_expiry() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Post,
            token_url(),
            r#"{"access_token":"abc","expires_in":3600,"token_type":"bearer"}"#,
        );

        let provider = provider(&transport);
        assert_eq!(provider.token().await.unwrap(), "abc");
        assert_eq!(provider.token().await.unwrap(), "abc");

        // Only one exchange was performed.
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn token_inside_margin_is_refreshed() {
        let transport = MockTransport::new();
        // expires_in below the safety margin: immediately considered expiring.
        transport.push_json(
            HttpMethod::Post,
            token_url(),
            r#"{"access_token":"first","expires_in":60}"#,
        );
        transport.push_json(
            HttpMethod::Post,
            token_url(),
            r#"{"access_token":"second","expires_in":3600}"#,
        );

        let provider = provider(&transport);
        assert_eq!(provider.token().await.unwrap(), "first");
        assert_eq!(provider.token().await.unwrap(), "second");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_re_exchange() {
        let transport = MockTransport::new();
        transport.push_json(
            HttpMethod::Post,
            token_url(),
            r#"{"access_token":"one","expires_in":3600}"#,
        );
        transport.push_json(
            HttpMethod::Post,
            token_url(),
            r#"{"access_token":"two","expires_in":3600}"#,
        );

        let provider = provider(&transport);
        assert_eq!(provider.token().await.unwrap(), "one");
        provider.invalidate().await;
        assert_eq!(provider.token().await.unwrap(), "two");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn rejected_exchange_surfaces_auth_failure() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            token_url(),
            crate::http::HttpResponse {
                status: 403,
                headers: Vec::new(),
                body: b"invalid client".to_vec(),
            },
        );

        let provider = provider(&transport);
        let err = provider.token().await.expect_err("exchange should fail");
        match err {
            AuthError::Rejected { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("invalid client"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
