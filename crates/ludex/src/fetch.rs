//! One outbound call, one typed outcome.
//!
//! [`Fetcher`] paces a request through the source's [`RequestPacer`], sends
//! it once, and classifies the response. [`Fetcher::execute`] layers the
//! expected-condition handling on top as an explicit bounded loop: rate
//! limits are waited out indefinitely (they are normal, never an error),
//! an expired credential is refreshed and retried exactly once, and
//! everything else is returned to the driver as a typed error.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::auth::TokenProvider;
use crate::http::{HttpError, HttpRequest, HttpResponse, HttpTransport};
use crate::pace::RequestPacer;

/// Fallback wait when a 429 response carries no Retry-After header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Classified outcome of a single outbound call.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx.
    Ok(HttpResponse),
    /// 429; the caller must wait at least `retry_after` and retry.
    RateLimited { retry_after: Duration },
    /// 401; the caller must force-refresh credentials and retry once.
    AuthExpired,
    /// 404; semantics are source-specific (end of data vs skippable gap).
    NotFound,
    /// Timeouts, 5xx, network errors; retried against the driver's
    /// consecutive-error budget.
    Transient(String),
    /// Any other 4xx; malformed or unsupported request, not retried.
    Fatal { status: u16, message: String },
}

/// Error surface of [`Fetcher::execute`] after expected conditions have
/// been absorbed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not found")]
    NotFound,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("fatal request failure (status {status}): {message}")]
    Fatal { status: u16, message: String },
}

impl FetchError {
    /// Status code for fatal errors, 0 otherwise.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            FetchError::Fatal { status, .. } => *status,
            _ => 0,
        }
    }
}

/// Paced, classifying HTTP fetcher for one source.
///
/// Construct one per source so pacing and transport state are explicit and
/// never shared across sources.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    pacer: RequestPacer,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, spacing_ms: u64) -> Self {
        Self {
            transport,
            pacer: RequestPacer::from_millis(spacing_ms),
        }
    }

    /// Issue one paced call and classify the response.
    ///
    /// No side effects beyond the network call: checkpoints and sinks are
    /// never touched here.
    pub async fn send(&self, request: HttpRequest) -> FetchOutcome {
        self.pacer.wait().await;

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(HttpError::Timeout(message)) => return FetchOutcome::Transient(message),
            Err(err) => return FetchOutcome::Transient(err.to_string()),
        };

        match response.status {
            200..=299 => FetchOutcome::Ok(response),
            429 => {
                let retry_after = response
                    .header("retry-after")
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_RETRY_AFTER);
                FetchOutcome::RateLimited { retry_after }
            }
            401 => FetchOutcome::AuthExpired,
            404 => FetchOutcome::NotFound,
            500..=599 => FetchOutcome::Transient(format!(
                "server error {}: {}",
                response.status,
                String::from_utf8_lossy(&response.body)
            )),
            status => FetchOutcome::Fatal {
                status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            },
        }
    }

    /// Execute a request to completion through the expected conditions.
    ///
    /// Rate limiting is waited out and retried without bound (driver error
    /// budgets apply only to other classes). A 401 triggers exactly one
    /// forced credential refresh; a second 401 is reported as transient,
    /// matching a revoked-then-flapping credential. When `auth` is given,
    /// bearer and `Client-ID` headers are attached to every attempt.
    pub async fn execute(
        &self,
        request: HttpRequest,
        auth: Option<&TokenProvider>,
    ) -> Result<HttpResponse, FetchError> {
        let mut refreshed = false;

        loop {
            let mut attempt = request.clone();
            if let Some(provider) = auth {
                let token = provider
                    .token()
                    .await
                    .map_err(|e| FetchError::Auth(e.to_string()))?;
                attempt = attempt
                    .header("Client-ID", provider.client_id().to_string())
                    .header("Authorization", format!("Bearer {token}"));
            }

            match self.send(attempt).await {
                FetchOutcome::Ok(response) => return Ok(response),
                FetchOutcome::RateLimited { retry_after } => {
                    tracing::warn!(
                        url = %request.url,
                        wait_secs = retry_after.as_secs(),
                        "rate limited, waiting before retry"
                    );
                    tokio::time::sleep(retry_after).await;
                }
                FetchOutcome::AuthExpired => match auth {
                    Some(provider) if !refreshed => {
                        tracing::info!(url = %request.url, "credential expired mid-session, refreshing");
                        provider.invalidate().await;
                        refreshed = true;
                    }
                    Some(_) => {
                        return Err(FetchError::Transient(
                            "authentication expired again after refresh".to_string(),
                        ));
                    }
                    None => {
                        return Err(FetchError::Auth(
                            "unexpected 401 from unauthenticated source".to_string(),
                        ));
                    }
                },
                FetchOutcome::NotFound => return Err(FetchError::NotFound),
                FetchOutcome::Transient(message) => return Err(FetchError::Transient(message)),
                FetchOutcome::Fatal { status, message } => {
                    return Err(FetchError::Fatal { status, message });
                }
            }
        }
    }

    /// Execute a request and decode the JSON body.
    ///
    /// A body that fails to decode is a fatal outcome: the request reached
    /// the server and the response shape is wrong, so retrying cannot help.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        auth: Option<&TokenProvider>,
    ) -> Result<T, FetchError> {
        let response = self.execute(request, auth).await?;
        serde_json::from_slice(&response.body).map_err(|e| FetchError::Fatal {
            status: response.status,
            message: format!("response decode error: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse, MockTransport, url_with_params};

    fn fetcher(transport: &MockTransport) -> Fetcher {
        Fetcher::new(Arc::new(transport.clone()), 1)
    }

    #[tokio::test]
    async fn classifies_success() {
        let transport = MockTransport::new();
        transport.push_json(HttpMethod::Get, "https://api.test/ok", "{}");

        let outcome = fetcher(&transport)
            .send(HttpRequest::get("https://api.test/ok"))
            .await;
        assert!(matches!(outcome, FetchOutcome::Ok(_)));
    }

    #[tokio::test]
    async fn classifies_rate_limited_with_retry_after_header() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            "https://api.test/limited",
            HttpResponse {
                status: 429,
                headers: vec![("Retry-After".to_string(), "7".to_string())],
                body: Vec::new(),
            },
        );

        let outcome = fetcher(&transport)
            .send(HttpRequest::get("https://api.test/limited"))
            .await;
        match outcome {
            FetchOutcome::RateLimited { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(7));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limited_without_header_uses_default_wait() {
        let transport = MockTransport::new();
        transport.push_status(HttpMethod::Get, "https://api.test/limited", 429);

        let outcome = fetcher(&transport)
            .send(HttpRequest::get("https://api.test/limited"))
            .await;
        match outcome {
            FetchOutcome::RateLimited { retry_after } => {
                assert_eq!(retry_after, DEFAULT_RETRY_AFTER);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn classifies_auth_not_found_transient_and_fatal() {
        let transport = MockTransport::new();
        transport.push_status(HttpMethod::Get, "https://api.test/x", 401);
        transport.push_status(HttpMethod::Get, "https://api.test/x", 404);
        transport.push_status(HttpMethod::Get, "https://api.test/x", 503);
        transport.push_status(HttpMethod::Get, "https://api.test/x", 400);

        let fetcher = fetcher(&transport);
        let request = HttpRequest::get("https://api.test/x");

        assert!(matches!(
            fetcher.send(request.clone()).await,
            FetchOutcome::AuthExpired
        ));
        assert!(matches!(
            fetcher.send(request.clone()).await,
            FetchOutcome::NotFound
        ));
        assert!(matches!(
            fetcher.send(request.clone()).await,
            FetchOutcome::Transient(_)
        ));
        match fetcher.send(request).await {
            FetchOutcome::Fatal { status, .. } => assert_eq!(status, 400),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_transient() {
        let transport = MockTransport::new();
        // No response registered: the mock reports a transport error.
        let outcome = fetcher(&transport)
            .send(HttpRequest::get("https://api.test/unreachable"))
            .await;
        assert!(matches!(outcome, FetchOutcome::Transient(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn execute_waits_out_rate_limits_and_retries_same_request() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            "https://api.test/deals",
            HttpResponse {
                status: 429,
                headers: vec![("Retry-After".to_string(), "30".to_string())],
                body: Vec::new(),
            },
        );
        transport.push_json(HttpMethod::Get, "https://api.test/deals", r#"[1,2]"#);

        let result: Vec<i64> = fetcher(&transport)
            .execute_json(HttpRequest::get("https://api.test/deals"), None)
            .await
            .expect("retry after rate limit should succeed");

        assert_eq!(result, vec![1, 2]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn execute_refreshes_credentials_once_on_401() {
        let transport = MockTransport::new();
        let token_url = url_with_params(
            crate::auth::TWITCH_TOKEN_URL,
            &[
                ("client_id", "id".to_string()),
                ("client_secret", "secret".to_string()),
                ("grant_type", "client_credentials".to_string()),
            ],
        );
        transport.push_json(
            HttpMethod::Post,
            token_url.clone(),
            r#"{"access_token":"stale","expires_in":3600}"#,
        );
        transport.push_json(
            HttpMethod::Post,
            token_url,
            r#"{"access_token":"fresh","expires_in":3600}"#,
        );
        transport.push_status(HttpMethod::Get, "https://api.test/streams", 401);
        transport.push_json(HttpMethod::Get, "https://api.test/streams", "{}");

        let provider = TokenProvider::new(Arc::new(transport.clone()), "id", "secret");
        let response = fetcher(&transport)
            .execute(HttpRequest::get("https://api.test/streams"), Some(&provider))
            .await
            .expect("second attempt should carry the fresh token");
        assert_eq!(response.status, 200);

        let api_requests: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(|r| r.url.contains("streams"))
            .collect();
        assert_eq!(api_requests.len(), 2);
        assert!(
            api_requests[1]
                .headers
                .iter()
                .any(|(k, v)| k == "Authorization" && v == "Bearer fresh")
        );
    }

    #[tokio::test]
    async fn execute_reports_repeat_401_as_transient() {
        let transport = MockTransport::new();
        let token_url = url_with_params(
            crate::auth::TWITCH_TOKEN_URL,
            &[
                ("client_id", "id".to_string()),
                ("client_secret", "secret".to_string()),
                ("grant_type", "client_credentials".to_string()),
            ],
        );
        transport.push_json(
            HttpMethod::Post,
            token_url.clone(),
            r#"{"access_token":"a","expires_in":3600}"#,
        );
        transport.push_json(
            HttpMethod::Post,
            token_url,
            r#"{"access_token":"b","expires_in":3600}"#,
        );
        transport.push_status(HttpMethod::Get, "https://api.test/streams", 401);
        transport.push_status(HttpMethod::Get, "https://api.test/streams", 401);

        let provider = TokenProvider::new(Arc::new(transport.clone()), "id", "secret");
        let err = fetcher(&transport)
            .execute(HttpRequest::get("https://api.test/streams"), Some(&provider))
            .await
            .expect_err("second 401 should surface");
        assert!(matches!(err, FetchError::Transient(_)));
    }

    #[tokio::test]
    async fn execute_json_reports_decode_failure_as_fatal() {
        let transport = MockTransport::new();
        transport.push_json(HttpMethod::Get, "https://api.test/bad", "not json");

        let err = fetcher(&transport)
            .execute_json::<Vec<i64>>(HttpRequest::get("https://api.test/bad"), None)
            .await
            .expect_err("decode should fail");
        assert!(matches!(err, FetchError::Fatal { .. }));
    }
}
