//! HTTP transport abstraction and retry policy
//!
//! `RetryPolicy` wraps any `HttpTransport` with bounded retries and
//! exponential backoff. It knows nothing about the payload being fetched,
//! so it can be exercised against a mocked transport.

use std::time::Duration;

use reqwest::{header::RETRY_AFTER, Client as HttpClient, Method};

use crate::error::{AppError, AppResult};

/// Statuses that are worth retrying
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Upper bound for a single backoff sleep, including `Retry-After` hints
pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Outgoing request as seen by the retry loop
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
        }
    }
}

/// Status, optional `Retry-After` hint and body of a completed exchange
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub retry_after: Option<Duration>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below the HTTP layer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    fn is_transient(&self) -> bool {
        matches!(self, TransportError::Timeout(_) | TransportError::Connect(_))
    }
}

/// Sends a single request with a per-attempt timeout
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: &HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}

/// `HttpTransport` backed by a shared reqwest client
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    pub fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Maps a reqwest failure, dropping the request URL (it carries the key)
    fn classify(error: reqwest::Error) -> TransportError {
        let error = error.without_url();
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .http_client
            .request(request.method.clone(), &request.url)
            .timeout(timeout)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response.text().await.map_err(Self::classify)?;

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub retryable_statuses: Vec<u16>,
    /// Delay before the first retry; doubles for each following retry
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    /// Timeout applied to each attempt separately
    pub timeout: Duration,
    /// Methods that may be replayed
    pub allowed_methods: Vec<Method>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retryable_statuses: RETRYABLE_STATUSES.to_vec(),
            backoff_base: Duration::from_secs(1),
            backoff_max: DEFAULT_BACKOFF_MAX,
            timeout: Duration::from_secs(20),
            allowed_methods: vec![Method::HEAD, Method::GET, Method::OPTIONS],
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): base, 2·base, 4·base, ...
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff_base
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.backoff_max)
            .min(self.backoff_max)
    }

    fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    fn allows(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    /// Sends `request`, retrying transient failures within the budget
    ///
    /// Returns the first successful (2xx) response. A non-retryable status is
    /// an `ExternalApi` error; an exhausted budget is `TransientFetch`.
    pub async fn execute(
        &self,
        transport: &dyn HttpTransport,
        request: &HttpRequest,
    ) -> AppResult<HttpResponse> {
        let replayable = self.allows(&request.method);
        let mut retry = 0u32;

        loop {
            let outcome = transport.send(request, self.timeout).await;

            let (reason, hint) = match outcome {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) if self.is_retryable_status(response.status) => (
                    format!("status {}", response.status),
                    response.retry_after,
                ),
                Ok(response) => {
                    return Err(AppError::ExternalApi(format!(
                        "API returned status {}: {}",
                        response.status, response.body
                    )));
                }
                Err(e) if e.is_transient() => (e.to_string(), None),
                Err(e) => return Err(AppError::ExternalApi(e.to_string())),
            };

            if !replayable {
                return Err(AppError::TransientFetch(format!(
                    "{} on non-idempotent {} request",
                    reason, request.method
                )));
            }

            if retry >= self.max_retries {
                return Err(AppError::TransientFetch(format!(
                    "{} after {} retries",
                    reason, retry
                )));
            }

            retry += 1;
            let delay = hint
                .map(|d| d.min(self.backoff_max))
                .unwrap_or_else(|| self.backoff_delay(retry));

            tracing::warn!(
                reason = %reason,
                retry = retry,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Transient failure, retrying"
            );

            tokio::time::sleep(delay).await;
        }
    }
}
