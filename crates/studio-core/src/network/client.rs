//! HTTP client with rate limiting awareness.
//!
//! Provides a wrapper around reqwest with:
//! - A bounded request timeout
//! - Rate limit tracking from GitHub response headers
//! - Throttling when approaching the limit
//! - Status and JSON decoding mapped onto `StudioError`

use crate::config::NetworkConfig;
use crate::{Result, StudioError};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Rate limit state extracted from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    /// Remaining requests allowed.
    pub remaining: Option<u64>,
    /// Total request limit.
    pub limit: Option<u64>,
    /// Unix timestamp when the rate limit resets.
    pub reset: Option<u64>,
}

impl RateLimitState {
    /// Check if we should throttle requests.
    pub fn should_throttle(&self) -> bool {
        match (self.remaining, self.limit) {
            (Some(remaining), Some(limit)) if limit > 0 => {
                // Throttle when below 10% of limit
                let threshold = (limit as f64 * 0.1) as u64;
                remaining < threshold.max(1)
            }
            _ => false,
        }
    }

    /// Seconds until the limit resets, if known and in the future.
    pub fn secs_until_reset(&self) -> Option<u64> {
        let reset = self.reset?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        (reset > now).then(|| reset - now)
    }
}

/// HTTP client with rate limiting awareness.
pub struct HttpClient {
    client: Client,
    rate_limit_remaining: AtomicI64,
    rate_limit_limit: AtomicU64,
    rate_limit_reset: AtomicU64,
    timeout: Duration,
    throttle_delay: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| StudioError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e),
            })?;

        Ok(Self {
            client,
            rate_limit_remaining: AtomicI64::new(-1),
            rate_limit_limit: AtomicU64::new(0),
            rate_limit_reset: AtomicU64::new(0),
            timeout,
            throttle_delay: NetworkConfig::RATE_LIMIT_THROTTLE_DELAY,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the current rate limit state.
    pub fn rate_limit_state(&self) -> RateLimitState {
        let remaining = self.rate_limit_remaining.load(Ordering::SeqCst);
        let limit = self.rate_limit_limit.load(Ordering::SeqCst);
        let reset = self.rate_limit_reset.load(Ordering::SeqCst);
        RateLimitState {
            remaining: (remaining >= 0).then_some(remaining as u64),
            limit: (limit > 0).then_some(limit),
            reset: (reset > 0).then_some(reset),
        }
    }

    /// GET a URL and decode a JSON body.
    ///
    /// Non-success statuses are errors; the body is only decoded on 2xx.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.get_with_headers(url, headers).await?;
        let body = response.bytes().await.map_err(|e| self.map_send_error(url, e))?;

        serde_json::from_slice(&body).map_err(|e| StudioError::Json {
            message: format!("Failed to parse response from {}: {}", url, e),
            source: Some(e),
        })
    }

    /// Make a GET request with custom headers.
    pub async fn get_with_headers(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        self.maybe_throttle().await;

        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(url, e))?;

        self.update_rate_limits(&response);
        self.check_response_status(response, url)
    }

    // Internal methods

    fn map_send_error(&self, url: &str, err: reqwest::Error) -> StudioError {
        if err.is_timeout() {
            StudioError::Timeout(self.timeout)
        } else {
            StudioError::Network {
                message: format!("GET {} failed: {}", url, err),
                source: Some(err),
            }
        }
    }

    async fn maybe_throttle(&self) {
        let state = self.rate_limit_state();
        if state.should_throttle() {
            warn!(
                "Rate limit approaching (remaining: {:?}/{:?}), throttling for {:?}",
                state.remaining, state.limit, self.throttle_delay
            );
            tokio::time::sleep(self.throttle_delay).await;
        }
    }

    fn update_rate_limits(&self, response: &Response) {
        let headers = response.headers();
        let parse = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
        };

        if let Some(remaining) = parse("X-RateLimit-Remaining") {
            self.rate_limit_remaining
                .store(remaining.min(i64::MAX as u64) as i64, Ordering::SeqCst);
        }
        if let Some(limit) = parse("X-RateLimit-Limit") {
            self.rate_limit_limit.store(limit, Ordering::SeqCst);
        }
        if let Some(reset) = parse("X-RateLimit-Reset") {
            self.rate_limit_reset.store(reset, Ordering::SeqCst);
        }

        let state = self.rate_limit_state();
        if let (Some(remaining), Some(limit)) = (state.remaining, state.limit) {
            debug!("Rate limit: {}/{}", remaining, limit);
        }
    }

    fn check_response_status(&self, response: Response, url: &str) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let exhausted = status == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("X-RateLimit-Remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0");

        if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .or_else(|| self.rate_limit_state().secs_until_reset());

            return Err(StudioError::RateLimited {
                service: extract_domain(url),
                retry_after_secs: retry_after,
            });
        }

        Err(StudioError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
