//! Rate-limited fetch client for the stats API.
//!
//! One call issues one authenticated GET against a named endpoint and
//! classifies the outcome into a tagged [`FetchOutcome`] that the
//! orchestrator inspects explicitly. Errors are never used as retry control
//! flow.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::Settings;
use crate::endpoints::{stats_headers, Endpoint, USER_AGENT};

/// Classified outcome of a single fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Parsed JSON body.
    Success(Value),
    /// Upstream signaled too many requests; the caller should back off
    /// exponentially and retry the same unit.
    RateLimited,
    /// Access denied. Fatal: further requests would also fail and worsen the
    /// client's IP reputation.
    Forbidden,
    /// The call exceeded the deadline. Fatal: the upstream intentionally
    /// throttles slow clients and continuing risks a ban.
    Timeout,
    /// Any other HTTP error status; the unit is skipped, the run continues.
    Http(u16),
    /// Response body was not the expected JSON; skippable.
    Malformed(String),
    /// Connection-level failure; skippable.
    Network(String),
}

impl FetchOutcome {
    /// Whether this outcome must terminate the whole run. 503 is the
    /// upstream's server-side throttle signal and is treated like a timeout.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Forbidden | Self::Timeout | Self::Http(503)
        )
    }
}

impl std::fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success(_) => write!(f, "success"),
            Self::RateLimited => write!(f, "rate limited (HTTP 429)"),
            Self::Forbidden => write!(f, "access denied (HTTP 403)"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Http(status) => write!(f, "HTTP {}", status),
            Self::Malformed(e) => write!(f, "malformed response: {}", e),
            Self::Network(e) => write!(f, "network error: {}", e),
        }
    }
}

/// Error constructing the HTTP client.
#[derive(Debug, thiserror::Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ClientError(#[from] reqwest::Error);

/// The upstream-API seam: one fetch per named endpoint and parameter set.
///
/// The orchestrator is written against this trait so tests can script an
/// upstream without a network.
#[async_trait]
pub trait StatsApi: Send + Sync {
    async fn fetch(&self, endpoint: Endpoint, params: &[(String, String)]) -> FetchOutcome;
}

/// HTTP client with spoofed browser headers and a fixed per-request timeout.
pub struct StatsClient {
    http: reqwest::Client,
}

impl StatsClient {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(stats_headers())
            .gzip(true)
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl StatsApi for StatsClient {
    async fn fetch(&self, endpoint: Endpoint, params: &[(String, String)]) -> FetchOutcome {
        let url = endpoint.url();
        debug!(endpoint = endpoint.path(), "fetching");

        let response = match self.http.get(&url).query(params).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return FetchOutcome::Timeout,
            Err(e) => return FetchOutcome::Network(e.to_string()),
        };

        let status = response.status();
        match status.as_u16() {
            200..=299 => {}
            403 => return FetchOutcome::Forbidden,
            429 => return FetchOutcome::RateLimited,
            code => return FetchOutcome::Http(code),
        }

        match response.json::<Value>().await {
            Ok(body) => FetchOutcome::Success(body),
            Err(e) if e.is_timeout() => FetchOutcome::Timeout,
            Err(e) => FetchOutcome::Malformed(e.to_string()),
        }
    }
}
