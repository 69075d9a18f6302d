//! Quote provider client with retry and backoff
//!
//! Issues `GET {base}/api/{asset}/{currency}/{volume}` and accepts the reply
//! only when it is a 200 with a non-empty body that does not mention
//! "invalid" and parses as a JSON object. Everything else is a failed attempt
//! and goes through [`retry_with_backoff`]. Once the budget is spent the key
//! resolves to `FetchOutcome::Failure`; no error leaves this module.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::adapters::errors::{body_excerpt, FetchError};
use crate::adapters::traits::QuoteSource;
use crate::adapters::types::{FetchFailure, FetchOutcome, QuoteRequestKey, RawQuote};
use crate::core::backoff::{retry_with_backoff, RetryExhausted, RetryPolicy};
use crate::error::AppError;

/// Raw HTTP reply before any validation
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal GET transport so retry behaviour can be tested without a socket
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpReply, FetchError>;
}

/// reqwest-backed transport with a per-request timeout
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(request_timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("arb_alert/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to read body: {}", e)))?;

        Ok(HttpReply { status, body })
    }
}

/// Validate one reply and parse it into the exchange -> values mapping
pub fn parse_reply(reply: &HttpReply) -> Result<RawQuote, FetchError> {
    if reply.status == StatusCode::TOO_MANY_REQUESTS.as_u16() {
        return Err(FetchError::RateLimited);
    }
    if reply.status != StatusCode::OK.as_u16() {
        return Err(FetchError::Status {
            status: reply.status,
            body: body_excerpt(&reply.body),
        });
    }
    if reply.body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }
    if reply.body.to_lowercase().contains("invalid") {
        return Err(FetchError::InvalidMarker(body_excerpt(&reply.body)));
    }

    let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&reply.body)
        .map_err(|e| FetchError::Malformed(format!("{} - {}", e, body_excerpt(&reply.body))))?;

    Ok(RawQuote::new(entries))
}

/// Quote API client
pub struct QuoteApiClient<T: HttpTransport = ReqwestTransport> {
    base_url: String,
    transport: T,
    policy: RetryPolicy,
}

impl QuoteApiClient<ReqwestTransport> {
    /// Client over HTTP with the given per-request timeout
    pub fn http(
        base_url: impl Into<String>,
        request_timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, AppError> {
        Ok(Self::with_transport(
            base_url,
            ReqwestTransport::new(request_timeout)?,
            policy,
        ))
    }
}

impl<T: HttpTransport> QuoteApiClient<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T, policy: RetryPolicy) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            policy,
        }
    }

    /// Full request URL for a key
    pub fn url_for(&self, key: &QuoteRequestKey) -> String {
        format!("{}{}", self.base_url, key.path())
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn attempt(&self, url: &str) -> Result<RawQuote, FetchError> {
        let reply = self.transport.get(url).await?;
        parse_reply(&reply)
    }
}

#[async_trait]
impl<T: HttpTransport> QuoteSource for QuoteApiClient<T> {
    async fn fetch(&self, key: &QuoteRequestKey) -> FetchOutcome {
        let url = self.url_for(key);
        let label = key.to_string();

        match retry_with_backoff(&self.policy, &label, |_| self.attempt(&url)).await {
            Ok((raw, attempts)) => {
                debug!(
                    key = %key,
                    exchanges = raw.len(),
                    attempts,
                    "[FETCH] Quotes received"
                );
                FetchOutcome::Success(raw)
            }
            Err(RetryExhausted { attempts, last_error }) => {
                warn!(
                    key = %key,
                    attempts,
                    error = %last_error,
                    "[FETCH] Giving up on key for this tick"
                );
                FetchOutcome::Failure(FetchFailure {
                    attempts,
                    last_status: last_error.status(),
                    reason: last_error.to_string(),
                })
            }
        }
    }
}
