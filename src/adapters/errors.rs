//! Adapter error types
//!
//! `FetchError` describes why a single quote-API attempt failed. It is what the
//! retry loop inspects; once the attempt budget is spent it is folded into a
//! `FetchFailure` and never propagated. `NotifyError` is returned by notifiers
//! and only ever logged by the pipeline.

use thiserror::Error;

/// Longest body excerpt kept in error messages
const BODY_EXCERPT_LEN: usize = 200;

/// Failure of one HTTP attempt against the quote provider
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request could not be sent or timed out
    #[error("Transport failed: {0}")]
    Transport(String),

    /// Provider answered 429
    #[error("Rate limited (429)")]
    RateLimited,

    /// Provider answered with a non-200 status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 200 with nothing in it
    #[error("Empty response body")]
    EmptyBody,

    /// Body contains the provider's "invalid" marker
    #[error("Provider rejected request: {0}")]
    InvalidMarker(String),

    /// Body is not a JSON object
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// HTTP status observed for this attempt, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RateLimited => Some(429),
            FetchError::Status { status, .. } => Some(*status),
            FetchError::EmptyBody | FetchError::InvalidMarker(_) | FetchError::Malformed(_) => {
                Some(200)
            }
            FetchError::Transport(_) => None,
        }
    }
}

/// Failure to deliver an alert
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Transport(String),

    #[error("Messaging API rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Stdout write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Truncate a response body for logs and error messages
pub fn body_excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_LEN {
        return body.to_string();
    }
    let mut excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
    excerpt.push('…');
    excerpt
}
