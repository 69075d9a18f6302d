//! Adapter traits
//!
//! The pipeline only talks to the outside world through these two seams:
//! a `QuoteSource` that resolves a request key to a `FetchOutcome`, and a
//! `Notifier` that delivers one text message.

use async_trait::async_trait;

use crate::adapters::errors::NotifyError;
use crate::adapters::types::{FetchOutcome, QuoteRequestKey};

/// Source of raw per-exchange quotes
///
/// Implementations must not return errors: every failure mode is folded into
/// `FetchOutcome::Failure` so a bad key never aborts the tick.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self, key: &QuoteRequestKey) -> FetchOutcome;
}

/// "Send text message" sink
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short name used in logs (e.g., "telegram")
    fn name(&self) -> &'static str;

    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}
