//! Exponential backoff with jitter
//!
//! Delay before retry `n` (0-based) is `unit × (2^n + U(0,1))`. With the
//! default unit of one second that is 1-2s, 2-3s, 4-5s, ... which spreads out
//! bursts against a rate-limited API. The policy is plain data so every key
//! gets its own budget; nothing here is shared across calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::config::constants::{DEFAULT_BACKOFF_UNIT_MS, DEFAULT_MAX_FETCH_ATTEMPTS};

/// Exponent ceiling so `2^n` stays representable for absurd attempt counts
const MAX_BACKOFF_EXPONENT: u32 = 20;

/// Retry budget and delay scale
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Multiplier applied to `2^n + jitter`
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_FETCH_ATTEMPTS,
            backoff_unit: Duration::from_millis(DEFAULT_BACKOFF_UNIT_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts,
            backoff_unit,
        }
    }

    /// Policy that retries without sleeping
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Delay after failed attempt `attempt`, with a fresh random jitter
    pub fn delay(&self, attempt: u32) -> Duration {
        let jitter: f64 = rand::thread_rng().gen_range(0.0..1.0);
        self.delay_with_jitter(attempt, jitter)
    }

    /// Deterministic variant of [`delay`](Self::delay); `jitter` is clamped to [0, 1]
    pub fn delay_with_jitter(&self, attempt: u32, jitter: f64) -> Duration {
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
        let factor = f64::from(1u32 << exponent) + jitter.clamp(0.0, 1.0);
        self.backoff_unit.mul_f64(factor)
    }
}

/// Last error after the budget ran out
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` until it succeeds or the attempt budget is spent
///
/// `operation` receives the 0-based attempt number. On success returns the
/// value and the number of attempts it took. No sleep follows the final
/// failed attempt.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<(T, u32), RetryExhausted<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(target_label = label, attempts = attempt + 1, "[FETCH] Succeeded after retry");
                }
                return Ok((value, attempt + 1));
            }
            Err(e) => {
                let performed = attempt + 1;
                if performed >= max_attempts {
                    return Err(RetryExhausted {
                        attempts: performed,
                        last_error: e,
                    });
                }

                let delay = policy.delay(attempt);
                warn!(
                    target_label = label,
                    attempt = performed,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "[FETCH] Attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
