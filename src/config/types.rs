//! Configuration types
//!
//! Every section has serde defaults, so an empty YAML document (or no file
//! at all) yields the stock configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::types::QuoteRequestKey;
use crate::core::backoff::RetryPolicy;
use crate::core::filter::FilterPolicy;
use crate::error::AppError;

use super::constants::{
    secs, DEFAULT_ASSETS, DEFAULT_BACKOFF_UNIT_MS, DEFAULT_CURRENCIES, DEFAULT_DENY_BUY_EXCHANGES,
    DEFAULT_FETCH_CONCURRENCY, DEFAULT_MAX_FETCH_ATTEMPTS, DEFAULT_MIN_GAIN_RATIO,
    DEFAULT_QUOTE_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RUN_DURATION_SECS,
    DEFAULT_TICK_INTERVAL_SECS, DEFAULT_VOLUMES,
};

// ============================================================================
// Configuration Structs
// ============================================================================

/// Which markets are polled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Asset symbols (e.g., BTC, ETH)
    pub assets: Vec<String>,
    /// Currency symbols (e.g., ARS, USD)
    pub currencies: Vec<String>,
    /// Volumes the provider computes totals for
    pub volumes: Vec<f64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            assets: DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect(),
            currencies: DEFAULT_CURRENCIES.iter().map(|s| s.to_string()).collect(),
            volumes: DEFAULT_VOLUMES.to_vec(),
        }
    }
}

impl MarketConfig {
    /// Request keys for every configured (asset, currency, volume)
    pub fn request_keys(&self) -> Vec<QuoteRequestKey> {
        QuoteRequestKey::enumerate(&self.assets, &self.currencies, &self.volumes)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.assets.is_empty() {
            return Err(AppError::Config("market.assets cannot be empty".to_string()));
        }
        if self.currencies.is_empty() {
            return Err(AppError::Config("market.currencies cannot be empty".to_string()));
        }
        if self.volumes.is_empty() {
            return Err(AppError::Config("market.volumes cannot be empty".to_string()));
        }
        if let Some(symbol) = self
            .assets
            .iter()
            .chain(self.currencies.iter())
            .find(|s| s.trim().is_empty() || s.contains('/'))
        {
            return Err(AppError::Config(format!(
                "market symbols must be non-empty and contain no '/' (got {:?})",
                symbol
            )));
        }
        if let Some(volume) = self.volumes.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(AppError::Config(format!(
                "market.volumes must be > 0 (got {})",
                volume
            )));
        }
        Ok(())
    }
}

/// Quote provider access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Provider base URL (without `/api`)
    pub base_url: String,
    /// Attempts per key and tick
    pub max_attempts: u32,
    /// Backoff unit in milliseconds
    pub backoff_unit_ms: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Keys fetched in parallel
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUOTE_API_BASE_URL.to_string(),
            max_attempts: DEFAULT_MAX_FETCH_ATTEMPTS,
            backoff_unit_ms: DEFAULT_BACKOFF_UNIT_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

impl FetchConfig {
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff_unit())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "fetch.base_url must be an http(s) URL (got {})",
                self.base_url
            )));
        }
        if self.max_attempts == 0 {
            return Err(AppError::Config("fetch.max_attempts must be >= 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config("fetch.request_timeout_secs must be >= 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(AppError::Config("fetch.concurrency must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// Alerting policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum gain ratio an opportunity must exceed (0.04 = 4%)
    pub min_gain_ratio: f64,
    /// Exchanges excluded as buy side
    pub deny_buy_exchanges: Vec<String>,
    /// Send a "no opportunities" message on empty ticks
    pub notify_when_empty: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            min_gain_ratio: DEFAULT_MIN_GAIN_RATIO,
            deny_buy_exchanges: DEFAULT_DENY_BUY_EXCHANGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            notify_when_empty: false,
        }
    }
}

impl AlertConfig {
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::new(self.min_gain_ratio, self.deny_buy_exchanges.clone())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        // gain_ratio is always > -1, and a 1000% spread is a data error
        if !self.min_gain_ratio.is_finite()
            || self.min_gain_ratio <= -1.0
            || self.min_gain_ratio >= 10.0
        {
            return Err(AppError::Config(format!(
                "alerts.min_gain_ratio must be in (-1, 10) (got {})",
                self.min_gain_ratio
            )));
        }
        Ok(())
    }
}

/// Run loop timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between the end of one tick and the start of the next
    pub interval_secs: u64,
    /// Stop scheduling ticks after this many seconds
    pub run_duration_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            run_duration_secs: DEFAULT_RUN_DURATION_SECS,
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        secs(self.interval_secs)
    }

    pub fn run_duration(&self) -> Duration {
        secs(self.run_duration_secs)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.interval_secs == 0 {
            return Err(AppError::Config("schedule.interval_secs must be >= 1".to_string()));
        }
        if self.run_duration_secs == 0 {
            return Err(AppError::Config("schedule.run_duration_secs must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// Root application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub fetch: FetchConfig,
    pub alerts: AlertConfig,
    pub schedule: ScheduleConfig,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        self.market.validate()?;
        self.fetch.validate()?;
        self.alerts.validate()?;
        self.schedule.validate()?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
