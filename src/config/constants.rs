//! Application constants and configuration defaults
//!
//! Defaults for every tunable live here. A few values can also be overridden
//! through environment variables, which take precedence over the YAML file.

use std::time::Duration;

use super::types::AppConfig;

// =============================================================================
// Quote provider
// =============================================================================

/// Default quote provider base URL
pub const DEFAULT_QUOTE_API_BASE_URL: &str = "https://criptoya.com";

/// Assets queried by default
pub const DEFAULT_ASSETS: &[&str] = &["BTC", "ETH", "DAI", "USDT", "USDC"];

/// Currencies queried by default
pub const DEFAULT_CURRENCIES: &[&str] = &["ARS", "USD"];

/// Volumes queried by default
pub const DEFAULT_VOLUMES: &[f64] = &[1.0];

// =============================================================================
// Fetch & retry
// =============================================================================

/// Attempts per key and tick before the key is skipped
pub const DEFAULT_MAX_FETCH_ATTEMPTS: u32 = 10;

/// Backoff unit: delay before retry n is `unit × (2^n + jitter)`
pub const DEFAULT_BACKOFF_UNIT_MS: u64 = 1000;

/// Per-request HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Keys fetched in parallel within one tick
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

// =============================================================================
// Alerts
// =============================================================================

/// Minimum gain ratio (0.04 = 4%)
pub const DEFAULT_MIN_GAIN_RATIO: f64 = 0.04;

/// Exchanges never used as the buy side
pub const DEFAULT_DENY_BUY_EXCHANGES: &[&str] = &["sesocio"];

/// Default messaging API base URL
pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

// =============================================================================
// Scheduling
// =============================================================================

/// Pipeline interval (one tick per minute)
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 60;

/// Total run duration (5h55m, just under a 6h runner limit)
pub const DEFAULT_RUN_DURATION_SECS: u64 = 5 * 3600 + 55 * 60;

// =============================================================================
// Environment overrides
// =============================================================================

/// Minimum gain ratio from `MIN_GAIN_PERCENT` (a ratio despite the name)
///
/// Returns `None` when unset or unparsable; an unparsable value is logged.
pub fn min_gain_ratio_override() -> Option<f64> {
    let raw = std::env::var("MIN_GAIN_PERCENT").ok()?;
    parse_min_gain_ratio(&raw)
}

fn parse_min_gain_ratio(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(ratio) => Some(ratio),
        Err(e) => {
            tracing::warn!(
                value = %raw,
                error = %e,
                "[CONFIG] Ignoring unparsable MIN_GAIN_PERCENT, keeping configured threshold"
            );
            None
        }
    }
}

/// Quote provider URL from `QUOTE_API_BASE_URL`
pub fn quote_api_base_url_override() -> Option<String> {
    std::env::var("QUOTE_API_BASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Messaging API base URL (default: Telegram)
///
/// Environment variable: `TELEGRAM_API_BASE_URL`
pub fn telegram_api_base_url() -> String {
    std::env::var("TELEGRAM_API_BASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE_URL.to_string())
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Print the effective configuration (for startup logs)
pub fn log_configuration(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Market:");
    tracing::info!("  - Assets: {:?}", config.market.assets);
    tracing::info!("  - Currencies: {:?}", config.market.currencies);
    tracing::info!("  - Volumes: {:?}", config.market.volumes);

    tracing::info!("Fetch:");
    tracing::info!("  - Base URL: {}", config.fetch.base_url);
    tracing::info!("  - Max attempts: {}", config.fetch.max_attempts);
    tracing::info!("  - Backoff unit: {:?}", config.fetch.backoff_unit());
    tracing::info!("  - Request timeout: {:?}", config.fetch.request_timeout());
    tracing::info!("  - Concurrency: {}", config.fetch.concurrency);

    tracing::info!("Alerts:");
    tracing::info!("  - Min gain ratio: {:.4}", config.alerts.min_gain_ratio);
    tracing::info!("  - Deny-listed buy exchanges: {:?}", config.alerts.deny_buy_exchanges);
    tracing::info!("  - Notify when empty: {}", config.alerts.notify_when_empty);

    tracing::info!("Schedule:");
    tracing::info!("  - Tick interval: {:?}", config.schedule.interval());
    tracing::info!("  - Run duration: {:?}", config.schedule.run_duration());
    tracing::info!("==================================");
}

/// Convenience for seconds-based settings
pub(crate) fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}
