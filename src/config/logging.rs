//! Logging configuration module
//!
//! Provides configurable JSON/Pretty logging output and a wrapper for
//! logging secrets.
//!
//! # Usage
//! ```rust,ignore
//! use arb_alert::config::logging::init_logging;
//! init_logging();
//! ```
//!
//! # Environment Variables
//! - `LOG_FORMAT`: Output format - `json` (default) or `pretty`
//! - `RUST_LOG`: Log level filter (default: `info`)

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Characters of a secret kept visible before the redaction marker
const VISIBLE_PREFIX_LEN: usize = 4;

/// Secrets shorter than this are fully redacted
const MIN_PARTIAL_REDACT_LEN: usize = 8;

/// Initialize logging with configurable format
///
/// Reads `LOG_FORMAT` from environment:
/// - `json` (default): Machine-parseable JSON output for production
/// - `pretty`: Human-readable output for development
///
/// Also respects `RUST_LOG` for log level filtering (default: `info`).
/// Safe to call twice; the second call is a no-op.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if is_pretty_format(std::env::var("LOG_FORMAT").ok().as_deref()) {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .pretty()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// `pretty` selects human-readable output, anything else means JSON
fn is_pretty_format(value: Option<&str>) -> bool {
    value == Some("pretty")
}

/// Wrapper for sensitive data that should be redacted in logs
///
/// Shows the first few characters followed by `...REDACTED`, or only
/// `REDACTED` for short values.
#[derive(Clone, Copy)]
pub struct SanitizedValue<'a>(&'a str);

impl<'a> SanitizedValue<'a> {
    pub fn new(value: &'a str) -> Self {
        Self(value)
    }
}

impl fmt::Display for SanitizedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.chars().count() < MIN_PARTIAL_REDACT_LEN {
            return write!(f, "REDACTED");
        }
        let prefix: String = self.0.chars().take(VISIBLE_PREFIX_LEN).collect();
        write!(f, "{}...REDACTED", prefix)
    }
}

impl fmt::Debug for SanitizedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}
