//! Quote normalization
//!
//! Turns one key's `FetchOutcome` into typed `Quote` rows. Failed fetches
//! produce nothing; entries that do not deserialize or carry non-positive
//! prices are dropped one at a time.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::types::{FetchOutcome, QuoteRequestKey};

/// One exchange's quote for one market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub exchange: String,
    pub asset: String,
    pub currency: String,
    pub volume: f64,
    /// Unit price the exchange sells at
    pub ask: f64,
    /// Unit price the exchange buys at
    pub bid: f64,
    /// Cost of buying `volume`, fees included
    pub total_ask: f64,
    /// Proceeds of selling `volume`, fees included
    pub total_bid: f64,
    /// Provider timestamp (Unix seconds)
    pub observed_at_epoch: i64,
}

impl Quote {
    /// Provider timestamp as UTC, `None` if out of range
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.observed_at_epoch, 0).single()
    }

    /// Market identity used for joining: asset, currency and volume
    pub fn market(&self) -> MarketKey<'_> {
        MarketKey {
            asset: &self.asset,
            currency: &self.currency,
            volume_bits: self.volume.to_bits(),
        }
    }
}

/// Borrowed grouping key for quotes of the same market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarketKey<'a> {
    pub asset: &'a str,
    pub currency: &'a str,
    volume_bits: u64,
}

/// Provider record for one exchange
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeValues {
    ask: f64,
    bid: f64,
    total_ask: f64,
    total_bid: f64,
    #[serde(default)]
    time: f64,
}

impl ExchangeValues {
    fn is_usable(&self) -> bool {
        [self.ask, self.bid, self.total_ask, self.total_bid]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Normalize one key's fetch result into quote rows
pub fn normalize(key: &QuoteRequestKey, outcome: &FetchOutcome) -> Vec<Quote> {
    let raw = match outcome {
        FetchOutcome::Success(raw) => raw,
        FetchOutcome::Failure(_) => return Vec::new(),
    };

    let mut quotes = Vec::with_capacity(raw.len());
    for (exchange, value) in &raw.entries {
        let values: ExchangeValues = match serde_json::from_value(value.clone()) {
            Ok(v) => v,
            Err(e) => {
                debug!(key = %key, exchange = %exchange, error = %e, "Dropping malformed quote entry");
                continue;
            }
        };
        if !values.is_usable() {
            debug!(key = %key, exchange = %exchange, "Dropping quote entry with non-positive prices");
            continue;
        }

        quotes.push(Quote {
            exchange: exchange.clone(),
            asset: key.asset.clone(),
            currency: key.currency.clone(),
            volume: key.volume,
            ask: values.ask,
            bid: values.bid,
            total_ask: values.total_ask,
            total_bid: values.total_bid,
            observed_at_epoch: values.time as i64,
        });
    }
    quotes
}
