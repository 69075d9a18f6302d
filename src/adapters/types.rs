//! Wire-level types shared by the quote adapter and the pipeline

use serde::{Deserialize, Serialize};

// =============================================================================
// Request keys
// =============================================================================

/// One quote-API call: asset, fiat/quote currency and requested volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequestKey {
    /// Asset symbol (e.g., "BTC")
    pub asset: String,
    /// Currency the asset is priced in (e.g., "ARS")
    pub currency: String,
    /// Volume of the asset the totals are computed for
    pub volume: f64,
}

impl QuoteRequestKey {
    pub fn new(asset: impl Into<String>, currency: impl Into<String>, volume: f64) -> Self {
        Self {
            asset: asset.into(),
            currency: currency.into(),
            volume,
        }
    }

    /// Request path on the provider, e.g. `/api/BTC/ARS/1`
    pub fn path(&self) -> String {
        format!("/api/{}/{}/{}", self.asset, self.currency, self.volume)
    }

    /// Cartesian product of assets × currencies × volumes, in that nesting order
    pub fn enumerate(assets: &[String], currencies: &[String], volumes: &[f64]) -> Vec<Self> {
        let mut keys = Vec::with_capacity(assets.len() * currencies.len() * volumes.len());
        for asset in assets {
            for currency in currencies {
                for &volume in volumes {
                    keys.push(Self::new(asset.clone(), currency.clone(), volume));
                }
            }
        }
        keys
    }
}

impl std::fmt::Display for QuoteRequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.asset, self.currency, self.volume)
    }
}

// =============================================================================
// Fetch results
// =============================================================================

/// Successful provider response: exchange name -> raw values record
///
/// Values are kept as JSON so malformed entries can be dropped one by one
/// during normalization. Entries are ordered by exchange name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuote {
    pub entries: serde_json::Map<String, serde_json::Value>,
}

impl RawQuote {
    pub fn new(entries: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Why a key produced no data this tick
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    /// Attempts actually performed
    pub attempts: u32,
    /// Last HTTP status seen, `None` when no response was ever received
    pub last_status: Option<u16>,
    /// Last error message (body excerpt included)
    pub reason: String,
}

/// Tagged fetch result, resolved before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(RawQuote),
    Failure(FetchFailure),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_path_is_deterministic() {
        let key = QuoteRequestKey::new("BTC", "ARS", 1.0);
        assert_eq!(key.path(), "/api/BTC/ARS/1");

        let fractional = QuoteRequestKey::new("ETH", "USD", 0.5);
        assert_eq!(fractional.path(), "/api/ETH/USD/0.5");
    }

    #[test]
    fn test_enumerate_is_cartesian_product() {
        let assets = vec!["BTC".to_string(), "ETH".to_string()];
        let currencies = vec!["ARS".to_string(), "USD".to_string()];
        let keys = QuoteRequestKey::enumerate(&assets, &currencies, &[1.0, 2.0]);

        assert_eq!(keys.len(), 8);
        assert_eq!(keys[0], QuoteRequestKey::new("BTC", "ARS", 1.0));
        assert_eq!(keys[1], QuoteRequestKey::new("BTC", "ARS", 2.0));
        assert_eq!(keys[7], QuoteRequestKey::new("ETH", "USD", 2.0));
    }

    #[test]
    fn test_empty_raw_quote_is_still_success() {
        let outcome = FetchOutcome::Success(RawQuote::default());
        assert!(outcome.is_success());
        if let FetchOutcome::Success(raw) = outcome {
            assert!(raw.is_empty());
        }
    }
}
