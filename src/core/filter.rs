//! Opportunity filter and ranker
//!
//! Keeps opportunities whose gain strictly exceeds the threshold and whose
//! buy side is not deny-listed, then sorts them by gain, best first. Deny-
//! listed venues may still show up as the sell side.

use super::matcher::Opportunity;

/// Threshold and buy-side deny list
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPolicy {
    /// Gain ratio an opportunity must exceed (0.04 = 4%)
    pub min_gain_ratio: f64,
    /// Lower-cased exchange names never used as buy side
    deny_buy_exchanges: Vec<String>,
}

impl FilterPolicy {
    pub fn new(min_gain_ratio: f64, deny_buy_exchanges: Vec<String>) -> Self {
        Self {
            min_gain_ratio,
            deny_buy_exchanges: deny_buy_exchanges
                .into_iter()
                .map(|name| name.trim().to_lowercase())
                .collect(),
        }
    }

    /// Case-insensitive deny-list lookup
    pub fn is_denied_buy(&self, exchange: &str) -> bool {
        let exchange = exchange.to_lowercase();
        self.deny_buy_exchanges.iter().any(|denied| *denied == exchange)
    }

    pub fn accepts(&self, opportunity: &Opportunity) -> bool {
        opportunity.gain_ratio > self.min_gain_ratio && !self.is_denied_buy(&opportunity.buy_exchange)
    }
}

/// Filter and rank by descending gain; ties keep input order
pub fn filter_and_rank(opportunities: Vec<Opportunity>, policy: &FilterPolicy) -> Vec<Opportunity> {
    let mut kept: Vec<Opportunity> = opportunities
        .into_iter()
        .filter(|opportunity| policy.accepts(opportunity))
        .collect();

    // sort_by is stable
    kept.sort_by(|a, b| b.gain_ratio.total_cmp(&a.gain_ratio));
    kept
}
