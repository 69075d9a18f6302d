//! Opportunity matcher
//!
//! Self-cross-join of quotes per market: every ordered (buy, sell) pair of
//! quotes sharing asset, currency and volume is evaluated. A pair becomes an
//! `Opportunity` only when buying at the buy side's `total_ask` and selling at
//! the sell side's `total_bid` makes money. Self-pairs are evaluated like any
//! other pair; for a well-formed quote (`total_bid <= total_ask`) the strict
//! inequality rejects them.
//!
//! Quotes at different volumes never pair: their totals are for different
//! amounts of the asset.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::quote::{MarketKey, Quote};

/// A profitable two-leg trade across exchanges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub buy_exchange: String,
    pub sell_exchange: String,
    pub asset: String,
    pub currency: String,
    pub volume: f64,
    /// `total_ask` of the buy side
    pub buy_cost: f64,
    /// `total_bid` of the sell side
    pub sell_proceeds: f64,
    /// `sell_proceeds - buy_cost`
    pub spread: f64,
    /// `sell_proceeds / buy_cost - 1`
    pub gain_ratio: f64,
}

impl Opportunity {
    /// Evaluate buying on `buy` and selling on `sell`
    ///
    /// Returns `None` unless `buy.total_ask < sell.total_bid`.
    #[inline]
    #[must_use]
    pub fn evaluate(buy: &Quote, sell: &Quote) -> Option<Self> {
        let buy_cost = buy.total_ask;
        let sell_proceeds = sell.total_bid;
        if buy_cost >= sell_proceeds {
            return None;
        }

        Some(Self {
            buy_exchange: buy.exchange.clone(),
            sell_exchange: sell.exchange.clone(),
            asset: buy.asset.clone(),
            currency: buy.currency.clone(),
            volume: buy.volume,
            buy_cost,
            sell_proceeds,
            spread: sell_proceeds - buy_cost,
            gain_ratio: sell_proceeds / buy_cost - 1.0,
        })
    }
}

/// Group quotes by market, keeping first-appearance order of markets and rows
fn group_by_market(quotes: &[Quote]) -> Vec<Vec<&Quote>> {
    let mut index: HashMap<MarketKey<'_>, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Quote>> = Vec::new();

    for quote in quotes {
        let slot = *index.entry(quote.market()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(quote);
    }
    groups
}

/// All profitable ordered pairs within each market
///
/// Output order: market of first appearance, then buy row, then sell row.
/// O(n²) per market, where n is the number of exchanges quoting it.
pub fn match_opportunities(quotes: &[Quote]) -> Vec<Opportunity> {
    let mut opportunities = Vec::new();

    for group in group_by_market(quotes) {
        for buy in &group {
            for sell in &group {
                if let Some(opportunity) = Opportunity::evaluate(buy, sell) {
                    opportunities.push(opportunity);
                }
            }
        }
    }
    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(exchange: &str, asset: &str, total_ask: f64, total_bid: f64) -> Quote {
        Quote {
            exchange: exchange.to_string(),
            asset: asset.to_string(),
            currency: "ARS".to_string(),
            volume: 1.0,
            ask: total_ask,
            bid: total_bid,
            total_ask,
            total_bid,
            observed_at_epoch: 1_700_000_000,
        }
    }

    #[test]
    fn test_two_exchange_example() {
        let quotes = vec![quote("a", "BTC", 100.0, 90.0), quote("b", "BTC", 120.0, 110.0)];
        let opportunities = match_opportunities(&quotes);

        assert_eq!(opportunities.len(), 1);
        let opp = &opportunities[0];
        assert_eq!(opp.buy_exchange, "a");
        assert_eq!(opp.sell_exchange, "b");
        assert_eq!(opp.buy_cost, 100.0);
        assert_eq!(opp.sell_proceeds, 110.0);
        assert!((opp.spread - 10.0).abs() < 1e-9);
        assert!((opp.gain_ratio - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_single_exchange_group_yields_nothing() {
        let quotes = vec![quote("solo", "BTC", 100.0, 99.0)];
        assert!(match_opportunities(&quotes).is_empty());
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(match_opportunities(&[]).is_empty());
    }

    #[test]
    fn test_different_assets_never_join() {
        let quotes = vec![quote("a", "BTC", 100.0, 90.0), quote("b", "ETH", 120.0, 110.0)];
        assert!(match_opportunities(&quotes).is_empty());
    }

    #[test]
    fn test_different_currencies_never_join() {
        let mut usd = quote("b", "BTC", 120.0, 110.0);
        usd.currency = "USD".to_string();
        let quotes = vec![quote("a", "BTC", 100.0, 90.0), usd];
        assert!(match_opportunities(&quotes).is_empty());
    }

    #[test]
    fn test_both_directions_evaluated() {
        // a sells cheap and buys dear relative to b: both a->b and b->a profitable
        let quotes = vec![quote("a", "BTC", 100.0, 130.0), quote("b", "BTC", 120.0, 110.0)];
        let opportunities = match_opportunities(&quotes);

        let pairs: Vec<(&str, &str)> = opportunities
            .iter()
            .map(|o| (o.buy_exchange.as_str(), o.sell_exchange.as_str()))
            .collect();
        // a bids above its own ask, so a->a qualifies too
        assert_eq!(pairs, vec![("a", "a"), ("a", "b"), ("b", "a")]);
    }

    #[test]
    fn test_crossed_single_exchange_is_reported() {
        let quotes = vec![quote("glitch", "BTC", 100.0, 150.0)];
        let opportunities = match_opportunities(&quotes);

        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].buy_exchange, "glitch");
        assert_eq!(opportunities[0].sell_exchange, "glitch");
        assert!((opportunities[0].gain_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_different_volumes_never_join() {
        let mut half = quote("b", "BTC", 120.0, 110.0);
        half.volume = 0.5;
        let quotes = vec![quote("a", "BTC", 100.0, 90.0), half];
        assert!(match_opportunities(&quotes).is_empty());
    }

    #[test]
    fn test_equal_totals_not_profitable() {
        let quotes = vec![quote("a", "BTC", 100.0, 90.0), quote("b", "BTC", 120.0, 100.0)];
        assert!(match_opportunities(&quotes).is_empty());
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let quotes = vec![
            quote("x", "ETH", 10.0, 9.0),
            quote("a", "BTC", 100.0, 90.0),
            quote("y", "ETH", 12.0, 11.0),
            quote("b", "BTC", 120.0, 110.0),
        ];
        let assets: Vec<String> = match_opportunities(&quotes)
            .into_iter()
            .map(|o| o.asset)
            .collect();
        assert_eq!(assets, vec!["ETH".to_string(), "BTC".to_string()]);
    }

    // =========================================================================
    // Property-based tests (proptest)
    // =========================================================================
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_quotes() -> impl Strategy<Value = Vec<Quote>> {
            prop::collection::vec(
                (0usize..6, 0usize..2, 1.0f64..1000.0, 1.0f64..1000.0),
                0..12,
            )
            .prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (exchange, asset, total_ask, total_bid))| {
                        let mut q = quote(
                            &format!("ex{}", exchange),
                            ["BTC", "ETH"][asset],
                            total_ask,
                            total_bid,
                        );
                        q.observed_at_epoch = i as i64;
                        q
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn emitted_iff_profitable_pair_exists(quotes in arb_quotes()) {
                let opportunities = match_opportunities(&quotes);

                let mut expected = 0usize;
                for buy in &quotes {
                    for sell in &quotes {
                        if buy.asset == sell.asset
                            && buy.currency == sell.currency
                            && buy.total_ask < sell.total_bid
                        {
                            expected += 1;
                        }
                    }
                }
                prop_assert_eq!(opportunities.len(), expected);
            }

            #[test]
            fn gain_ratio_matches_definition(quotes in arb_quotes()) {
                for opp in match_opportunities(&quotes) {
                    prop_assert!(opp.buy_cost < opp.sell_proceeds);
                    prop_assert!(opp.gain_ratio > 0.0);
                    let recomputed = opp.sell_proceeds / opp.buy_cost - 1.0;
                    prop_assert!((opp.gain_ratio - recomputed).abs() < 1e-12);
                    prop_assert!((opp.spread - (opp.sell_proceeds - opp.buy_cost)).abs() < 1e-9);
                }
            }

            #[test]
            fn self_pair_reported_only_when_book_crossed(total_ask in 1.0f64..1e6, total_bid in 1.0f64..1e6) {
                let q = quote("solo", "BTC", total_ask, total_bid);
                let opportunities = match_opportunities(&[q]);
                prop_assert_eq!(opportunities.len(), usize::from(total_ask < total_bid));
            }

            #[test]
            fn well_formed_self_pair_fails_inequality(total_ask in 1.0f64..1e6, discount in 0.0f64..1.0) {
                let total_bid = total_ask * (1.0 - discount);
                let q = quote("solo", "BTC", total_ask, total_bid);
                prop_assert!(Opportunity::evaluate(&q, &q).is_none());
            }
        }
    }
}
