//! Alert pipeline
//!
//! One tick = fetch every request key (bounded concurrency, results kept in
//! key order), normalize, match, filter/rank, then send one message per
//! surviving opportunity. Nothing inside a tick is fatal: failed keys are
//! dropped and failed sends are logged.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::adapters::traits::{Notifier, QuoteSource};
use crate::adapters::types::{FetchOutcome, QuoteRequestKey};
use crate::config::constants::DEFAULT_FETCH_CONCURRENCY;
use crate::core::alert::{format_none, format_opportunity};
use crate::core::filter::{filter_and_rank, FilterPolicy};
use crate::core::matcher::match_opportunities;
use crate::core::quote::{normalize, Quote};
use crate::core::scheduler::ScheduledTask;

/// Counters for one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick_id: Uuid,
    pub keys_ok: usize,
    pub keys_failed: usize,
    pub quotes: usize,
    /// Opportunities that survived filtering
    pub opportunities: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
}

pub struct Pipeline<S: QuoteSource, N: Notifier> {
    source: Arc<S>,
    notifier: Arc<N>,
    keys: Vec<QuoteRequestKey>,
    policy: FilterPolicy,
    notify_when_empty: bool,
    concurrency: usize,
}

impl<S: QuoteSource, N: Notifier> Pipeline<S, N> {
    pub fn new(
        source: Arc<S>,
        notifier: Arc<N>,
        keys: Vec<QuoteRequestKey>,
        policy: FilterPolicy,
    ) -> Self {
        Self {
            source,
            notifier,
            keys,
            policy,
            notify_when_empty: false,
            concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Send the "no opportunities" message on empty ticks
    pub fn with_notify_when_empty(mut self, enabled: bool) -> Self {
        self.notify_when_empty = enabled;
        self
    }

    /// Max in-flight fetches (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetch all keys, returning outcomes in key order
    async fn fetch_all(&self) -> Vec<(QuoteRequestKey, FetchOutcome)> {
        let source = Arc::clone(&self.source);
        stream::iter(self.keys.clone())
            .map(move |key| {
                let source = Arc::clone(&source);
                async move {
                    let outcome = source.fetch(&key).await;
                    (key, outcome)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Run one full fetch → alert cycle
    pub async fn run_tick(&self) -> TickReport {
        let tick_id = Uuid::new_v4();
        let started = Instant::now();
        info!(%tick_id, keys = self.keys.len(), "[TICK] Starting");

        let outcomes = self.fetch_all().await;

        let mut keys_ok = 0;
        let mut keys_failed = 0;
        let mut quotes: Vec<Quote> = Vec::new();
        for (key, outcome) in &outcomes {
            match outcome {
                FetchOutcome::Success(_) => keys_ok += 1,
                FetchOutcome::Failure(failure) => {
                    keys_failed += 1;
                    warn!(
                        %tick_id,
                        key = %key,
                        attempts = failure.attempts,
                        last_status = ?failure.last_status,
                        reason = %failure.reason,
                        "[FETCH] Key dropped for this tick"
                    );
                }
            }
            quotes.extend(normalize(key, outcome));
        }

        let matched = match_opportunities(&quotes);
        let matched_count = matched.len();
        let ranked = filter_and_rank(matched, &self.policy);
        debug!(
            %tick_id,
            quotes = quotes.len(),
            matched = matched_count,
            kept = ranked.len(),
            "[TICK] Matching done"
        );

        let messages: Vec<String> = if ranked.is_empty() {
            if self.notify_when_empty {
                vec![format_none()]
            } else {
                Vec::new()
            }
        } else {
            ranked.iter().map(format_opportunity).collect()
        };

        let mut alerts_sent = 0;
        let mut alerts_failed = 0;
        for text in &messages {
            match self.notifier.send(text).await {
                Ok(()) => {
                    alerts_sent += 1;
                    debug!(%tick_id, notifier = self.notifier.name(), "[ALERT] Sent");
                }
                Err(e) => {
                    alerts_failed += 1;
                    error!(%tick_id, notifier = self.notifier.name(), error = %e, "[ALERT] Send failed");
                }
            }
        }

        let report = TickReport {
            tick_id,
            keys_ok,
            keys_failed,
            quotes: quotes.len(),
            opportunities: ranked.len(),
            alerts_sent,
            alerts_failed,
        };
        info!(
            %tick_id,
            keys_ok = report.keys_ok,
            keys_failed = report.keys_failed,
            quotes = report.quotes,
            opportunities = report.opportunities,
            alerts_sent = report.alerts_sent,
            alerts_failed = report.alerts_failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[TICK] Done"
        );
        report
    }
}

#[async_trait]
impl<S: QuoteSource + 'static, N: Notifier + 'static> ScheduledTask for Pipeline<S, N> {
    fn name(&self) -> &str {
        "arbitrage-tick"
    }

    async fn run(&self) {
        self.run_tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::traits::tests::{MockQuoteSource, RecordingNotifier};
    use crate::core::alert::NO_OPPORTUNITIES_MESSAGE;
    use serde_json::json;

    fn btc_ars() -> QuoteRequestKey {
        QuoteRequestKey::new("BTC", "ARS", 1.0)
    }

    fn two_exchange_source() -> MockQuoteSource {
        MockQuoteSource::default().with(
            &btc_ars(),
            json!({
                "a": {"ask": 100.0, "bid": 90.0, "totalAsk": 100.0, "totalBid": 90.0, "time": 1},
                "b": {"ask": 120.0, "bid": 110.0, "totalAsk": 120.0, "totalBid": 110.0, "time": 1}
            }),
        )
    }

    fn pipeline(
        source: MockQuoteSource,
        notifier: Arc<RecordingNotifier>,
        keys: Vec<QuoteRequestKey>,
        min_gain_ratio: f64,
    ) -> Pipeline<MockQuoteSource, RecordingNotifier> {
        Pipeline::new(
            Arc::new(source),
            notifier,
            keys,
            FilterPolicy::new(min_gain_ratio, vec!["sesocio".to_string()]),
        )
    }

    #[tokio::test]
    async fn test_profitable_pair_sends_one_alert() {
        let notifier = Arc::new(RecordingNotifier::default());
        let p = pipeline(two_exchange_source(), notifier.clone(), vec![btc_ars()], 0.05);

        let report = p.run_tick().await;

        assert_eq!(report.keys_ok, 1);
        assert_eq!(report.quotes, 2);
        assert_eq!(report.opportunities, 1);
        assert_eq!(report.alerts_sent, 1);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("BUY BTC on A"));
        assert!(messages[0].contains("SELL on B"));
        assert!(messages[0].contains("10.00%"));
    }

    #[tokio::test]
    async fn test_threshold_above_gain_is_silent() {
        let notifier = Arc::new(RecordingNotifier::default());
        let p = pipeline(two_exchange_source(), notifier.clone(), vec![btc_ars()], 0.15);

        let report = p.run_tick().await;

        assert_eq!(report.opportunities, 0);
        assert_eq!(report.alerts_sent, 0);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_notify_when_empty_sends_sentinel() {
        let notifier = Arc::new(RecordingNotifier::default());
        let p = pipeline(two_exchange_source(), notifier.clone(), vec![btc_ars()], 0.15)
            .with_notify_when_empty(true);

        p.run_tick().await;

        assert_eq!(notifier.messages(), vec![NO_OPPORTUNITIES_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_failed_key_does_not_abort_tick() {
        let eth = QuoteRequestKey::new("ETH", "ARS", 1.0);
        let source = two_exchange_source().failing(&eth);
        let notifier = Arc::new(RecordingNotifier::default());
        let p = pipeline(source, notifier.clone(), vec![eth, btc_ars()], 0.05);

        let report = p.run_tick().await;

        assert_eq!(report.keys_failed, 1);
        assert_eq!(report.keys_ok, 1);
        assert_eq!(report.alerts_sent, 1);
    }

    #[tokio::test]
    async fn test_every_key_fetched_once_in_order() {
        let keys = QuoteRequestKey::enumerate(
            &["BTC".to_string(), "ETH".to_string()],
            &["ARS".to_string(), "USD".to_string()],
            &[1.0],
        );
        let source = Arc::new(MockQuoteSource::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let p = Pipeline::new(
            source.clone(),
            notifier,
            keys.clone(),
            FilterPolicy::new(0.04, Vec::new()),
        )
        .with_concurrency(1);

        let report = p.run_tick().await;

        let expected: Vec<String> = keys.iter().map(|k| k.path()).collect();
        assert_eq!(source.calls(), expected);
        assert_eq!(report.keys_ok, 4);
        assert_eq!(report.quotes, 0);
    }

    #[tokio::test]
    async fn test_send_failure_is_counted_not_fatal() {
        let source = MockQuoteSource::default().with(
            &btc_ars(),
            json!({
                "a": {"ask": 100.0, "bid": 90.0, "totalAsk": 100.0, "totalBid": 90.0, "time": 1},
                "b": {"ask": 120.0, "bid": 110.0, "totalAsk": 120.0, "totalBid": 110.0, "time": 1},
                "c": {"ask": 130.0, "bid": 125.0, "totalAsk": 130.0, "totalBid": 125.0, "time": 1}
            }),
        );
        let notifier = Arc::new(RecordingNotifier::failing_first(1));
        let p = pipeline(source, notifier.clone(), vec![btc_ars()], 0.05);

        let report = p.run_tick().await;

        // a->c (25%), a->b (10%), b->c (4.17%, below threshold)
        assert_eq!(report.opportunities, 2);
        assert_eq!(report.alerts_failed, 1);
        assert_eq!(report.alerts_sent, 1);
        assert!(notifier.messages()[0].contains("SELL on B"));
    }

    #[tokio::test]
    async fn test_alerts_sent_best_gain_first() {
        let source = MockQuoteSource::default().with(
            &btc_ars(),
            json!({
                "a": {"ask": 100.0, "bid": 90.0, "totalAsk": 100.0, "totalBid": 90.0, "time": 1},
                "b": {"ask": 120.0, "bid": 110.0, "totalAsk": 120.0, "totalBid": 110.0, "time": 1},
                "c": {"ask": 130.0, "bid": 125.0, "totalAsk": 130.0, "totalBid": 125.0, "time": 1}
            }),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let p = pipeline(source, notifier.clone(), vec![btc_ars()], 0.05);

        p.run_tick().await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("SELL on C"));
        assert!(messages[1].contains("SELL on B"));
    }

    #[tokio::test]
    async fn test_denied_buy_side_not_alerted() {
        let source = MockQuoteSource::default().with(
            &btc_ars(),
            json!({
                "sesocio": {"ask": 50.0, "bid": 45.0, "totalAsk": 50.0, "totalBid": 45.0, "time": 1},
                "b": {"ask": 120.0, "bid": 110.0, "totalAsk": 120.0, "totalBid": 110.0, "time": 1}
            }),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let p = pipeline(source, notifier.clone(), vec![btc_ars()], 0.05);

        let report = p.run_tick().await;
        assert_eq!(report.opportunities, 0);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_runs_as_scheduled_task() {
        let notifier = Arc::new(RecordingNotifier::default());
        let p = pipeline(two_exchange_source(), notifier.clone(), vec![btc_ars()], 0.05);

        assert_eq!(ScheduledTask::name(&p), "arbitrage-tick");
        ScheduledTask::run(&p).await;
        assert_eq!(notifier.messages().len(), 1);
    }
}
