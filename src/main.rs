//! Arbitrage alert bot entry point
//!
//! 1. Loads `.env`, logging and configuration
//! 2. Builds the quote-API client and the alert sink (Telegram or stdout)
//! 3. Runs one tick per interval until the run duration elapses or Ctrl+C

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use arb_alert::adapters::{AlertSink, Notifier, QuoteApiClient};
use arb_alert::config::{self, TelegramConfig};
use arb_alert::core::{Pipeline, Scheduler, TokioClock};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();

    config::init_logging();

    info!("🚀 Arbitrage alert bot starting...");

    let config_path =
        PathBuf::from(std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string()));
    info!("📁 Loading configuration from {}...", config_path.display());
    let app_config = match config::load_runtime_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("[ERROR] Configuration failed: {}", e);
            std::process::exit(1);
        }
    };
    config::constants::log_configuration(&app_config);

    let source = QuoteApiClient::http(
        app_config.fetch.base_url.clone(),
        app_config.fetch.request_timeout(),
        app_config.fetch.retry_policy(),
    )?;
    let sink = AlertSink::from_config(TelegramConfig::from_env())?;
    info!(sink = sink.name(), "[CONFIG] Alert sink selected");

    let pipeline = Pipeline::new(
        Arc::new(source),
        Arc::new(sink),
        app_config.market.request_keys(),
        app_config.alerts.filter_policy(),
    )
    .with_notify_when_empty(app_config.alerts.notify_when_empty)
    .with_concurrency(app_config.fetch.concurrency);

    // Create shutdown broadcast channel
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    // Spawn SIGINT handler task
    let shutdown_signal = shutdown_tx.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("[SHUTDOWN] Graceful shutdown initiated");
                let _ = shutdown_signal.send(());
            }
            Err(err) => {
                eprintln!("Failed to listen for Ctrl+C signal: {}", err);
            }
        }
    });

    let mut scheduler = Scheduler::new(TokioClock);
    scheduler.every(app_config.schedule.interval(), Arc::new(pipeline));

    let deadline = Instant::now() + app_config.schedule.run_duration();
    let report = scheduler.run_until(deadline, shutdown_rx).await;

    info!(
        stop_reason = ?report.stop_reason,
        ticks = report.total_runs(),
        "[SHUTDOWN] Clean exit"
    );
    Ok(())
}

