//! Alert sinks
//!
//! `TelegramNotifier` posts through the Bot API `sendMessage` method with
//! Markdown parse mode. `StdoutNotifier` prints alerts, one per line, and is
//! used when no Telegram credentials are configured.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::adapters::errors::{body_excerpt, NotifyError};
use crate::adapters::traits::Notifier;
use crate::config::{SanitizedValue, TelegramConfig};
use crate::error::AppError;

/// Request timeout for Bot API calls
const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram Bot API notifier
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(TELEGRAM_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.config.base_url, self.config.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .get(self.send_message_url())
            .query(&[
                ("chat_id", self.config.chat_id.as_str()),
                ("parse_mode", "Markdown"),
                ("text", text),
            ])
            .send()
            .await
            // reqwest errors embed the URL, which carries the token
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(chat_id = %self.config.chat_id, "[TELEGRAM] Message delivered");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(
            status = status.as_u16(),
            bot_token = %SanitizedValue::new(&self.config.bot_token),
            body = %body_excerpt(&body),
            "[TELEGRAM] sendMessage rejected"
        );
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body: body_excerpt(&body),
        })
    }
}

/// Prints alerts to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    fn name(&self) -> &'static str {
        "stdout"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Either sink, picked at startup
pub enum AlertSink {
    Telegram(TelegramNotifier),
    Stdout(StdoutNotifier),
}

impl AlertSink {
    /// Telegram when credentials are present, stdout otherwise
    pub fn from_config(telegram: Option<TelegramConfig>) -> Result<Self, AppError> {
        match telegram {
            Some(config) => Ok(Self::Telegram(TelegramNotifier::new(config)?)),
            None => Ok(Self::Stdout(StdoutNotifier)),
        }
    }
}

#[async_trait]
impl Notifier for AlertSink {
    fn name(&self) -> &'static str {
        match self {
            Self::Telegram(n) => n.name(),
            Self::Stdout(n) => n.name(),
        }
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        match self {
            Self::Telegram(n) => n.send(text).await,
            Self::Stdout(n) => n.send(text).await,
        }
    }
}
