//! Telegram configuration module
//!
//! Loads the bot credential and destination chat from environment variables.
//! When either is missing alerts go to stdout instead.

use tracing::{debug, info};

use super::constants::telegram_api_base_url;
use super::logging::SanitizedValue;

/// Telegram bot settings
#[derive(Clone)]
pub struct TelegramConfig {
    /// API base URL (default <https://api.telegram.org>)
    pub base_url: String,
    /// Bot token
    pub bot_token: String,
    /// Destination chat identifier
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("base_url", &self.base_url)
            .field("bot_token", &SanitizedValue::new(&self.bot_token).to_string())
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramConfig {
    /// Load from `TELEGRAM_API_ID` and `TELEGRAM_API_CHATID`
    ///
    /// Returns `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let bot_token = non_empty_env("TELEGRAM_API_ID");
        let chat_id = non_empty_env("TELEGRAM_API_CHATID");

        match (bot_token, chat_id) {
            (Some(bot_token), Some(chat_id)) => {
                info!(
                    chat_id = %chat_id,
                    bot_token = %SanitizedValue::new(&bot_token),
                    "Telegram configuration loaded"
                );
                Some(Self {
                    base_url: telegram_api_base_url(),
                    bot_token,
                    chat_id,
                })
            }
            _ => {
                debug!("TELEGRAM_API_ID/TELEGRAM_API_CHATID not set, alerts go to stdout");
                None
            }
        }
    }

    /// Create a TelegramConfig for testing
    pub fn new(base_url: &str, bot_token: &str, chat_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================
