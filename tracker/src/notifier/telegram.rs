//! Telegram Bot API sink for milestone messages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use super::{build_client, post_json, Notifier, NotifyError};
use crate::config::NotifierConfig;

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Parse mode for milestone messages.
const PARSE_MODE: &str = "HTML";

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Sends HTML-formatted text to one Telegram chat.
pub struct TelegramNotifier {
    client: Client,
    /// Full `sendMessage` URL. Contains the bot token, so it is never logged.
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Creates a notifier for `chat_id` using the bot API at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Http` if the HTTP client cannot be built.
    pub fn new(api_url: &str, bot_token: &str, chat_id: String) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client(Duration::from_secs(REQUEST_TIMEOUT_SECS))?,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                api_url.trim_end_matches('/'),
                bot_token
            ),
            chat_id,
        })
    }

    /// Creates a notifier when both token and chat id are configured.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &NotifierConfig) -> Result<Option<Self>, NotifyError> {
        match (&config.telegram_bot_token, &config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => {
                Self::new(&config.telegram_api_url, token, chat_id.clone()).map(Some)
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    type Message = String;

    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn deliver(&self, message: &String) -> bool {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text: message,
            parse_mode: PARSE_MODE,
        };

        match post_json(&self.client, &self.endpoint, &body).await {
            Ok(()) => {
                info!(sink = self.name(), chat_id = %self.chat_id, "Telegram milestone sent");
                true
            }
            Err(NotifyError::Http(e)) => {
                // reqwest errors embed the URL, which carries the bot token.
                warn!(
                    sink = self.name(),
                    error = %e.without_url(),
                    "Telegram notification failed"
                );
                false
            }
            Err(e) => {
                warn!(sink = self.name(), error = %e, "Telegram notification failed");
                false
            }
        }
    }
}
