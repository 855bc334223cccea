//! Generic webhook sink for progress payloads.
//!
//! The receiving workflow expects an array, so each payload is posted as a
//! one-element JSON array.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use super::{build_client, post_json, Notifier, NotifyError};
use crate::config::NotifierConfig;
use crate::types::ProgressPayload;

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Posts [`ProgressPayload`]s to a configured URL.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns `NotifyError::Http` if the HTTP client cannot be built.
    pub fn new(url: String) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client(Duration::from_secs(REQUEST_TIMEOUT_SECS))?,
            url,
        })
    }

    /// Creates a notifier when a webhook URL is configured.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &NotifierConfig) -> Result<Option<Self>, NotifyError> {
        config.webhook_url.clone().map(Self::new).transpose()
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    type Message = ProgressPayload;

    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn deliver(&self, message: &ProgressPayload) -> bool {
        match post_json(&self.client, &self.url, std::slice::from_ref(message)).await {
            Ok(()) => {
                info!(
                    sink = self.name(),
                    url = %self.url,
                    passing = message.passing,
                    total = message.total,
                    "Progress webhook sent"
                );
                true
            }
            Err(e) => {
                warn!(
                    sink = self.name(),
                    url = %self.url,
                    error = %e,
                    "Webhook notification failed"
                );
                false
            }
        }
    }
}
