//! Best-effort notification sinks.
//!
//! Every sink implements [`Notifier`]: a single `deliver` call that returns
//! whether the message went out. Delivery is fire-and-forget. Each request
//! has a short fixed timeout, nothing is retried, and failures are logged
//! and reported as `false` rather than returned as errors.
//!
//! - [`TelegramNotifier`]: milestone messages to a Telegram chat
//! - [`WebhookNotifier`]: progress payloads to a generic webhook
//! - [`RecordingNotifier`]: in-memory double that records messages

mod recording;
mod telegram;
mod webhook;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

pub use recording::RecordingNotifier;
pub use telegram::TelegramNotifier;
pub use webhook::WebhookNotifier;

/// Errors raised inside a sink before they are logged.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Failed to build the client, connect, or time out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("unexpected status: {status} - {message}")]
    Status { status: u16, message: String },
}

/// A notification sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Message type accepted by this sink.
    type Message: Send + Sync;

    /// Short sink name used in log fields.
    fn name(&self) -> &'static str;

    /// Delivers one message, returning `true` on success.
    ///
    /// Implementations must not panic or propagate errors.
    async fn deliver(&self, message: &Self::Message) -> bool;
}

/// Builds an HTTP client with the sink's fixed request timeout.
fn build_client(timeout: Duration) -> Result<Client, NotifyError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// POSTs `body` as JSON and maps non-success statuses to errors.
async fn post_json<T>(client: &Client, url: &str, body: &T) -> Result<(), NotifyError>
where
    T: Serialize + ?Sized + Sync,
{
    let response = client.post(url).json(body).send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    let message = response.text().await.unwrap_or_default();
    Err(NotifyError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = NotifyError::Status {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status: 404 - Not Found");
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
