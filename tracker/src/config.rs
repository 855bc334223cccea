//! Configuration module for Progress Tracker.
//!
//! This module handles parsing configuration from environment variables.
//! The tracker itself never reads the environment: it receives a
//! [`NotifierConfig`] at construction, and `from_env` is only a convenience
//! for the binary.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `TELEGRAM_BOT_TOKEN` | No | - | Telegram bot token (enables chat milestones together with the chat id) |
//! | `TELEGRAM_CHAT_ID` | No | - | Telegram chat receiving milestone messages |
//! | `TELEGRAM_API_URL` | No | `https://api.telegram.org` | Telegram Bot API base URL |
//! | `PROGRESS_N8N_WEBHOOK_URL` | No | - | Generic webhook receiving every progress increase |
//! | `PROGRESS_PROJECT_DIR` | No | current dir | Directory containing `feature_list.json` |
//!
//! Variables set to an empty string are treated as unset.
//!
//! # Example
//!
//! ```no_run
//! use progress_tracker::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Project: {}", config.project_dir.display());
//! ```

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Environment variable holding the Telegram bot token.
const ENV_TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the Telegram chat id.
const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Environment variable overriding the Telegram API base URL.
const ENV_TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";

/// Environment variable holding the generic webhook URL.
const ENV_WEBHOOK_URL: &str = "PROGRESS_N8N_WEBHOOK_URL";

/// Environment variable overriding the project directory.
const ENV_PROJECT_DIR: &str = "PROGRESS_PROJECT_DIR";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to determine the current working directory.
    #[error("failed to determine current directory: {0}")]
    NoCurrentDirectory(#[source] std::io::Error),
}

/// Credentials and endpoints for the notification sinks.
///
/// Each sink is enabled only when all of its fields are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Telegram bot token.
    pub telegram_bot_token: Option<String>,

    /// Telegram chat id receiving milestone messages.
    pub telegram_chat_id: Option<String>,

    /// Telegram Bot API base URL, without trailing slash.
    pub telegram_api_url: String,

    /// Generic webhook URL receiving every progress increase.
    pub webhook_url: Option<String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            webhook_url: None,
        }
    }
}

impl NotifierConfig {
    /// Creates a `NotifierConfig` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `TELEGRAM_API_URL` or
    /// `PROGRESS_N8N_WEBHOOK_URL` is set but is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let telegram_bot_token = non_empty_var(ENV_TELEGRAM_BOT_TOKEN);
        let telegram_chat_id = non_empty_var(ENV_TELEGRAM_CHAT_ID);

        let telegram_api_url = match non_empty_var(ENV_TELEGRAM_API_URL) {
            Some(url) => {
                validate_http_url(ENV_TELEGRAM_API_URL, &url)?;
                url.trim_end_matches('/').to_string()
            }
            None => DEFAULT_TELEGRAM_API_URL.to_string(),
        };

        let webhook_url = match non_empty_var(ENV_WEBHOOK_URL) {
            Some(url) => {
                validate_http_url(ENV_WEBHOOK_URL, &url)?;
                Some(url)
            }
            None => None,
        };

        Ok(Self {
            telegram_bot_token,
            telegram_chat_id,
            telegram_api_url,
            webhook_url,
        })
    }

    /// Returns true when both Telegram credentials are present.
    #[must_use]
    pub fn telegram_enabled(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }

    /// Returns true when the generic webhook URL is present.
    #[must_use]
    pub fn webhook_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }
}

/// Configuration for the `progress-tracker` binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing `feature_list.json` and `.progress_cache`.
    pub project_dir: PathBuf,

    /// Notification sink configuration.
    pub notifier: NotifierConfig,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a sink URL is malformed or, when
    /// `PROGRESS_PROJECT_DIR` is unset, the current directory cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_dir: project_dir_from_env()?,
            notifier: NotifierConfig::from_env()?,
        })
    }
}

/// Resolves the project directory from `PROGRESS_PROJECT_DIR`, falling back
/// to the current working directory.
///
/// # Errors
///
/// Returns `ConfigError::NoCurrentDirectory` if the variable is unset and the
/// current directory cannot be determined.
pub fn project_dir_from_env() -> Result<PathBuf, ConfigError> {
    match non_empty_var(ENV_PROJECT_DIR) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => env::current_dir().map_err(ConfigError::NoCurrentDirectory),
    }
}

/// Reads an environment variable, treating empty values as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn validate_http_url(key: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected http(s) URL, got '{url}'"),
        })
    }
}
