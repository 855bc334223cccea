//! Error types for the Progress Tracker.
//!
//! The progress cycle itself never returns an error: manifest, cache and
//! delivery failures all degrade to logged no-ops. These types cover the
//! fallible edges around it (configuration, sink construction, cache I/O).

use thiserror::Error;

use crate::config::ConfigError;
use crate::notifier::NotifyError;

/// Errors that can occur during tracker operations.
///
/// # Examples
///
/// ```ignore
/// use progress_tracker::error::TrackerError;
///
/// fn load_cache() -> Result<(), TrackerError> {
///     let contents = std::fs::read_to_string(".progress_cache")?;
///     let record: CacheRecord = serde_json::from_str(&contents)?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Notification sink error.
    #[error("notifier error: {0}")]
    Notify(#[from] NotifyError),
}

/// A specialized `Result` type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
