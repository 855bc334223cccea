//! Progress Tracker - feature list progress reporting.
//!
//! This crate reads the `feature_list.json` manifest maintained by a
//! test-driven coding workflow, counts passing features, remembers the last
//! reported state in a flat cache file, and notifies external sinks when
//! progress is made.
//!
//! # Overview
//!
//! One progress cycle runs three steps in order:
//!
//! 1. **Count**: parse the manifest into a [`ProgressSnapshot`].
//! 2. **Evaluate**: compare with the cached count and detect milestones
//!    (every 10 passing features).
//! 3. **Notify and cache**: send a Telegram message on milestones, post a
//!    webhook payload on any increase, then persist the new state.
//!
//! Reporting never fails the caller: unreadable files degrade to empty
//! state and delivery failures are logged.
//!
//! # Modules
//!
//! - [`config`]: Sink configuration from environment variables
//! - [`error`]: Error types for tracker operations
//! - [`types`]: Snapshot and webhook payload types
//! - [`manifest`]: Manifest parsing and pass counting
//! - [`cache`]: Flat JSON progress cache
//! - [`milestone`]: Milestone detection and message composition
//! - [`notifier`]: Telegram, webhook and recording sinks
//! - [`tracker`]: The progress cycle
//! - [`display`]: Console progress line and session banner

pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod manifest;
pub mod milestone;
pub mod notifier;
pub mod tracker;
pub mod types;

pub use cache::{CacheRecord, ProgressCache, CACHE_FILE};
pub use config::{Config, ConfigError, NotifierConfig};
pub use display::{progress_line, session_header, SessionMode};
pub use error::{Result, TrackerError};
pub use manifest::{FeatureRecord, Manifest, ManifestEntry, MANIFEST_FILE};
pub use milestone::{crossed_milestone, truncate_description, Milestone, MILESTONE_INTERVAL};
pub use notifier::{Notifier, NotifyError, RecordingNotifier, TelegramNotifier, WebhookNotifier};
pub use tracker::{CycleOutcome, ProgressTracker};
pub use types::{percentage, ProgressPayload, ProgressSnapshot, PROGRESS_EVENT};
