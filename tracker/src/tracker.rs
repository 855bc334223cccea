//! The progress cycle: count, compare, notify, cache.
//!
//! Each call to [`ProgressTracker::check_progress`] runs one sequential pass:
//!
//! 1. Read the manifest and compute a [`ProgressSnapshot`].
//! 2. Load the previous count and passing positions from the cache.
//! 3. If the passing count went up, resolve the newly passing labels, send a
//!    Telegram message when a milestone boundary was crossed, post the
//!    webhook payload, and overwrite the cache.
//! 4. Otherwise write the cache only if it does not exist yet.
//!
//! Nothing in the cycle returns an error. Failures are logged and surface
//! only as flags on the returned [`CycleOutcome`].

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use tracing::{debug, info, warn};

use crate::cache::{CacheRecord, ProgressCache};
use crate::config::{Config, NotifierConfig};
use crate::display::progress_line;
use crate::error::Result;
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::milestone::Milestone;
use crate::notifier::{Notifier, TelegramNotifier, WebhookNotifier};
use crate::types::{ProgressPayload, ProgressSnapshot};

/// Boxed chat sink accepting rendered HTML text.
pub type ChatSink = Box<dyn Notifier<Message = String>>;

/// Boxed webhook sink accepting progress payloads.
pub type WebhookSink = Box<dyn Notifier<Message = ProgressPayload>>;

/// What one progress cycle observed and did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutcome {
    /// Counts computed from the manifest.
    pub snapshot: ProgressSnapshot,

    /// Passing count read from the cache.
    pub previous: usize,

    /// Labels of records that started passing since the cached run.
    pub completed: Vec<String>,

    /// Milestone crossed by this run. Only evaluated when a chat sink is set.
    pub milestone: Option<usize>,

    pub chat_delivered: bool,

    pub webhook_delivered: bool,

    /// Whether the cache file was (re)written.
    pub cache_written: bool,
}

impl CycleOutcome {
    /// Returns true when the passing count rose above the cached count.
    #[must_use]
    pub fn increased(&self) -> bool {
        self.snapshot.passing > self.previous
    }
}

/// Tracks progress of one project directory.
pub struct ProgressTracker {
    manifest_path: PathBuf,
    project: String,
    cache: ProgressCache,
    chat: Option<ChatSink>,
    webhook: Option<WebhookSink>,
}

impl ProgressTracker {
    /// Creates a tracker for `project_dir` with no sinks.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();

        Self {
            manifest_path: project_dir.join(MANIFEST_FILE),
            project: project_name(&project_dir),
            cache: ProgressCache::in_dir(&project_dir),
            chat: None,
            webhook: None,
        }
    }

    /// Creates a tracker with the HTTP sinks enabled by `config`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Notify` if an HTTP client cannot be built.
    pub fn from_config(project_dir: impl Into<PathBuf>, config: &NotifierConfig) -> Result<Self> {
        let mut tracker = Self::new(project_dir);

        if let Some(chat) = TelegramNotifier::from_config(config)? {
            tracker = tracker.with_chat(chat);
        }
        if let Some(webhook) = WebhookNotifier::from_config(config)? {
            tracker = tracker.with_webhook(webhook);
        }

        info!(
            project = %tracker.project,
            telegram = tracker.chat.is_some(),
            webhook = tracker.webhook.is_some(),
            "Progress tracker configured"
        );

        Ok(tracker)
    }

    /// Creates a tracker from environment configuration.
    ///
    /// `project_dir` overrides `PROGRESS_PROJECT_DIR` when given.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Config` if the environment holds invalid
    /// values, or `TrackerError::Notify` if an HTTP client cannot be built.
    pub fn from_env(project_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::from_env()?;
        if let Some(dir) = project_dir {
            config.project_dir = dir;
        }

        debug!(
            project_dir = %config.project_dir.display(),
            telegram = config.notifier.telegram_enabled(),
            webhook = config.notifier.webhook_enabled(),
            "Configuration loaded"
        );

        Self::from_config(config.project_dir, &config.notifier)
    }

    /// Sets the sink for milestone messages.
    #[must_use]
    pub fn with_chat<N>(mut self, chat: N) -> Self
    where
        N: Notifier<Message = String> + 'static,
    {
        self.chat = Some(Box::new(chat));
        self
    }

    /// Sets the sink for progress payloads.
    #[must_use]
    pub fn with_webhook<N>(mut self, webhook: N) -> Self
    where
        N: Notifier<Message = ProgressPayload> + 'static,
    {
        self.webhook = Some(Box::new(webhook));
        self
    }

    /// Overrides the project name reported in notifications.
    #[must_use]
    pub fn with_project_name(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project
    }

    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    #[must_use]
    pub fn cache(&self) -> &ProgressCache {
        &self.cache
    }

    /// Counts passing and total manifest entries without touching the cache.
    #[must_use]
    pub fn count(&self) -> ProgressSnapshot {
        Manifest::load(&self.manifest_path).snapshot()
    }

    /// Prints the progress line and, when the manifest has entries, runs the
    /// notification cycle.
    pub async fn print_progress_summary(&self) -> Option<CycleOutcome> {
        let manifest = Manifest::load(&self.manifest_path);
        let snapshot = manifest.snapshot();

        println!();
        println!("{}", progress_line(&snapshot));

        if snapshot.is_empty() {
            return None;
        }
        Some(self.report(&manifest, snapshot).await)
    }

    /// Runs one full progress cycle against the manifest on disk.
    pub async fn check_progress(&self) -> CycleOutcome {
        let manifest = Manifest::load(&self.manifest_path);
        let snapshot = manifest.snapshot();
        self.report(&manifest, snapshot).await
    }

    async fn report(&self, manifest: &Manifest, snapshot: ProgressSnapshot) -> CycleOutcome {
        let cached = self.cache.load();
        let mut outcome = CycleOutcome {
            previous: cached.count,
            snapshot,
            ..CycleOutcome::default()
        };

        if !outcome.increased() {
            if self.cache.exists() {
                debug!(
                    passing = outcome.snapshot.passing,
                    previous = outcome.previous,
                    "No progress since last run"
                );
            } else {
                outcome.cache_written = self.write_cache(&outcome.snapshot);
            }
            return outcome;
        }

        outcome.completed = manifest.newly_completed(&cached.passing_set());
        info!(
            passing = outcome.snapshot.passing,
            total = outcome.snapshot.total,
            previous = outcome.previous,
            newly_completed = outcome.completed.len(),
            "Progress increased"
        );

        if let Some(chat) = &self.chat {
            if let Some(milestone) = Milestone::evaluate(
                outcome.snapshot.passing,
                outcome.previous,
                outcome.snapshot.total,
                &self.project,
                &outcome.completed,
            ) {
                outcome.milestone = Some(milestone.milestone);
                let message = milestone.render(&Local::now());
                debug!(sink = chat.name(), milestone = milestone.milestone, "Sending milestone");
                outcome.chat_delivered = chat.deliver(&message).await;
            } else {
                debug!(passing = outcome.snapshot.passing, "No milestone crossed");
            }
        }

        if let Some(webhook) = &self.webhook {
            let payload = ProgressPayload::new(
                &outcome.snapshot,
                outcome.previous,
                outcome.completed.clone(),
                &self.project,
                Utc::now(),
            );
            debug!(sink = webhook.name(), "Posting progress payload");
            outcome.webhook_delivered = webhook.deliver(&payload).await;
        }

        outcome.cache_written = self.write_cache(&outcome.snapshot);
        outcome
    }

    fn write_cache(&self, snapshot: &ProgressSnapshot) -> bool {
        match self.cache.store(&CacheRecord::from_snapshot(snapshot)) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    path = %self.cache.path().display(),
                    error = %e,
                    "Failed to write progress cache"
                );
                false
            }
        }
    }
}

/// Directory name used as the project identifier.
///
/// Paths without a final component (such as `.`) are resolved first.
fn project_name(project_dir: &Path) -> String {
    match project_dir.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => canonical_name(project_dir),
    }
}

fn canonical_name(project_dir: &Path) -> String {
    project_dir
        .canonicalize()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| project_dir.display().to_string())
}
