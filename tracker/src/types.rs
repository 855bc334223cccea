//! Shared progress types.
//!
//! [`ProgressSnapshot`] is the counter's view of the manifest at one point in
//! time. [`ProgressPayload`] is the wire schema posted to the generic webhook;
//! its field names are a downstream contract and serialize as snake_case.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event tag carried by every webhook payload.
pub const PROGRESS_EVENT: &str = "test_progress";

/// Percentage of passing entries, rounded to one decimal place.
///
/// Rounding is applied to the exact value of `passing / total * 100` with
/// ties to even, so `1/16` (6.25%) reports `6.2`. Returns `0.0` when `total`
/// is zero.
#[must_use]
pub fn percentage(passing: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let exact = passing as f64 / total as f64 * 100.0;
    // Float formatting rounds the exact binary value half-to-even.
    format!("{exact:.1}").parse().unwrap_or(exact)
}

/// Passing/total counts derived from a manifest.
///
/// `passing_indices` holds the manifest positions of passing records, so
/// `passing == passing_indices.len()` and every index is below `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    /// Number of records whose `passes` field is `true`.
    pub passing: usize,

    /// Number of manifest entries, passing or not.
    pub total: usize,

    /// Positions of passing records.
    pub passing_indices: BTreeSet<usize>,
}

impl ProgressSnapshot {
    /// Builds a snapshot from the positions of passing entries.
    #[must_use]
    pub fn new(total: usize, passing_indices: BTreeSet<usize>) -> Self {
        Self {
            passing: passing_indices.len(),
            total,
            passing_indices,
        }
    }

    /// Returns true when the manifest had no entries (or could not be read).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Rounded pass percentage.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage(self.passing, self.total)
    }
}

/// Payload posted to the generic webhook on every progress increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    /// Always [`PROGRESS_EVENT`].
    pub event: String,

    pub passing: usize,

    pub total: usize,

    /// Pass percentage rounded to one decimal place.
    pub percentage: f64,

    /// Passing count read from the cache before this run.
    pub previous_passing: usize,

    pub tests_completed_this_session: usize,

    /// Labels of records that started passing since the cached run.
    pub completed_tests: Vec<String>,

    /// Project directory name.
    pub project: String,

    /// UTC ISO 8601 timestamp with a `Z` suffix.
    pub timestamp: String,
}

impl ProgressPayload {
    /// Creates a payload for a progress increase observed at `now`.
    #[must_use]
    pub fn new(
        snapshot: &ProgressSnapshot,
        previous: usize,
        completed_tests: Vec<String>,
        project: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            event: PROGRESS_EVENT.to_string(),
            passing: snapshot.passing,
            total: snapshot.total,
            percentage: snapshot.percentage(),
            previous_passing: previous,
            tests_completed_this_session: snapshot.passing.saturating_sub(previous),
            completed_tests,
            project: project.to_string(),
            timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
        }
    }
}
