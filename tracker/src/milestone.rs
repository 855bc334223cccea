//! Milestone detection and chat message composition.
//!
//! A milestone is every multiple of [`MILESTONE_INTERVAL`] passing records.
//! A run reaches a milestone when the passing count moves into a higher
//! interval bucket than the cached count, e.g. 9 → 10 or 19 → 23, but not
//! 10 → 19.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::types::percentage;

/// Passing-count interval between milestones.
pub const MILESTONE_INTERVAL: usize = 10;

/// Maximum number of completed descriptions listed in a milestone message.
pub const MAX_RECENT_COMPLETED: usize = 5;

/// Descriptions longer than this many characters are truncated.
pub const MAX_DESCRIPTION_CHARS: usize = 60;

/// Largest milestone at or below `count`.
#[must_use]
pub fn milestone_floor(count: usize) -> usize {
    (count / MILESTONE_INTERVAL) * MILESTONE_INTERVAL
}

/// Returns the milestone reached when moving from `previous` to `current`
/// passing records, if a boundary was crossed.
#[must_use]
pub fn crossed_milestone(previous: usize, current: usize) -> Option<usize> {
    let current_milestone = milestone_floor(current);
    (current_milestone > milestone_floor(previous)).then_some(current_milestone)
}

/// Truncates a description to [`MAX_DESCRIPTION_CHARS`] characters, adding
/// `...` when anything was cut.
#[must_use]
pub fn truncate_description(description: &str) -> String {
    match description.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}

/// Escapes text for Telegram's HTML parse mode.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A reached milestone, ready to be rendered as a chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub project: String,
    pub passing: usize,
    pub total: usize,

    /// The milestone boundary reached (a multiple of [`MILESTONE_INTERVAL`]).
    pub milestone: usize,

    /// At most [`MAX_RECENT_COMPLETED`] of the latest completed labels, in
    /// discovery order.
    pub recent: Vec<String>,
}

impl Milestone {
    /// Evaluates a progress change, returning a milestone if one was crossed.
    ///
    /// `completed` lists newly passing labels in manifest order; only the
    /// last [`MAX_RECENT_COMPLETED`] are kept.
    #[must_use]
    pub fn evaluate(
        passing: usize,
        previous: usize,
        total: usize,
        project: &str,
        completed: &[String],
    ) -> Option<Self> {
        let milestone = crossed_milestone(previous, passing)?;
        let skip = completed.len().saturating_sub(MAX_RECENT_COMPLETED);

        Some(Self {
            project: project.to_string(),
            passing,
            total,
            milestone,
            recent: completed[skip..].to_vec(),
        })
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage(self.passing, self.total)
    }

    /// Renders the Telegram HTML message, stamped with `now`.
    #[must_use]
    pub fn render<Tz>(&self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut message = format!(
            "🎯 <b>Milestone Reached!</b>\n\n\
             📊 <b>Project:</b> {project}\n\
             ✅ <b>Progress:</b> {passing}/{total} tests ({percentage:.1}%)\n\
             🏆 <b>Milestone:</b> {milestone} features completed!\n\n",
            project = escape_html(&self.project),
            passing = self.passing,
            total = self.total,
            percentage = self.percentage(),
            milestone = self.milestone,
        );

        if !self.recent.is_empty() {
            message.push_str("📝 <b>Recently completed:</b>\n");
            for description in &self.recent {
                message.push_str("  • ");
                message.push_str(&escape_html(&truncate_description(description)));
                message.push('\n');
            }
        }

        message.push_str(&format!("\n⏰ {}", now.format("%Y-%m-%d %H:%M:%S")));
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn labels(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("Feature {i}")).collect()
    }

    #[test]
    fn test_crossing_into_next_bucket_triggers() {
        assert_eq!(crossed_milestone(9, 10), Some(10));
        assert_eq!(crossed_milestone(19, 20), Some(20));
        assert_eq!(crossed_milestone(0, 10), Some(10));
    }

    #[test]
    fn test_same_bucket_does_not_trigger() {
        assert_eq!(crossed_milestone(10, 19), None);
        assert_eq!(crossed_milestone(0, 9), None);
        assert_eq!(crossed_milestone(15, 15), None);
    }

    #[test]
    fn test_jump_over_several_buckets_reports_highest() {
        assert_eq!(crossed_milestone(8, 34), Some(30));
    }

    #[test]
    fn test_decrease_does_not_trigger() {
        assert_eq!(crossed_milestone(25, 12), None);
    }

    #[test]
    fn test_truncate_boundary() {
        let exact = "a".repeat(60);
        let over = "b".repeat(61);

        assert_eq!(truncate_description(&exact), exact);
        assert_eq!(truncate_description(&over), format!("{}...", "b".repeat(60)));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let description = "é".repeat(61);

        let truncated = truncate_description(&description);

        assert_eq!(truncated, format!("{}...", "é".repeat(60)));
    }

    #[test]
    fn test_evaluate_none_without_crossing() {
        assert!(Milestone::evaluate(15, 11, 40, "demo", &labels(4)).is_none());
    }

    #[test]
    fn test_evaluate_keeps_last_five() {
        let milestone = Milestone::evaluate(10, 3, 40, "demo", &labels(7)).unwrap();

        assert_eq!(milestone.milestone, 10);
        assert_eq!(
            milestone.recent,
            vec!["Feature 3", "Feature 4", "Feature 5", "Feature 6", "Feature 7"]
        );
    }

    #[test]
    fn test_render_message_layout() {
        let completed = vec![
            "[auth] User can log in".to_string(),
            "x".repeat(61),
        ];
        let milestone = Milestone::evaluate(20, 18, 30, "demo-app", &completed).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let message = milestone.render(&now);

        assert_eq!(
            message,
            format!(
                "🎯 <b>Milestone Reached!</b>\n\n\
                 📊 <b>Project:</b> demo-app\n\
                 ✅ <b>Progress:</b> 20/30 tests (66.7%)\n\
                 🏆 <b>Milestone:</b> 20 features completed!\n\n\
                 📝 <b>Recently completed:</b>\n  \
                 • [auth] User can log in\n  \
                 • {}...\n\
                 \n⏰ 2025-01-02 03:04:05",
                "x".repeat(60)
            )
        );
    }

    #[test]
    fn test_render_percentage_rounds_ties_to_even() {
        let milestone = Milestone::evaluate(10, 9, 160, "demo", &[]).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        assert!(milestone.render(&now).contains("10/160 tests (6.2%)"));
    }

    #[test]
    fn test_render_omits_empty_completed_block() {
        let milestone = Milestone::evaluate(10, 0, 10, "demo", &[]).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let message = milestone.render(&now);

        assert!(!message.contains("Recently completed"));
        assert!(message.contains("10/10 tests (100.0%)"));
        assert!(message.ends_with("features completed!\n\n\n⏰ 2025-01-02 03:04:05"));
    }

    #[test]
    fn test_render_escapes_html() {
        let completed = vec!["Render <Header> & footer".to_string()];
        let milestone = Milestone::evaluate(10, 9, 12, "a<b>", &completed).unwrap();

        let message = milestone.render(&Utc::now());

        assert!(message.contains("<b>Project:</b> a&lt;b&gt;"));
        assert!(message.contains("• Render &lt;Header&gt; &amp; footer"));
    }
}
