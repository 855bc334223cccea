//! Console output for coding sessions.

use std::fmt;

use crate::manifest::MANIFEST_FILE;
use crate::types::ProgressSnapshot;

/// Width of the session banner rule.
const BANNER_WIDTH: usize = 70;

/// Kind of coding session being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// First session, which creates the feature list.
    Initializer,
    /// Any later session working through the feature list.
    CodingAgent,
}

impl SessionMode {
    #[must_use]
    pub fn from_initializer(is_initializer: bool) -> Self {
        if is_initializer {
            Self::Initializer
        } else {
            Self::CodingAgent
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Initializer => "INITIALIZER",
            Self::CodingAgent => "CODING AGENT",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Session banner: a leading blank line, a rule, the title, another rule and
/// a trailing blank line once printed with `println!`.
#[must_use]
pub fn session_header(session: u32, mode: SessionMode) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("\n{rule}\n  SESSION {session}: {mode}\n{rule}\n")
}

/// One-line progress summary, or a placeholder when the manifest is empty.
#[must_use]
pub fn progress_line(snapshot: &ProgressSnapshot) -> String {
    if snapshot.is_empty() {
        return format!("Progress: {MANIFEST_FILE} not yet created");
    }

    let percentage = snapshot.passing as f64 / snapshot.total as f64 * 100.0;
    format!(
        "Progress: {}/{} tests passing ({percentage:.1}%)",
        snapshot.passing, snapshot.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_header_layout() {
        let header = session_header(3, SessionMode::CodingAgent);
        let lines: Vec<&str> = header.split('\n').collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(70));
        assert_eq!(lines[2], "  SESSION 3: CODING AGENT");
        assert_eq!(lines[3], "=".repeat(70));
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_session_mode_from_flag() {
        assert_eq!(SessionMode::from_initializer(true), SessionMode::Initializer);
        assert_eq!(SessionMode::from_initializer(false).label(), "CODING AGENT");
        assert!(session_header(1, SessionMode::Initializer).contains("SESSION 1: INITIALIZER"));
    }

    #[test]
    fn test_progress_line() {
        let snapshot = ProgressSnapshot::new(3, [0].into_iter().collect());

        assert_eq!(progress_line(&snapshot), "Progress: 1/3 tests passing (33.3%)");
    }

    #[test]
    fn test_progress_line_placeholder() {
        assert_eq!(
            progress_line(&ProgressSnapshot::default()),
            "Progress: feature_list.json not yet created"
        );
    }
}
