//! Check-run data model: named CI checks attached to a single commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a check run.
///
/// Only `Completed` is terminal. The checks API can also report a run as
/// `Requested` or `Pending` before it is queued; the classifier treats
/// every non-terminal state alike.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
    Requested,
    Pending,
}

impl CheckStatus {
    /// Whether the check has reached its terminal state.
    pub fn is_completed(&self) -> bool {
        matches!(self, CheckStatus::Completed)
    }
}

/// Terminal outcome of a completed check run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    Neutral,
    ActionRequired,
    Stale,
    StartupFailure,
    TimedOut,
}

/// A single named check attached to a commit or pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckRun {
    /// Check name (e.g. "Trigger TeamCity Build (windows)").
    pub name: String,

    /// Lifecycle state.
    pub status: CheckStatus,

    /// Terminal outcome; meaningful only when `status` is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,

    /// When execution started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When execution completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CheckRun {
    /// Create a check run in a non-terminal state.
    pub fn new(name: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            name: name.into(),
            status,
            conclusion: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Create a completed check run with the given conclusion.
    pub fn completed(name: impl Into<String>, conclusion: CheckConclusion) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Completed,
            conclusion: Some(conclusion),
            started_at: None,
            completed_at: None,
        }
    }

    /// Whether this run completed with an explicit `Failure` conclusion.
    ///
    /// A completed run with no conclusion, or with a cancelled/skipped
    /// outcome, is not a failure.
    pub fn is_failed(&self) -> bool {
        self.status.is_completed() && self.conclusion == Some(CheckConclusion::Failure)
    }
}

/// An ordered snapshot of all checks attached to one commit at one point
/// in time.
///
/// Snapshots are never persisted or mutated; each poll attempt receives a
/// fresh one and the element order carries no meaning for classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckSnapshot {
    pub checks: Vec<CheckRun>,
}

/// Accepted on-disk/CLI shapes for a snapshot document.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Wrapped { checks: Vec<CheckRun> },
    Bare(Vec<CheckRun>),
}

impl CheckSnapshot {
    /// Create a snapshot from check runs.
    pub fn new(checks: Vec<CheckRun>) -> Self {
        Self { checks }
    }

    /// Parse a snapshot document: either a bare JSON array of check runs
    /// or an object with a `checks` field.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        let document: SnapshotDocument = serde_json::from_str(input)?;
        let checks = match document {
            SnapshotDocument::Wrapped { checks } => checks,
            SnapshotDocument::Bare(checks) => checks,
        };
        Ok(Self { checks })
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_serde() {
        let statuses = [
            CheckStatus::Queued,
            CheckStatus::InProgress,
            CheckStatus::Completed,
            CheckStatus::Requested,
            CheckStatus::Pending,
        ];
        for status in &statuses {
            let json = serde_json::to_string(status).expect("serialize");
            let deserialized: CheckStatus = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(*status, deserialized);
        }
    }

    #[test]
    fn test_check_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&CheckStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        assert_eq!(
            serde_json::to_string(&CheckConclusion::ActionRequired).unwrap(),
            r#""action_required""#
        );
    }

    #[test]
    fn test_only_completed_is_terminal() {
        assert!(CheckStatus::Completed.is_completed());
        assert!(!CheckStatus::Queued.is_completed());
        assert!(!CheckStatus::InProgress.is_completed());
        assert!(!CheckStatus::Requested.is_completed());
        assert!(!CheckStatus::Pending.is_completed());
    }

    #[test]
    fn test_is_failed_requires_explicit_failure() {
        let failed = CheckRun::completed("build", CheckConclusion::Failure);
        assert!(failed.is_failed());

        let passed = CheckRun::completed("build", CheckConclusion::Success);
        assert!(!passed.is_failed());

        let cancelled = CheckRun::completed("build", CheckConclusion::Cancelled);
        assert!(!cancelled.is_failed());

        // Completed without a conclusion is not a failure.
        let mut bare = CheckRun::new("build", CheckStatus::Completed);
        bare.conclusion = None;
        assert!(!bare.is_failed());

        // A failure conclusion on a still-running check does not count.
        let mut running = CheckRun::new("build", CheckStatus::InProgress);
        running.conclusion = Some(CheckConclusion::Failure);
        assert!(!running.is_failed());
    }

    #[test]
    fn test_check_run_serde_roundtrip() {
        let run = CheckRun::completed("Trigger TeamCity Build (linux)", CheckConclusion::Success);
        let json = serde_json::to_string(&run).expect("serialize");
        let deserialized: CheckRun = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(run, deserialized);
    }

    #[test]
    fn test_check_run_null_conclusion_accepted() {
        let run: CheckRun = serde_json::from_str(
            r#"{"name": "Attempt Auto-Fix", "status": "in_progress", "conclusion": null}"#,
        )
        .expect("deserialize");
        assert_eq!(run.status, CheckStatus::InProgress);
        assert!(run.conclusion.is_none());
    }

    #[test]
    fn test_snapshot_from_json_bare_array() {
        let snapshot = CheckSnapshot::from_json(
            r#"[{"name": "build", "status": "completed", "conclusion": "success"}]"#,
        )
        .expect("parse");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.checks[0].name, "build");
    }

    #[test]
    fn test_snapshot_from_json_wrapped_object() {
        let snapshot = CheckSnapshot::from_json(
            r#"{"checks": [{"name": "build", "status": "queued"}]}"#,
        )
        .expect("parse");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.checks[0].status, CheckStatus::Queued);
    }

    #[test]
    fn test_snapshot_from_json_rejects_garbage() {
        assert!(CheckSnapshot::from_json(r#"{"not_checks": 1}"#).is_err());
    }
}
