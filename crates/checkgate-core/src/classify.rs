//! Check-aggregation classifier.
//!
//! Classifies one [`CheckSnapshot`] into a [`Verdict`]: the three-way
//! decision that tells downstream automation whether to proceed (a watched
//! check failed), skip (nothing failed), or keep waiting (watched checks
//! are still running). Pure over its inputs: no state, no I/O, the same
//! snapshot always yields the same verdict.

use serde::{Deserialize, Serialize};

use crate::check::{CheckRun, CheckSnapshot};
use crate::obs;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// The three-way decision over one snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every relevant check completed and at least one failed.
    Proceed,
    /// Every relevant check completed and none failed, or no relevant
    /// check exists in the snapshot.
    Skip,
    /// At least one relevant check has not completed yet.
    Wait,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Verdict::Proceed => "proceed",
            Verdict::Skip => "skip",
            Verdict::Wait => "wait",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Relevance filter
// ---------------------------------------------------------------------------

/// Strategy selecting which checks in a snapshot the classifier considers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RelevanceFilter {
    /// Consider only checks whose name contains `marker`; failures are
    /// judged over the same set.
    NameContains { marker: String },

    /// Consider every check except the one named exactly `self_name`
    /// (a check must not wait on itself); failures are judged over the
    /// marker-matching subset of the remainder.
    ExcludeSelf { self_name: String, marker: String },
}

impl RelevanceFilter {
    /// Name-substring relevance.
    pub fn name_contains(marker: impl Into<String>) -> Self {
        RelevanceFilter::NameContains {
            marker: marker.into(),
        }
    }

    /// Exclude-self relevance with a marker sub-selection for failures.
    pub fn exclude_self(self_name: impl Into<String>, marker: impl Into<String>) -> Self {
        RelevanceFilter::ExcludeSelf {
            self_name: self_name.into(),
            marker: marker.into(),
        }
    }

    /// Whether `check` participates in the completed/pending determination.
    fn is_relevant(&self, check: &CheckRun) -> bool {
        match self {
            RelevanceFilter::NameContains { marker } => check.name.contains(marker.as_str()),
            RelevanceFilter::ExcludeSelf { self_name, .. } => check.name != *self_name,
        }
    }

    /// Whether a relevant `check` participates in the failure determination.
    fn counts_toward_failure(&self, check: &CheckRun) -> bool {
        match self {
            RelevanceFilter::NameContains { marker }
            | RelevanceFilter::ExcludeSelf { marker, .. } => check.name.contains(marker.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Diagnostic companion to a [`Verdict`]: which checks were considered,
/// which are still pending, and which failed.
///
/// Not part of the verdict contract; callers that only need the decision
/// use [`classify`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationReport {
    pub verdict: Verdict,
    /// Names of every relevant check, in snapshot order.
    pub relevant: Vec<String>,
    /// Names of relevant checks that have not completed.
    pub pending: Vec<String>,
    /// Names of failure-relevant checks that concluded with `failure`.
    pub failed: Vec<String>,
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classify a snapshot, returning the verdict together with per-check
/// diagnostics.
///
/// The snapshot is never mutated, and element order does not affect the
/// verdict (only the order of names inside the report).
pub fn classify_report(snapshot: &CheckSnapshot, filter: &RelevanceFilter) -> ClassificationReport {
    let relevant: Vec<&CheckRun> = snapshot
        .checks
        .iter()
        .filter(|check| filter.is_relevant(check))
        .collect();

    let relevant_names: Vec<String> = relevant.iter().map(|check| check.name.clone()).collect();

    // Nothing to wait for or act on.
    if relevant.is_empty() {
        let report = ClassificationReport {
            verdict: Verdict::Skip,
            relevant: relevant_names,
            pending: Vec::new(),
            failed: Vec::new(),
        };
        obs::emit_snapshot_classified(&report);
        return report;
    }

    let pending: Vec<String> = relevant
        .iter()
        .filter(|check| !check.status.is_completed())
        .map(|check| check.name.clone())
        .collect();

    // Partial completion never triggers a decision.
    if !pending.is_empty() {
        let report = ClassificationReport {
            verdict: Verdict::Wait,
            relevant: relevant_names,
            pending,
            failed: Vec::new(),
        };
        obs::emit_snapshot_classified(&report);
        return report;
    }

    let failed: Vec<String> = relevant
        .iter()
        .filter(|check| filter.counts_toward_failure(check) && check.is_failed())
        .map(|check| check.name.clone())
        .collect();

    let verdict = if failed.is_empty() {
        Verdict::Skip
    } else {
        Verdict::Proceed
    };

    let report = ClassificationReport {
        verdict,
        relevant: relevant_names,
        pending: Vec::new(),
        failed,
    };
    obs::emit_snapshot_classified(&report);
    report
}

/// Classify a snapshot into a bare [`Verdict`].
pub fn classify(snapshot: &CheckSnapshot, filter: &RelevanceFilter) -> Verdict {
    classify_report(snapshot, filter).verdict
}
