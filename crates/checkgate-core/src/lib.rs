//! checkgate Core Library
//!
//! Classifies a snapshot of CI check results into a three-way verdict
//! (proceed / skip / wait) and polls a snapshot provider until a decision
//! is reached.

pub mod check;
pub mod classify;
pub mod error;
pub mod obs;
pub mod poll;
pub mod telemetry;

pub use check::{CheckConclusion, CheckRun, CheckSnapshot, CheckStatus};
pub use classify::{classify, classify_report, ClassificationReport, RelevanceFilter, Verdict};
pub use error::{CheckGateError, Result};
pub use obs::{
    emit_fetch_failed, emit_snapshot_classified, emit_watch_decided, emit_watch_started,
    emit_watch_timed_out, WatchSpan,
};
pub use poll::{wait_for_verdict, PollOutcome, PollPolicy, SnapshotProvider};
pub use telemetry::init_tracing;

/// checkgate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
