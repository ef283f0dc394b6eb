//! Structured observability hooks for the watch lifecycle.
//!
//! This module provides:
//! - Watch-scoped tracing spans via the `WatchSpan` RAII guard
//! - Emission functions for key lifecycle events: started, classified,
//!   decided, timed out
//!
//! Events are emitted at `info!` level and respect the `RUST_LOG` filter.

use tracing::info;

use crate::classify::{ClassificationReport, Verdict};

/// RAII guard that enters a watch-scoped tracing span.
///
/// While the guard is alive, all tracing calls carry the watch_id field.
pub struct WatchSpan {
    _span: tracing::span::EnteredSpan,
}

impl WatchSpan {
    /// Create and enter a span tagged with the watch id.
    pub fn enter(watch_id: &str) -> Self {
        let span = tracing::info_span!("checkgate.watch", watch_id = %watch_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a watch session started for a git ref.
pub fn emit_watch_started(watch_id: &str, git_ref: &str) {
    info!(event = "watch.started", watch_id = %watch_id, git_ref = %git_ref);
}

/// Emit event: one snapshot was classified.
pub fn emit_snapshot_classified(report: &ClassificationReport) {
    info!(
        event = "snapshot.classified",
        verdict = %report.verdict,
        relevant = report.relevant.len(),
        pending = report.pending.len(),
        failed = report.failed.len(),
    );
}

/// Emit event: the poll loop reached a decision.
pub fn emit_watch_decided(verdict: Verdict, attempts: u32) {
    info!(event = "watch.decided", verdict = %verdict, attempts = attempts);
}

/// Emit event: the attempt budget ran out while checks were pending.
pub fn emit_watch_timed_out(attempts: u32) {
    info!(event = "watch.timed_out", attempts = attempts);
}

/// Emit event: one snapshot fetch failed (warning level).
pub fn emit_fetch_failed(attempt: u32, consecutive: u32, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "snapshot.fetch_failed",
        attempt = attempt,
        consecutive = consecutive,
        error = %error,
    );
}
