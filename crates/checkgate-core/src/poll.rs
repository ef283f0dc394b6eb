//! Polling harness: repeatedly fetch and classify snapshots until the
//! gate decides or the attempt budget runs out.
//!
//! The classifier itself stays synchronous and pure; time, retries, and
//! cancellation live here.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::check::CheckSnapshot;
use crate::classify::{classify_report, RelevanceFilter, Verdict};
use crate::error::{CheckGateError, Result};
use crate::obs;

/// Source of check snapshots for a single commit or pull-request ref.
///
/// Called once per poll attempt; each call must return a fresh snapshot.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn fetch(&self) -> Result<CheckSnapshot>;
}

/// Polling cadence and budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollPolicy {
    /// Seconds to sleep between attempts.
    pub interval_secs: u64,

    /// Maximum number of poll attempts (0 = poll until decided).
    pub max_attempts: u32,

    /// Consecutive fetch failures tolerated before giving up.
    pub max_fetch_retries: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            max_attempts: 40,
            max_fetch_retries: 2,
        }
    }
}

/// Terminal outcome of a polling session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    /// The classifier reached a decision.
    Decided { verdict: Verdict, attempts: u32 },

    /// The attempt budget ran out while relevant checks were still pending.
    TimedOut { attempts: u32 },
}

/// Poll `provider` until the classifier decides or the budget runs out.
///
/// On `Wait` the loop sleeps for `interval_secs` and retries. Transient
/// fetch failures are tolerated up to `max_fetch_retries` consecutive
/// times, then surfaced as [`CheckGateError::ProviderExhausted`]. That is
/// distinct from [`PollOutcome::TimedOut`], which means the checks never
/// completed within the attempt budget.
pub async fn wait_for_verdict(
    provider: &dyn SnapshotProvider,
    filter: &RelevanceFilter,
    policy: &PollPolicy,
) -> Result<PollOutcome> {
    let mut attempts: u32 = 0;
    let mut consecutive_failures: u32 = 0;

    loop {
        attempts += 1;

        let snapshot = match provider.fetch().await {
            Ok(snapshot) => {
                consecutive_failures = 0;
                snapshot
            }
            Err(err) => {
                consecutive_failures += 1;
                obs::emit_fetch_failed(attempts, consecutive_failures, &err);

                if consecutive_failures > policy.max_fetch_retries {
                    return Err(CheckGateError::ProviderExhausted {
                        failures: consecutive_failures,
                        last_error: err.to_string(),
                    });
                }

                tokio::time::sleep(Duration::from_secs(policy.interval_secs)).await;
                continue;
            }
        };

        let report = classify_report(&snapshot, filter);

        match report.verdict {
            Verdict::Wait => {
                if policy.max_attempts != 0 && attempts >= policy.max_attempts {
                    obs::emit_watch_timed_out(attempts);
                    return Ok(PollOutcome::TimedOut { attempts });
                }

                debug!(
                    event = "watch.sleeping",
                    attempt = attempts,
                    interval_secs = policy.interval_secs,
                    pending = report.pending.len(),
                );
                tokio::time::sleep(Duration::from_secs(policy.interval_secs)).await;
            }
            verdict => {
                obs::emit_watch_decided(verdict, attempts);
                return Ok(PollOutcome::Decided { verdict, attempts });
            }
        }
    }
}
