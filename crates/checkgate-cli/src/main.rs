//! checkgate - decide whether downstream CI automation should proceed,
//! skip, or keep waiting, from a snapshot of commit check results.
//!
//! ## Commands
//!
//! - `classify`: one-shot classification of a snapshot JSON document
//! - `watch`: poll the GitHub checks API until a decision or timeout
//!
//! ## Exit codes
//!
//! - 0: skip (nothing failed, nothing to act on)
//! - 1: proceed (at least one watched check failed)
//! - 2: wait, checks still pending (one-shot `classify` only)
//! - 3: timed out while checks were still pending

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use checkgate_core::{
    classify_report, init_tracing, wait_for_verdict, CheckSnapshot, ClassificationReport,
    PollOutcome, PollPolicy, RelevanceFilter, Verdict, WatchSpan,
};
use checkgate_github::{GithubChecksClient, GithubConfig, GithubSnapshotProvider};

const EXIT_TIMED_OUT: i32 = 3;

#[derive(Parser)]
#[command(name = "checkgate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check-aggregation gate for CI automation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a snapshot document and exit with the verdict
    Classify {
        /// Path to the snapshot JSON document ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        snapshot: PathBuf,

        /// Name substring marking the checks to gate on
        #[arg(short, long)]
        marker: String,

        /// Exclude the named check and judge pending-ness over all others
        #[arg(long)]
        exclude_self: Option<String>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        report_json: bool,
    },

    /// Poll GitHub until the gate decides or the attempt budget runs out
    Watch {
        /// Commit SHA, branch, or tag whose checks are watched
        #[arg(long)]
        git_ref: String,

        /// Name substring marking the checks to gate on
        #[arg(short, long)]
        marker: String,

        /// Exclude the named check (a check must not wait on itself)
        #[arg(long)]
        exclude_self: Option<String>,

        /// Repository as owner/name (default: $GITHUB_REPOSITORY)
        #[arg(long)]
        repo: Option<String>,

        /// Seconds between poll attempts
        #[arg(long, default_value = "30")]
        interval_secs: u64,

        /// Maximum poll attempts (0 = poll until decided)
        #[arg(long, default_value = "40")]
        max_attempts: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let exit_code = match cli.command {
        Commands::Classify {
            snapshot,
            marker,
            exclude_self,
            report_json,
        } => cmd_classify(&snapshot, &marker, exclude_self.as_deref(), report_json)?,
        Commands::Watch {
            git_ref,
            marker,
            exclude_self,
            repo,
            interval_secs,
            max_attempts,
        } => {
            cmd_watch(
                &git_ref,
                &marker,
                exclude_self.as_deref(),
                repo.as_deref(),
                interval_secs,
                max_attempts,
            )
            .await?
        }
    };

    std::process::exit(exit_code);
}

/// Classify a snapshot document from a file or stdin
fn cmd_classify(
    snapshot_path: &Path,
    marker: &str,
    exclude_self: Option<&str>,
    report_json: bool,
) -> Result<i32> {
    let input = read_snapshot_input(snapshot_path)?;
    let snapshot =
        CheckSnapshot::from_json(&input).context("Failed to parse snapshot document")?;

    let filter = build_filter(marker, exclude_self);
    let report = classify_report(&snapshot, &filter);

    if report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_report_text(&report));
    }

    Ok(verdict_exit_code(report.verdict))
}

/// Poll the GitHub checks API until a decision or timeout
async fn cmd_watch(
    git_ref: &str,
    marker: &str,
    exclude_self: Option<&str>,
    repo: Option<&str>,
    interval_secs: u64,
    max_attempts: u32,
) -> Result<i32> {
    let config = match repo {
        Some(spec) => GithubConfig::for_repository(spec),
        None => GithubConfig::from_env(),
    }
    .context("Failed to resolve GitHub repository")?;

    let client = GithubChecksClient::new(config).context("Failed to build GitHub client")?;
    let provider = GithubSnapshotProvider::new(client, git_ref);

    let filter = build_filter(marker, exclude_self);
    let policy = PollPolicy {
        interval_secs,
        max_attempts,
        ..PollPolicy::default()
    };

    let watch_id = uuid::Uuid::new_v4().to_string();
    let _span = WatchSpan::enter(&watch_id);
    checkgate_core::emit_watch_started(&watch_id, git_ref);

    let outcome = wait_for_verdict(&provider, &filter, &policy)
        .await
        .context("Polling for check results failed")?;

    match outcome {
        PollOutcome::Decided { verdict, attempts } => {
            println!("Decided after {} attempt(s): {}", attempts, verdict);
            Ok(verdict_exit_code(verdict))
        }
        PollOutcome::TimedOut { attempts } => {
            println!(
                "Timed out after {} attempt(s); watched checks still pending",
                attempts
            );
            Ok(EXIT_TIMED_OUT)
        }
    }
}

fn build_filter(marker: &str, exclude_self: Option<&str>) -> RelevanceFilter {
    match exclude_self {
        Some(self_name) => RelevanceFilter::exclude_self(self_name, marker),
        None => RelevanceFilter::name_contains(marker),
    }
}

fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Skip => 0,
        Verdict::Proceed => 1,
        Verdict::Wait => 2,
    }
}

fn read_snapshot_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read snapshot from stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {:?}", path))
    }
}

fn render_report_text(report: &ClassificationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Verdict: {}\n", report.verdict));
    out.push_str(&format!("Relevant checks: {}\n", report.relevant.len()));
    for name in &report.relevant {
        out.push_str(&format!("  = {}\n", name));
    }

    if !report.pending.is_empty() {
        out.push_str("\nStill pending:\n");
        for name in &report.pending {
            out.push_str(&format!("  ~ {}\n", name));
        }
    }
    if !report.failed.is_empty() {
        out.push_str("\nFailed:\n");
        for name in &report.failed {
            out.push_str(&format!("  x {}\n", name));
        }
    }

    out.trim_end().to_string()
}
