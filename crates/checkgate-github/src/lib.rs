//! checkgate GitHub provider
//!
//! Supplies [`checkgate_core::CheckSnapshot`] values from the GitHub
//! check-runs API, for use by the polling harness.

pub mod client;
pub mod error;

pub use client::{GithubChecksClient, GithubConfig, GithubSnapshotProvider};
pub use error::{GithubError, Result};
