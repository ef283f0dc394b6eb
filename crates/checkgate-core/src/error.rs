//! Error taxonomy for the polling layer.
//!
//! Classification itself has no failure mode: a snapshot with no relevant
//! checks is data, not an error. Errors only arise while fetching
//! snapshots from a provider.

/// Errors produced while obtaining snapshots or driving the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum CheckGateError {
    #[error("snapshot provider error: {0}")]
    Provider(String),

    #[error("snapshot provider failed {failures} consecutive time(s): {last_error}")]
    ProviderExhausted { failures: u32, last_error: String },
}

/// Result type for checkgate polling operations.
pub type Result<T> = std::result::Result<T, CheckGateError>;
