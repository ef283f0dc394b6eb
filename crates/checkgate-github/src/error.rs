//! Error types for the GitHub provider.

use thiserror::Error;

/// Errors that can occur talking to the GitHub checks API.
#[derive(Error, Debug)]
pub enum GithubError {
    /// GITHUB_REPOSITORY is not set and no repository was given
    #[error("no repository configured: set GITHUB_REPOSITORY or pass --repo")]
    MissingRepository,

    /// Repository spec did not parse
    #[error("invalid repository (expected owner/name): {0}")]
    InvalidRepository(String),

    /// Non-success response from the API
    #[error("GitHub API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Payload parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        GithubError::Http(err.to_string())
    }
}

/// Result type for GitHub provider operations.
pub type Result<T> = std::result::Result<T, GithubError>;
