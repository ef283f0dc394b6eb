//! GitHub check-runs client
//!
//! Implements the check-status provider boundary against the GitHub REST
//! API: one call lists every check run attached to a commit and maps the
//! payload into a [`CheckSnapshot`].

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use checkgate_core::{CheckGateError, CheckRun, CheckSnapshot, SnapshotProvider};

use crate::error::{GithubError, Result};

/// GitHub API configuration
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// REST API base URL
    pub api_url: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Bearer token (optional for public repositories)
    pub token: Option<String>,
}

impl GithubConfig {
    /// Build a config from the standard GitHub Actions environment:
    /// `GITHUB_API_URL`, `GITHUB_REPOSITORY` ("owner/name"), `GITHUB_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let repository =
            std::env::var("GITHUB_REPOSITORY").map_err(|_| GithubError::MissingRepository)?;
        Self::for_repository(&repository)
    }

    /// Build a config for an explicit "owner/name" spec; API URL and token
    /// still come from the environment.
    pub fn for_repository(spec: &str) -> Result<Self> {
        let (owner, repo) = split_repository(spec)?;
        Ok(GithubConfig {
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            owner,
            repo,
            token: std::env::var("GITHUB_TOKEN").ok(),
        })
    }

    /// Create config for a specific repository with the default API URL.
    pub fn new(owner: &str, repo: &str) -> Self {
        GithubConfig {
            api_url: "https://api.github.com".to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: None,
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

fn split_repository(spec: &str) -> Result<(String, String)> {
    match spec.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(GithubError::InvalidRepository(spec.to_string())),
    }
}

/// One page of the check-runs listing.
///
/// The API returns more fields per run than we model; serde ignores them.
#[derive(Debug, Deserialize)]
struct CheckRunsPage {
    total_count: u64,
    check_runs: Vec<CheckRun>,
}

const PER_PAGE: u32 = 100;

/// Client for the GitHub checks API
pub struct GithubChecksClient {
    config: GithubConfig,
    http: reqwest::Client,
}

impl GithubChecksClient {
    /// Create a new client
    pub fn new(config: GithubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("checkgate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GithubChecksClient { config, http })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GithubConfig::from_env()?)
    }

    /// List every check run attached to a commit, branch, or tag,
    /// following pagination.
    pub async fn list_check_runs(&self, git_ref: &str) -> Result<CheckSnapshot> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/check-runs",
            self.config.api_url, self.config.owner, self.config.repo, git_ref
        );

        let mut checks: Vec<CheckRun> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut request = self
                .http
                .get(&url)
                .header("Accept", "application/vnd.github+json")
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())]);

            if let Some(token) = &self.config.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GithubError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let batch: CheckRunsPage = response.json().await?;
            let total = batch.total_count as usize;
            let batch_len = batch.check_runs.len();
            checks.extend(batch.check_runs);

            if batch_len == 0 || checks.len() >= total {
                break;
            }
            page += 1;
        }

        debug!(
            event = "github.check_runs_listed",
            git_ref = %git_ref,
            count = checks.len(),
        );

        Ok(CheckSnapshot::new(checks))
    }
}

/// Binds a client to one git ref so the poll loop can fetch snapshots.
pub struct GithubSnapshotProvider {
    client: GithubChecksClient,
    git_ref: String,
}

impl GithubSnapshotProvider {
    pub fn new(client: GithubChecksClient, git_ref: impl Into<String>) -> Self {
        Self {
            client,
            git_ref: git_ref.into(),
        }
    }
}

#[async_trait]
impl SnapshotProvider for GithubSnapshotProvider {
    async fn fetch(&self) -> checkgate_core::Result<CheckSnapshot> {
        self.client
            .list_check_runs(&self.git_ref)
            .await
            .map_err(|err| CheckGateError::Provider(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkgate_core::{CheckConclusion, CheckStatus};

    #[test]
    fn test_split_repository() {
        let (owner, repo) = split_repository("stevedores-org/checkgate").expect("split");
        assert_eq!(owner, "stevedores-org");
        assert_eq!(repo, "checkgate");
    }

    #[test]
    fn test_split_repository_rejects_malformed() {
        assert!(split_repository("no-slash").is_err());
        assert!(split_repository("/repo").is_err());
        assert!(split_repository("owner/").is_err());
        assert!(split_repository("a/b/c").is_err());
    }

    #[test]
    fn test_config_new_and_token() {
        let config = GithubConfig::new("stevedores-org", "checkgate").with_token("secret");
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.token, Some("secret".to_string()));
    }

    #[test]
    fn test_client_builds() {
        let client = GithubChecksClient::new(GithubConfig::new("o", "r"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_check_runs_page_deserializes_api_payload() {
        // Trimmed real-shaped payload; unknown fields must be ignored.
        let payload = r#"{
            "total_count": 3,
            "check_runs": [
                {
                    "id": 4,
                    "name": "Trigger TeamCity Build (windows)",
                    "head_sha": "ce587453ced02b1526dfb4cb910479d431683101",
                    "status": "completed",
                    "conclusion": "failure",
                    "started_at": "2026-08-07T08:00:00Z",
                    "completed_at": "2026-08-07T08:14:00Z"
                },
                {
                    "id": 5,
                    "name": "Trigger TeamCity Build (linux)",
                    "status": "in_progress",
                    "conclusion": null,
                    "started_at": "2026-08-07T08:00:00Z",
                    "completed_at": null
                },
                {
                    "id": 6,
                    "name": "Security Scanning / Dependency Review",
                    "status": "queued",
                    "conclusion": null
                }
            ]
        }"#;

        let page: CheckRunsPage = serde_json::from_str(payload).expect("deserialize");
        assert_eq!(page.total_count, 3);
        assert_eq!(page.check_runs.len(), 3);

        let windows = &page.check_runs[0];
        assert_eq!(windows.status, CheckStatus::Completed);
        assert_eq!(windows.conclusion, Some(CheckConclusion::Failure));
        assert!(windows.completed_at.is_some());

        let linux = &page.check_runs[1];
        assert_eq!(linux.status, CheckStatus::InProgress);
        assert!(linux.conclusion.is_none());
    }
}
