//! Latest-commit fetching via octocrab.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::GitHubError;

use super::RepositoryId;

/// Default timeout for a single GitHub request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The newest commit of a repository, with its changed files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    /// Web URL of the commit, linked from alerts.
    pub url: String,
    /// API URL of the commit detail resource.
    pub detail_url: String,
    pub committed_at: Option<DateTime<Utc>>,
    pub changed_files: Vec<ChangedFile>,
}

/// A file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    pub status: FileStatus,
}

impl ChangedFile {
    pub fn new(filename: impl Into<String>, status: FileStatus) -> Self {
        Self {
            filename: filename.into(),
            status,
        }
    }
}

/// File status as reported by the commit detail API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

/// Source of the latest commit for a repository.
///
/// Implementations never fail: any error is logged and reported as `None`,
/// and the poll loop tries again next cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitSource: Send + Sync {
    async fn fetch_latest(&self, repo: &RepositoryId) -> Option<Commit>;
}

/// Commit list element; only the fields we read.
#[derive(Debug, Deserialize)]
struct CommitListItem {
    sha: String,
    html_url: String,
    url: String,
    commit: CommitBody,
}

#[derive(Debug, Deserialize)]
struct CommitBody {
    message: String,
    committer: Option<GitSignature>,
}

#[derive(Debug, Deserialize)]
struct GitSignature {
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    files: Vec<ChangedFile>,
}

#[derive(Serialize)]
struct ListParams {
    per_page: u8,
}

/// GitHub-backed commit source.
pub struct GitHubCommitSource {
    client: Octocrab,
    timeout: Duration,
}

impl GitHubCommitSource {
    /// Build a source authenticated with a personal access token.
    ///
    /// `base_uri` overrides the API root (GitHub Enterprise, tests).
    /// octocrab's retry layer is disabled: a failed request is reported
    /// once and the repository is retried on the next cycle.
    pub fn new(token: &str, base_uri: Option<&str>) -> Result<Self, GitHubError> {
        let mut builder = Octocrab::builder()
            .personal_token(token.to_string())
            .add_retry_config(RetryConfig::None);
        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;
        }
        let client = builder
            .build()
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;

        Ok(Self::with_client(client))
    }

    /// Use a pre-configured octocrab client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(client: Octocrab) -> Self {
        Self {
            client,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Bound each GitHub request by `timeout` instead of the default 10s.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CommitSource for GitHubCommitSource {
    async fn fetch_latest(&self, repo: &RepositoryId) -> Option<Commit> {
        match fetch_latest_with_client(&self.client, repo, self.timeout).await {
            Ok(commit) => Some(commit),
            Err(e) => {
                warn!("Error fetching commits for {}: {}", repo, e);
                None
            }
        }
    }
}

/// Fetch the newest commit of `repo` and its changed-file list.
///
/// The commit list is requested newest-first with a page size of one. A
/// failed detail request does not fail the fetch: the commit is returned
/// with an empty file list and a warning is logged.
pub async fn fetch_latest_with_client(
    client: &Octocrab,
    repo: &RepositoryId,
    request_timeout: Duration,
) -> Result<Commit, GitHubError> {
    let route = format!("/repos/{}/{}/commits", repo.owner(), repo.name());
    let timeout_secs = request_timeout.as_secs();

    let items: Vec<CommitListItem> = timeout(
        request_timeout,
        client.get(&route, Some(&ListParams { per_page: 1 })),
    )
    .await
    .map_err(|_| GitHubError::Timeout(repo.to_string(), timeout_secs))?
    .map_err(|e| classify_error(repo, e))?;

    let latest = items
        .into_iter()
        .next()
        .ok_or_else(|| GitHubError::NoCommits(repo.to_string()))?;

    let changed_files = match fetch_changed_files(client, &latest.url, request_timeout).await {
        Ok(files) => files,
        Err(e) => {
            warn!(
                "Could not fetch changed files for {}@{}, continuing without them: {}",
                repo, latest.sha, e
            );
            Vec::new()
        }
    };

    debug!(
        "Latest commit for {} is {} ({} changed files)",
        repo,
        latest.sha,
        changed_files.len()
    );

    Ok(Commit {
        sha: latest.sha,
        message: latest.commit.message,
        url: latest.html_url,
        detail_url: latest.url,
        committed_at: latest.commit.committer.and_then(|c| c.date),
        changed_files,
    })
}

async fn fetch_changed_files(
    client: &Octocrab,
    detail_url: &str,
    request_timeout: Duration,
) -> Result<Vec<ChangedFile>, GitHubError> {
    let detail: CommitDetail = timeout(request_timeout, client.get(detail_url, None::<&()>))
        .await
        .map_err(|_| GitHubError::Timeout(detail_url.to_string(), request_timeout.as_secs()))?
        .map_err(|e| GitHubError::FetchDetail {
            url: detail_url.to_string(),
            source: Box::new(e),
        })?;

    Ok(detail.files)
}

fn classify_error(repo: &RepositoryId, e: octocrab::Error) -> GitHubError {
    // Check error content using both Display and Debug output
    // to handle different octocrab error formats
    let err_display = e.to_string();
    let err_debug = format!("{:?}", e);

    if err_display.to_lowercase().contains("rate limit")
        || err_debug.to_lowercase().contains("rate limit")
    {
        return GitHubError::RateLimited {
            repo: repo.to_string(),
        };
    }
    if err_display.contains("Not Found") || err_debug.contains("Not Found") {
        return GitHubError::RepositoryNotFound(repo.to_string());
    }
    GitHubError::FetchCommits {
        repo: repo.to_string(),
        source: Box::new(e),
    }
}
