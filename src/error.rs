//! Error types for shipsignal modules using thiserror.

use thiserror::Error;

/// Errors from GitHub API operations.
///
/// These never escape the commit fetcher: they are logged and the
/// repository is skipped for the current cycle.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Failed to build GitHub client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("Failed to fetch commits for {repo}: {source}")]
    FetchCommits {
        repo: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Failed to fetch commit detail {url}: {source}")]
    FetchDetail {
        url: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Rate limited by GitHub API while fetching {repo}")]
    RateLimited { repo: String },

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Repository {0} has no commits")]
    NoCommits(String),

    #[error("GitHub request for {0} timed out after {1} seconds")]
    Timeout(String, u64),
}

/// Errors from the text-summarization service.
#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("Summarizer request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Summarizer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Summarizer returned an unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Summarizer returned an empty summary")]
    EmptySummary,
}

/// Errors from chat message delivery.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Telegram request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Telegram rejected the message (HTTP {status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Errors from startup configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable(s): {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("Invalid repository identifier '{0}': expected owner/name")]
    InvalidRepository(String),

    #[error("REPOS does not name any repository")]
    NoRepositories,

    #[error("Invalid delivery mode '{0}': expected at-most-once or at-least-once")]
    InvalidDeliveryMode(String),
}

/// Errors from the poll-loop supervisor.
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Poll loop crashed {restarts} time(s) in a row; giving up. Last panic: {last_panic}")]
    RestartLimitReached { restarts: u32, last_panic: String },
}
