//! GitHub API operations using octocrab.

pub mod commits;
pub mod repository;

pub use commits::{
    ChangedFile, Commit, CommitSource, FileStatus, GitHubCommitSource, fetch_latest_with_client,
};
pub use repository::RepositoryId;
