//! Last-seen commit per repository.

use std::collections::HashMap;

use crate::github::RepositoryId;

/// In-memory map from repository to the last commit sha alerted on.
///
/// Lives as long as the process; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    last_seen: HashMap<RepositoryId, String>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `repo` has no recorded sha or a different one.
    pub fn is_new(&self, repo: &RepositoryId, sha: &str) -> bool {
        self.last_seen.get(repo).is_none_or(|seen| seen != sha)
    }

    pub fn record(&mut self, repo: RepositoryId, sha: impl Into<String>) {
        self.last_seen.insert(repo, sha.into());
    }

    pub fn last_seen(&self, repo: &RepositoryId) -> Option<&str> {
        self.last_seen.get(repo).map(String::as_str)
    }
}
