//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Helper to create an octocrab client pointing to a mock server.
///
/// Retries are off, matching `GitHubCommitSource::new`.
pub async fn mock_client(server: &MockServer) -> Octocrab {
    Octocrab::builder()
        .add_retry_config(RetryConfig::None)
        .base_uri(server.uri())
        .expect("Failed to set base URI")
        .build()
        .expect("Failed to build octocrab")
}

/// A commit list element as returned by `GET /repos/{owner}/{repo}/commits`.
pub fn mock_commit(server: &MockServer, repo: &str, sha: &str, message: &str) -> Value {
    json!({
        "sha": sha,
        "node_id": format!("C_{}", sha),
        "url": format!("{}/repos/{}/commits/{}", server.uri(), repo, sha),
        "html_url": format!("https://github.com/{}/commit/{}", repo, sha),
        "comments_url": format!("{}/repos/{}/commits/{}/comments", server.uri(), repo, sha),
        "commit": {
            "message": message,
            "author": {"name": "Dev", "email": "dev@example.com", "date": "2024-06-15T12:00:00Z"},
            "committer": {"name": "Dev", "email": "dev@example.com", "date": "2024-06-15T12:00:00Z"},
            "comment_count": 0
        },
        "parents": []
    })
}

/// A commit detail body with the given `(filename, status)` pairs.
pub fn mock_commit_detail(sha: &str, files: &[(&str, &str)]) -> Value {
    let files: Vec<Value> = files
        .iter()
        .map(|(filename, status)| {
            json!({
                "sha": "0000000000000000000000000000000000000000",
                "filename": filename,
                "status": status,
                "additions": 1,
                "deletions": 0,
                "changes": 1
            })
        })
        .collect();

    json!({
        "sha": sha,
        "commit": {"message": "ignored"},
        "files": files
    })
}

/// A successful Telegram `sendMessage` response.
pub fn telegram_ok() -> Value {
    json!({"ok": true, "result": {"message_id": 1}})
}
