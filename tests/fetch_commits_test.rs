//! Integration tests for latest-commit fetching against a mocked GitHub API.

mod common;

use std::time::Duration;

use common::{mock_client, mock_commit, mock_commit_detail};
use serde_json::Value;
use shipsignal::error::GitHubError;
use shipsignal::github::{
    CommitSource, FileStatus, GitHubCommitSource, RepositoryId, fetch_latest_with_client,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(10);

fn repo() -> RepositoryId {
    "owner/repo".parse().unwrap()
}

#[tokio::test]
async fn test_fetches_latest_commit_with_files() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![mock_commit(
            &server,
            "owner/repo",
            "222",
            "Add sharding feature",
        )]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits/222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_commit_detail(
            "222",
            &[("src/shard.rs", "added"), ("src/old.rs", "removed"), ("README.md", "modified")],
        )))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let commit = fetch_latest_with_client(&client, &repo(), TIMEOUT)
        .await
        .expect("fetch should succeed");

    assert_eq!(commit.sha, "222");
    assert_eq!(commit.message, "Add sharding feature");
    assert_eq!(commit.url, "https://github.com/owner/repo/commit/222");
    assert!(commit.committed_at.is_some());
    assert_eq!(commit.changed_files.len(), 3);
    assert_eq!(commit.changed_files[0].filename, "src/shard.rs");
    assert_eq!(commit.changed_files[0].status, FileStatus::Added);
    assert_eq!(commit.changed_files[1].status, FileStatus::Removed);
    assert_eq!(commit.changed_files[2].status, FileStatus::Modified);
}

#[tokio::test]
async fn test_takes_first_element_of_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            mock_commit(&server, "owner/repo", "newest", "newest"),
            mock_commit(&server, "owner/repo", "older", "older"),
        ]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits/newest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_commit_detail("newest", &[])))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let commit = fetch_latest_with_client(&client, &repo(), TIMEOUT).await.unwrap();
    assert_eq!(commit.sha, "newest");
}

#[tokio::test]
async fn test_detail_failure_degrades_to_empty_files() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![mock_commit(
            &server,
            "owner/repo",
            "222",
            "fix vulnerability in parser",
        )]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits/222"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let commit = fetch_latest_with_client(&client, &repo(), TIMEOUT)
        .await
        .expect("detail failure must not fail the fetch");

    assert_eq!(commit.sha, "222");
    assert!(commit.changed_files.is_empty());
}

#[tokio::test]
async fn test_empty_commit_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Value>::new()))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let result = fetch_latest_with_client(&client, &repo(), TIMEOUT).await;
    assert!(matches!(result, Err(GitHubError::NoCommits(r)) if r == "owner/repo"));
}

#[tokio::test]
async fn test_repository_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let result = fetch_latest_with_client(&client, &repo(), TIMEOUT).await;

    match result.unwrap_err() {
        GitHubError::RepositoryNotFound(name) => assert_eq!(name, "owner/repo"),
        other => panic!("Expected RepositoryNotFound error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "message": "API rate limit exceeded for user",
            "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
        })))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let result = fetch_latest_with_client(&client, &repo(), TIMEOUT).await;

    match result.unwrap_err() {
        GitHubError::RateLimited { repo } => assert_eq!(repo, "owner/repo"),
        other => panic!("Expected RateLimited error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_a_request_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let result = fetch_latest_with_client(&client, &repo(), TIMEOUT).await;

    match result.unwrap_err() {
        GitHubError::FetchCommits { repo, .. } => assert_eq!(repo, "owner/repo"),
        other => panic!("Expected FetchCommits error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_list_request_is_sent_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let source = GitHubCommitSource::new("ghp_test", Some(&server.uri())).unwrap();
    assert!(source.fetch_latest(&repo()).await.is_none());

    server.verify().await;
}

#[tokio::test]
async fn test_failed_detail_request_is_sent_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![mock_commit(
            &server,
            "owner/repo",
            "abc",
            "docs",
        )]))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits/abc"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let source = GitHubCommitSource::new("ghp_test", Some(&server.uri())).unwrap();
    let commit = source.fetch_latest(&repo()).await.expect("commit expected");
    assert!(commit.changed_files.is_empty());

    server.verify().await;
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(Vec::<Value>::new())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = mock_client(&server).await;
    let result = fetch_latest_with_client(&client, &repo(), Duration::from_millis(200)).await;
    assert!(matches!(result, Err(GitHubError::Timeout(_, _))));
}

#[tokio::test]
async fn test_source_reports_failures_as_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = GitHubCommitSource::with_client(mock_client(&server).await);
    assert!(source.fetch_latest(&repo()).await.is_none());
}

#[tokio::test]
async fn test_source_honours_custom_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(Vec::<Value>::new())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let source = GitHubCommitSource::with_client(mock_client(&server).await)
        .with_timeout(Duration::from_millis(200));

    let started = std::time::Instant::now();
    assert!(source.fetch_latest(&repo()).await.is_none());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_source_built_from_token_and_base_uri() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![mock_commit(
            &server,
            "owner/repo",
            "abc",
            "docs",
        )]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_commit_detail("abc", &[])))
        .mount(&server)
        .await;

    let source = GitHubCommitSource::new("ghp_test", Some(&server.uri())).unwrap();
    let commit = source.fetch_latest(&repo()).await.expect("commit expected");
    assert_eq!(commit.sha, "abc");

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0]
        .headers
        .get("authorization")
        .expect("authorization header should be sent");
    assert!(auth.to_str().unwrap().contains("ghp_test"));
}
