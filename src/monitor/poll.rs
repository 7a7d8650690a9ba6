//! One polling cycle and the endless loop around it.

use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::github::{CommitSource, RepositoryId};
use crate::notify::{DeliveryReport, Notifier, format_alert, join_alerts};
use crate::sentiment::{Classifier, SentimentLabel};

use super::tracker::ChangeTracker;

/// Default pause between cycles (5 minutes).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// When the tracker is advanced relative to delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryGuarantee {
    /// Record commits as seen before delivery. A failed delivery drops
    /// those alerts; nothing is ever sent twice.
    #[default]
    AtMostOnce,
    /// Record commits only after every chunk was delivered. A failed
    /// delivery re-alerts next cycle, possibly duplicating sent chunks.
    AtLeastOnce,
}

impl FromStr for DeliveryGuarantee {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "at-most-once" => Ok(DeliveryGuarantee::AtMostOnce),
            "at-least-once" => Ok(DeliveryGuarantee::AtLeastOnce),
            _ => Err(ConfigError::InvalidDeliveryMode(s.to_string())),
        }
    }
}

/// A commit alerted on during a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCommit {
    pub repo: RepositoryId,
    pub sha: String,
    pub label: SentimentLabel,
}

/// What happened during one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub new_commits: Vec<NewCommit>,
    pub unchanged: usize,
    pub fetch_failures: usize,
    /// `None` when there was nothing to send.
    pub delivery: Option<DeliveryReport>,
}

/// Polls repositories, classifies new commits and sends alerts.
pub struct Monitor {
    repos: Vec<RepositoryId>,
    source: Arc<dyn CommitSource>,
    classifier: Classifier,
    notifier: Notifier,
    tracker: ChangeTracker,
    interval: Duration,
    guarantee: DeliveryGuarantee,
}

impl Monitor {
    pub fn new(
        repos: Vec<RepositoryId>,
        source: Arc<dyn CommitSource>,
        classifier: Classifier,
        notifier: Notifier,
    ) -> Self {
        Self {
            repos,
            source,
            classifier,
            notifier,
            tracker: ChangeTracker::new(),
            interval: DEFAULT_POLL_INTERVAL,
            guarantee: DeliveryGuarantee::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_guarantee(mut self, guarantee: DeliveryGuarantee) -> Self {
        self.guarantee = guarantee;
        self
    }

    /// Start from an existing tracker instead of an empty one.
    pub fn with_tracker(mut self, tracker: ChangeTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    /// Run one cycle over every repository, in configuration order.
    ///
    /// A repository whose fetch fails is skipped without touching the
    /// tracker. New commits are batched into a single delivery.
    pub async fn poll_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        let mut alerts = Vec::new();
        let mut pending = Vec::new();

        for repo in &self.repos {
            let Some(commit) = self.source.fetch_latest(repo).await else {
                report.fetch_failures += 1;
                continue;
            };

            if !self.tracker.is_new(repo, &commit.sha) {
                report.unchanged += 1;
                continue;
            }

            let result = self
                .classifier
                .classify(&commit.message, &commit.changed_files)
                .await;

            let committed = commit
                .committed_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "unknown time".to_string());
            info!(
                "New commit {} on {} at {}: {} ({} changed files)",
                commit.sha,
                repo,
                committed,
                result.label.as_str(),
                commit.changed_files.len()
            );

            alerts.push(format_alert(repo, &commit, &result));
            report.new_commits.push(NewCommit {
                repo: repo.clone(),
                sha: commit.sha.clone(),
                label: result.label,
            });

            match self.guarantee {
                DeliveryGuarantee::AtMostOnce => self.tracker.record(repo.clone(), commit.sha),
                DeliveryGuarantee::AtLeastOnce => pending.push((repo.clone(), commit.sha)),
            }
        }

        if alerts.is_empty() {
            return report;
        }

        let delivery = self.notifier.deliver(&join_alerts(&alerts)).await;

        if self.guarantee == DeliveryGuarantee::AtLeastOnce {
            if delivery.is_complete() {
                for (repo, sha) in pending {
                    self.tracker.record(repo, sha);
                }
            } else {
                warn!(
                    "Delivery incomplete ({} chunk(s) failed); {} commit(s) will be re-sent next cycle",
                    delivery.failed,
                    pending.len()
                );
            }
        }

        report.delivery = Some(delivery);
        report
    }

    /// Poll forever, sleeping the configured interval after each cycle.
    pub async fn run(&mut self) -> Infallible {
        info!(
            "Watching {} repositories every {}s",
            self.repos.len(),
            self.interval.as_secs()
        );

        loop {
            let report = self.poll_cycle().await;
            info!(
                "Cycle done: {} new, {} unchanged, {} fetch failure(s)",
                report.new_commits.len(),
                report.unchanged,
                report.fetch_failures
            );
            tokio::time::sleep(self.interval).await;
        }
    }
}
