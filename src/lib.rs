//! shipsignal - Watches GitHub repositories and posts sentiment-tagged commit alerts to Telegram.
//!
//! # Overview
//!
//! shipsignal polls a fixed list of repositories for their newest commit,
//! summarizes and labels each new commit as bullish, bearish or neutral,
//! and sends the batch of alerts for a cycle to a Telegram chat.

pub mod config;
pub mod error;
pub mod github;
pub mod monitor;
pub mod notify;
pub mod sentiment;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, DeliveryError, GitHubError, SummarizerError, SupervisorError};
pub use github::{ChangedFile, Commit, CommitSource, FileStatus, RepositoryId};
pub use monitor::{ChangeTracker, CycleReport, DeliveryGuarantee, Monitor, RestartPolicy};
pub use notify::{ChatTransport, DeliveryReport, Notifier};
pub use sentiment::{ClassificationResult, Classifier, SentimentLabel, Summarizer};
