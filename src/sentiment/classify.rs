//! Keyword and file-change heuristics for commit sentiment.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::github::{ChangedFile, FileStatus};

use super::polarity::PolarityScorer;
use super::summarize::{Summarizer, summarize_or_truncate};

/// Terms that mark a commit as bullish.
pub const BULLISH_TERMS: &[&str] = &[
    "scaling",
    "upgrade",
    "performance",
    "optimization",
    "security",
    "merge",
    "enhancement",
    "feature",
];

/// Terms that mark a commit as bearish.
pub const BEARISH_TERMS: &[&str] = &[
    "bug",
    "deprecated",
    "reverted",
    "removed",
    "issue",
    "vulnerability",
    "rollback",
    "fix",
];

/// Perceived market implication of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Bullish => "Bullish",
            SentimentLabel::Bearish => "Bearish",
            SentimentLabel::Neutral => "Neutral",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentLabel::Bullish => "📈",
            SentimentLabel::Bearish => "📉",
            SentimentLabel::Neutral => "⚖️",
        }
    }

    /// One-line explanation shown alongside the label.
    pub fn rationale(&self) -> &'static str {
        match self {
            SentimentLabel::Bullish => "New features or optimizations detected.",
            SentimentLabel::Bearish => "Bug fixes, deprecations, or rollbacks detected.",
            SentimentLabel::Neutral => "No strong indicators found.",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_str(), self.emoji())
    }
}

/// Outcome of classifying one commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub summary: String,
    pub label: SentimentLabel,
    pub rationale: String,
    /// Lexicon polarity of the raw message. Informational only; the label
    /// is decided by keywords and file changes.
    pub polarity: f64,
}

/// Decide the label for a commit message and its changed files.
///
/// Bullish wins over bearish: a commit that adds files is bullish even when
/// its message reads like a fix. Keywords match as case-insensitive
/// substrings, so "fix" also matches "prefix".
pub fn label_commit(message: &str, changed_files: &[ChangedFile]) -> SentimentLabel {
    let message = message.to_lowercase();
    let has_status = |status: FileStatus| changed_files.iter().any(|f| f.status == status);

    if BULLISH_TERMS.iter().any(|term| message.contains(term)) || has_status(FileStatus::Added) {
        SentimentLabel::Bullish
    } else if BEARISH_TERMS.iter().any(|term| message.contains(term))
        || has_status(FileStatus::Removed)
    {
        SentimentLabel::Bearish
    } else {
        SentimentLabel::Neutral
    }
}

/// Summarizes and labels commits.
pub struct Classifier {
    summarizer: Arc<dyn Summarizer>,
    scorer: PolarityScorer,
}

impl Classifier {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            summarizer,
            scorer: PolarityScorer::new(),
        }
    }

    /// Classify a commit. Never fails: summarizer errors fall back to the
    /// truncated message.
    pub async fn classify(&self, message: &str, changed_files: &[ChangedFile]) -> ClassificationResult {
        let summary = summarize_or_truncate(self.summarizer.as_ref(), message).await;
        let polarity = self.scorer.score(message);
        let label = label_commit(message, changed_files);

        debug!("Classified commit as {} (polarity {:.2})", label.as_str(), polarity);

        ClassificationResult {
            summary,
            label,
            rationale: label.rationale().to_string(),
            polarity,
        }
    }
}
