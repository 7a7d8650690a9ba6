//! Commit sentiment classification: summarization, polarity and keyword heuristics.

pub mod classify;
pub mod polarity;
pub mod summarize;

pub use classify::{ClassificationResult, Classifier, SentimentLabel};
pub use polarity::PolarityScorer;
pub use summarize::{HuggingFaceSummarizer, Summarizer, SummaryBounds, summarize_or_truncate};
