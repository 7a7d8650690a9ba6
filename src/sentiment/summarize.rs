//! Commit message summarization with a truncation fallback.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SummarizerError;

/// Hosted BART summarization model.
pub const DEFAULT_SUMMARIZER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// Characters of the raw message kept when summarization fails.
pub const FALLBACK_SUMMARY_CHARS: usize = 200;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Length bounds (in model tokens) passed to the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryBounds {
    pub max_length: usize,
    pub min_length: usize,
}

impl SummaryBounds {
    /// Bounds scaled to the input: one less than its word count, kept
    /// within 10..=50, with the minimum at half the maximum (at least 5).
    pub fn for_text(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        let max_length = word_count.saturating_sub(1).clamp(10, 50);
        let min_length = (max_length / 2).max(5);
        Self {
            max_length,
            min_length,
        }
    }
}

/// A text-summarization service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String, SummarizerError>;
}

/// Summarize `text`, falling back to its first 200 characters on any error.
pub async fn summarize_or_truncate(summarizer: &dyn Summarizer, text: &str) -> String {
    match summarizer.summarize(text, SummaryBounds::for_text(text)).await {
        Ok(summary) if !summary.trim().is_empty() => summary,
        Ok(_) => {
            warn!("Summarization failed, using original text: {}", SummarizerError::EmptySummary);
            truncate_chars(text, FALLBACK_SUMMARY_CHARS)
        }
        Err(e) => {
            warn!("Summarization failed, using original text: {}", e);
            truncate_chars(text, FALLBACK_SUMMARY_CHARS)
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct InferenceSummary {
    summary_text: String,
}

/// Summarizer backed by a Hugging Face inference endpoint.
pub struct HuggingFaceSummarizer {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HuggingFaceSummarizer {
    pub fn new(endpoint: &str, api_token: Option<String>) -> Result<Self, SummarizerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(SummarizerError::Request)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_token,
        })
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String, SummarizerError> {
        let body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: bounds.max_length,
                min_length: bounds.min_length,
                do_sample: false,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(SummarizerError::Request)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let summaries: Vec<InferenceSummary> = response
            .json()
            .await
            .map_err(|e| SummarizerError::InvalidResponse(e.to_string()))?;

        let summary = summaries
            .into_iter()
            .next()
            .map(|s| s.summary_text.trim().to_string())
            .ok_or_else(|| SummarizerError::InvalidResponse("empty result list".to_string()))?;

        if summary.is_empty() {
            return Err(SummarizerError::EmptySummary);
        }
        Ok(summary)
    }
}
