//! Alert text, MarkdownV2 escaping and size-limited chunking.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::github::{Commit, RepositoryId};
use crate::sentiment::ClassificationResult;

/// Largest chunk sent in one message. Telegram's ceiling is 4096.
pub const MAX_CHUNK_CHARS: usize = 4000;

/// Characters that carry meaning in Telegram MarkdownV2.
const MARKDOWN_SPECIAL: &str = "_*[]()~`>#+-=|{}.!";

static MARKDOWN_SPECIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[_*\[\]()~`>#+\-=|{}.!]").expect("markdown escape pattern is valid")
});

/// Render the alert for one new commit.
pub fn format_alert(repo: &RepositoryId, commit: &Commit, result: &ClassificationResult) -> String {
    format!(
        "🔔 **{repo} Update**\n\
         📝 {summary}\n\
         📊 Sentiment: {label}\n\
         🧐 Reason: {rationale}\n\
         🔗 [View Commit]({url})",
        summary = result.summary,
        label = result.label,
        rationale = result.rationale,
        url = commit.url,
    )
}

/// Join a cycle's alerts into one message, separated by blank lines.
pub fn join_alerts(alerts: &[String]) -> String {
    alerts.join("\n\n")
}

/// Prefix every MarkdownV2 control character with a backslash.
pub fn escape_markdown(text: &str) -> String {
    MARKDOWN_SPECIAL_RE.replace_all(text, r"\$0").into_owned()
}

fn is_markdown_special(c: char) -> bool {
    MARKDOWN_SPECIAL.contains(c)
}

/// Split `text` into contiguous chunks of at most `max_chars` characters.
///
/// A chunk never ends on a backslash that escapes the first character of
/// the next chunk; that chunk is one character shorter instead.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(2);
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());
        if end < chars.len() && chars[end - 1] == '\\' && is_markdown_special(chars[end]) {
            end -= 1;
        }
        chunks.push(chars[start..end].iter().collect());
        start = end;
    }

    chunks
}
