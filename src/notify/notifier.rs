//! Best-effort delivery of a batched alert message.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use super::format::{MAX_CHUNK_CHARS, escape_markdown, split_message};
use super::transport::ChatTransport;

/// Pause between consecutive chunks to stay under the chat rate limit.
pub const DEFAULT_CHUNK_PAUSE: Duration = Duration::from_secs(1);

/// How many chunks went out and how many failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

impl DeliveryReport {
    /// True when every chunk was accepted.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Escapes, splits and sends messages through a [`ChatTransport`].
pub struct Notifier {
    transport: Arc<dyn ChatTransport>,
    pause: Duration,
    max_chunk_chars: usize,
}

impl Notifier {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            pause: DEFAULT_CHUNK_PAUSE,
            max_chunk_chars: MAX_CHUNK_CHARS,
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Deliver `message`, escaped once as a whole and split into chunks.
    ///
    /// A failed chunk is logged and counted; the remaining chunks are still
    /// sent. Never returns an error.
    pub async fn deliver(&self, message: &str) -> DeliveryReport {
        let escaped = escape_markdown(message);
        let chunks = split_message(&escaped, self.max_chunk_chars);
        let mut report = DeliveryReport::default();

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.pause).await;
            }

            match self.transport.send(chunk).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!("Telegram API error on chunk {}/{}: {}", i + 1, chunks.len(), e);
                    report.failed += 1;
                }
            }
        }

        info!("Delivered {} of {} message chunk(s)", report.sent, chunks.len());
        report
    }
}
