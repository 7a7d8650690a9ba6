//! Alert formatting and chat delivery.

pub mod format;
pub mod notifier;
pub mod transport;

pub use format::{MAX_CHUNK_CHARS, escape_markdown, format_alert, join_alerts, split_message};
pub use notifier::{DeliveryReport, Notifier};
pub use transport::{ChatTransport, LogTransport, TelegramTransport};
