//! Plain-text status reporting during connection attempts.

use tracing::info;

/// Sink for human-readable connection progress.
///
/// The retry loop reports each failed attempt here, line by line: the
/// attempt number, the failure detail when another attempt follows, and a
/// distinct terminal line when it gives up. Content is unstructured text;
/// implementations decide where it goes.
pub trait StatusSink: Send + Sync {
    /// Reports one line of progress or failure detail.
    fn message(&self, text: &str);
}

/// Default sink that forwards every line to the `tracing` log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn message(&self, text: &str) {
        info!(target: "jfr", "{text}");
    }
}
