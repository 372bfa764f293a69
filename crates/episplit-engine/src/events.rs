//! Event sinks and cooperative cancellation.
//!
//! The batch driver reports through two decoupled channels: a typed event
//! sink and an optional `(message, percentage)` progress callback. Free-text
//! logging is one sink implementation, not the primary channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use episplit_models::{BatchEvent, ProgressUpdate};

/// Receiver of typed batch events, injected into the driver.
///
/// `emit` runs on the driver's task; implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &BatchEvent);
}

/// Sink that renders events as log lines.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &BatchEvent) {
        match event {
            BatchEvent::FileStarted { file, index, total } => {
                info!("Processing {}/{}: {}", index + 1, total, file);
            }
            BatchEvent::TransitionFound {
                file,
                start,
                end,
                duration,
            } => {
                info!(
                    file = %file,
                    "Selected transition at {} - {} (duration: {:.2}s)",
                    episplit_models::format_seconds(*start),
                    episplit_models::format_seconds(*end),
                    duration
                );
            }
            BatchEvent::SplitCompleted { file, outputs } => {
                info!(file = %file, outputs = outputs.len(), "Video splitting completed");
            }
            BatchEvent::FileCopied { file, output } => {
                info!(file = %file, output = %output, "Copied single episode to output");
            }
            BatchEvent::FileSkipped { file, reason } => {
                warn!(file = %file, reason = %reason, "Skipping file");
            }
            BatchEvent::BatchFinished {
                completed,
                total,
                cancelled,
            } => {
                if *cancelled {
                    info!(completed, total, "Processing cancelled by user");
                } else {
                    info!(completed, total, "All videos processed");
                }
            }
        }
    }
}

/// Sink that forwards events into an unbounded channel.
///
/// Suited for a UI event loop polling on its own schedule. A dropped
/// receiver just discards further events.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<BatchEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: &BatchEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// `(message, percentage)` callback; either half of an update may be absent.
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Cooperative cancellation flag.
///
/// Observed at file boundaries only: a set flag stops the batch before the
/// next file starts, but never interrupts an in-flight external-tool call.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Already-produced outputs are retained.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_flag_is_shared() {
        let flag = CancellationFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_requested());
        clone.request();
        assert!(flag.is_requested());
    }

    #[test]
    fn test_channel_sink_forwards_events() {
        let (sink, mut rx) = ChannelSink::new();
        sink.emit(&BatchEvent::BatchFinished {
            completed: 2,
            total: 5,
            cancelled: true,
        });
        match rx.try_recv().unwrap() {
            BatchEvent::BatchFinished {
                completed,
                total,
                cancelled,
            } => {
                assert_eq!(completed, 2);
                assert_eq!(total, 5);
                assert!(cancelled);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.emit(&BatchEvent::FileSkipped {
            file: "x.mkv".into(),
            reason: "test".into(),
        });
    }
}
