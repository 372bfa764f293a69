//! Typed batch progress events.

use serde::{Deserialize, Serialize};

/// Progress events emitted by the batch driver through an injected sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// A file's pipeline has started
    FileStarted {
        file: String,
        /// Zero-based position in the batch
        index: usize,
        total: usize,
    },

    /// A split point was chosen for a dual-episode file
    TransitionFound {
        file: String,
        /// Blackout start in seconds
        start: f64,
        /// Blackout end in seconds
        end: f64,
        /// Blackout length in seconds
        duration: f64,
    },

    /// Both segments of a dual-episode file were written
    SplitCompleted { file: String, outputs: Vec<String> },

    /// A single-episode file was copied to the output folder
    FileCopied { file: String, output: String },

    /// A file was skipped; the batch continues
    FileSkipped { file: String, reason: String },

    /// The batch ran to completion or was cancelled
    BatchFinished {
        completed: usize,
        total: usize,
        cancelled: bool,
    },
}

/// A `(message, percentage)` progress pair.
///
/// Either field may be absent: a message-only update is a log line, a
/// percentage-only update advances a progress bar. Within one batch the
/// percentage never regresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl ProgressUpdate {
    /// Log-only update.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            percentage: None,
        }
    }

    /// Percentage-only update.
    pub fn percentage(percentage: f64) -> Self {
        Self {
            message: None,
            percentage: Some(percentage),
        }
    }

    /// Combined update.
    pub fn new(message: impl Into<String>, percentage: f64) -> Self {
        Self {
            message: Some(message.into()),
            percentage: Some(percentage),
        }
    }
}
