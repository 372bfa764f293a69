//! Shared data models for the episode split engine.
//!
//! This crate provides Serde-serializable types for:
//! - Transition candidates and selection windows
//! - Split point and selection policies
//! - Segment boundaries
//! - Encoding configuration
//! - Batch progress events

pub mod encoding;
pub mod event;
pub mod timestamp;
pub mod transition;

// Re-export common types
pub use encoding::EncodingConfig;
pub use event::{BatchEvent, ProgressUpdate};
pub use timestamp::format_seconds;
pub use transition::{
    split_boundaries, DurationBand, SelectionPolicy, SelectionWindow, SplitBoundary,
    SplitPointPolicy, TransitionCandidate,
};
