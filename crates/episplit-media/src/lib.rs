//! FFmpeg CLI wrapper for the episode split engine.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Blackout interval detection via the `blackdetect` filter
//! - Duration probing via ffprobe
//! - Segment extraction, re-encode, remux, and concatenation

pub mod blackdetect;
pub mod command;
pub mod error;
pub mod probe;
pub mod segment;

pub use blackdetect::{detect_black_intervals, DetectionSensitivity};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use probe::{get_duration, probe_video, VideoInfo};
pub use segment::{
    concat_clips, convert_container, extract_intro, extract_segment, extract_segment_reencoded,
};
