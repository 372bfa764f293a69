//! Blackout interval detection via FFmpeg's `blackdetect` filter.
//!
//! The filter reports intervals of near-uniform darkness on the diagnostic
//! stream; each qualifying interval becomes a transition candidate for the
//! selector.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use episplit_models::{DurationBand, TransitionCandidate};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// The three knobs of the `blackdetect` filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionSensitivity {
    /// Minimum blackout length in seconds (`d`)
    pub min_black_duration: f64,
    /// Luminance below which a pixel counts as dark (`pix_th`)
    pub pixel_threshold: f64,
    /// Fraction of the frame that must be dark (`pic_th`)
    pub picture_threshold: f64,
}

impl Default for DetectionSensitivity {
    fn default() -> Self {
        Self {
            min_black_duration: 0.2,
            pixel_threshold: 0.15,
            picture_threshold: 0.95,
        }
    }
}

impl DetectionSensitivity {
    /// Render the filter expression.
    pub fn to_filter(&self) -> String {
        format!(
            "blackdetect=d={}:pix_th={}:pic_th={}",
            self.min_black_duration, self.pixel_threshold, self.picture_threshold
        )
    }
}

/// Scan a video for blackout intervals.
///
/// Runs the external tool to completion (minutes for a full-length file)
/// and parses its diagnostic stream. Malformed report lines are logged and
/// skipped. A missing tool or non-zero exit surfaces as a `MediaError`;
/// callers treat that as "no transitions found", not a fatal job error.
pub async fn detect_black_intervals(
    path: impl AsRef<Path>,
    sensitivity: &DetectionSensitivity,
    band: &DurationBand,
) -> MediaResult<Vec<TransitionCandidate>> {
    let path = path.as_ref();
    info!(file = %path.display(), filter = %sensitivity.to_filter(), "Scanning for blackout intervals");

    // blackdetect reports at info level, so the default "error" verbosity
    // would swallow the lines we parse
    let cmd = FfmpegCommand::new(path, "-")
        .log_level("info")
        .video_filter(sensitivity.to_filter())
        .no_audio()
        .format("null");

    let stderr = FfmpegRunner::new().run_capturing_stderr(&cmd).await?;
    let candidates = parse_blackdetect_output(&stderr, band);

    info!(count = candidates.len(), "Blackout scan complete");
    Ok(candidates)
}

/// Parse the diagnostic stream into candidates within the duration band.
pub fn parse_blackdetect_output(stderr: &str, band: &DurationBand) -> Vec<TransitionCandidate> {
    let mut candidates = Vec::new();
    for line in stderr.lines() {
        if !line.contains("black_start:") {
            continue;
        }
        match parse_blackdetect_line(line) {
            Some(candidate) if band.contains(candidate.duration) => {
                debug!(
                    start = candidate.start,
                    end = candidate.end,
                    duration = candidate.duration,
                    "Found blackout interval"
                );
                candidates.push(candidate);
            }
            Some(candidate) => {
                debug!(
                    duration = candidate.duration,
                    "Blackout interval outside acceptance band"
                );
            }
            None => {
                warn!(line, "Skipping malformed blackdetect line");
            }
        }
    }
    candidates
}

/// Parse one `black_start:.. black_end:.. black_duration:..` line.
fn parse_blackdetect_line(line: &str) -> Option<TransitionCandidate> {
    let start = field(line, "black_start:")?;
    let end = field(line, "black_end:")?;
    let duration = field(line, "black_duration:")?;
    Some(TransitionCandidate::new(start, end, duration))
}

fn field(line: &str, key: &str) -> Option<f64> {
    let rest = &line[line.find(key)? + key.len()..];
    rest.split_whitespace().next()?.parse().ok()
}
