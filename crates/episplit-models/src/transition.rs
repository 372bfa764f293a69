//! Transition candidates, selection windows, and split boundaries.

use serde::{Deserialize, Serialize};

/// A detected interval of near-uniform darkness in a video stream.
///
/// Heuristic proxy for an episode boundary. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionCandidate {
    /// Interval start in seconds
    pub start: f64,
    /// Interval end in seconds
    pub end: f64,
    /// Interval length in seconds
    pub duration: f64,
}

impl TransitionCandidate {
    pub fn new(start: f64, end: f64, duration: f64) -> Self {
        Self {
            start,
            end,
            duration,
        }
    }
}

/// Time range around the expected episode boundary.
///
/// Candidates whose start falls outside `[target - margin, target + margin]`
/// are discarded before any scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionWindow {
    /// Expected boundary time in seconds
    pub target: f64,
    /// Half-width of the window in seconds
    pub margin: f64,
}

impl SelectionWindow {
    pub fn new(target: f64, margin: f64) -> Self {
        Self { target, margin }
    }

    /// Whether a time falls inside the window.
    pub fn contains(&self, t: f64) -> bool {
        (t - self.target).abs() <= self.margin
    }
}

/// How a single transition is chosen from the candidates inside the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Composite score of target proximity, duration fit, and isolation
    #[default]
    ScoredBest,
    /// Greatest start time inside the window
    SelectLatest,
    /// Smallest start time inside the window
    SelectEarliest,
}

/// Where the second segment begins relative to the chosen blackout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPointPolicy {
    /// Second segment starts where the blackout starts; the fade stays
    /// attached to episode 2's lead-in
    #[default]
    AtStartOfFade,
    /// Second segment starts where the blackout ends; the fade is trimmed
    /// out entirely
    AfterFade,
}

/// An inclusive range of blackout lengths.
///
/// Used both as the acceptance band gating which detected intervals become
/// candidates at all, and as the ideal band inside which a candidate's
/// duration score is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationBand {
    pub min: f64,
    pub max: f64,
}

impl DurationBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, duration: f64) -> bool {
        self.min <= duration && duration <= self.max
    }

    /// Distance to the nearer band edge; zero inside the band.
    pub fn distance(&self, duration: f64) -> f64 {
        if self.contains(duration) {
            0.0
        } else {
            (duration - self.min).abs().min((duration - self.max).abs())
        }
    }
}

/// One contiguous half-open time range extracted as a standalone segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitBoundary {
    /// Segment start in seconds (inclusive)
    pub start: f64,
    /// Segment end in seconds (exclusive)
    pub end: f64,
}

impl SplitBoundary {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Segment length in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Compute the two output boundaries for a dual-episode file.
///
/// The first boundary is always `[0, cut.start)`. The second ends at
/// `total_duration` and starts at `cut.start` or `cut.end` depending on
/// `policy`.
pub fn split_boundaries(
    cut: &TransitionCandidate,
    total_duration: f64,
    policy: SplitPointPolicy,
) -> (SplitBoundary, SplitBoundary) {
    let second_start = match policy {
        SplitPointPolicy::AtStartOfFade => cut.start,
        SplitPointPolicy::AfterFade => cut.end,
    };
    (
        SplitBoundary::new(0.0, cut.start),
        SplitBoundary::new(second_start, total_duration),
    )
}
