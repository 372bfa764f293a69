//! Transition selection.
//!
//! Filters detected blackout candidates to the expected-boundary window and
//! applies one policy to pick at most one split point per file.

use tracing::debug;

use episplit_models::{DurationBand, SelectionPolicy, SelectionWindow, TransitionCandidate};

/// Scoring knobs for [`SelectionPolicy::ScoredBest`].
#[derive(Debug, Clone, Copy)]
pub struct ScoringParams {
    /// Candidates closer than this (seconds) penalize each other
    pub isolation_window: f64,
    /// Blackout lengths that score zero duration penalty
    pub ideal_duration_band: DurationBand,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            isolation_window: 5.0,
            ideal_duration_band: DurationBand::new(0.5, 2.0),
        }
    }
}

/// Pick at most one transition from the candidates.
///
/// Candidates whose start lies outside the window are discarded first; an
/// empty window yields `None` and the file is not split.
pub fn select_transition<'a>(
    candidates: &'a [TransitionCandidate],
    window: &SelectionWindow,
    policy: SelectionPolicy,
    params: &ScoringParams,
) -> Option<&'a TransitionCandidate> {
    let filtered: Vec<&TransitionCandidate> = candidates
        .iter()
        .filter(|c| window.contains(c.start))
        .collect();

    if filtered.is_empty() {
        debug!(
            target_time = window.target,
            margin = window.margin,
            "No transition candidates inside the selection window"
        );
        return None;
    }

    let chosen = match policy {
        SelectionPolicy::ScoredBest => scored_best(&filtered, window, params),
        SelectionPolicy::SelectLatest => extreme_by_start(&filtered, |a, b| a > b),
        SelectionPolicy::SelectEarliest => extreme_by_start(&filtered, |a, b| a < b),
    };

    if let Some(candidate) = chosen {
        debug!(
            start = candidate.start,
            duration = candidate.duration,
            ?policy,
            "Selected transition"
        );
    }
    chosen
}

/// Minimum composite score wins; ties break toward the earliest start.
fn scored_best<'a>(
    filtered: &[&'a TransitionCandidate],
    window: &SelectionWindow,
    params: &ScoringParams,
) -> Option<&'a TransitionCandidate> {
    let mut best: Option<(&TransitionCandidate, f64)> = None;
    for candidate in filtered {
        let total = score(candidate, filtered, window, params);
        debug!(
            start = candidate.start,
            score = format!("{:.2}", total),
            "Scored transition candidate"
        );
        let replace = match best {
            None => true,
            Some((current, current_score)) => {
                total < current_score || (total == current_score && candidate.start < current.start)
            }
        };
        if replace {
            best = Some((candidate, total));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Composite score: proximity to the target, duration fit, and a penalty
/// for clustered blackouts (rapid strobe cuts look like many candidates in
/// a few seconds; a real boundary is isolated).
fn score(
    candidate: &TransitionCandidate,
    filtered: &[&TransitionCandidate],
    window: &SelectionWindow,
    params: &ScoringParams,
) -> f64 {
    let time_score = (candidate.start - window.target).abs() / window.margin;
    let duration_score = params.ideal_duration_band.distance(candidate.duration);
    let neighbours = filtered
        .iter()
        .filter(|other| {
            other.start != candidate.start
                && (other.start - candidate.start).abs() < params.isolation_window
        })
        .count();

    time_score + duration_score + 0.5 * neighbours as f64
}

fn extreme_by_start<'a>(
    filtered: &[&'a TransitionCandidate],
    prefer: fn(f64, f64) -> bool,
) -> Option<&'a TransitionCandidate> {
    let mut best: Option<&TransitionCandidate> = None;
    for candidate in filtered {
        match best {
            Some(current) if !prefer(candidate.start, current.start) => {}
            _ => best = Some(candidate),
        }
    }
    best
}
