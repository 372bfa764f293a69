//! Engine configuration.
//!
//! One immutable value built per job and passed into each component's entry
//! point; nothing patches configuration at runtime.

use std::path::PathBuf;

use episplit_media::DetectionSensitivity;
use episplit_models::{
    DurationBand, EncodingConfig, SelectionPolicy, SelectionWindow, SplitPointPolicy,
};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Folder scanned for input recordings
    pub input_folder: PathBuf,
    /// Folder receiving the named outputs
    pub output_folder: PathBuf,
    /// Episode catalog CSV path
    pub catalog_path: PathBuf,
    /// Intro clip length in seconds; zero or negative disables intro
    /// concatenation
    pub intro_duration: f64,
    /// blackdetect filter knobs
    pub sensitivity: DetectionSensitivity,
    /// Blackout lengths retained as candidates
    pub acceptance_band: DurationBand,
    /// Where the episode boundary is expected
    pub window: SelectionWindow,
    /// How one candidate is chosen inside the window
    pub selection_policy: SelectionPolicy,
    /// Where the second segment starts relative to the blackout
    pub split_point_policy: SplitPointPolicy,
    /// Minimum fuzzy-match ratio a title lookup must exceed
    pub match_threshold: f64,
    /// Candidates closer than this (seconds) count against each other's
    /// isolation score
    pub isolation_window: f64,
    /// Blackout lengths considered ideal for an episode boundary
    pub ideal_duration_band: DurationBand,
    /// Encoding applied to the intro, the second segment, and the concat
    pub encoding: EncodingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("input_videos"),
            output_folder: PathBuf::from("output_videos"),
            catalog_path: PathBuf::from("episode_list.csv"),
            intro_duration: 47.0,
            sensitivity: DetectionSensitivity::default(),
            acceptance_band: DurationBand::new(0.1, 5.0),
            window: SelectionWindow::new(710.0, 60.0),
            selection_policy: SelectionPolicy::default(),
            split_point_policy: SplitPointPolicy::default(),
            match_threshold: 0.75,
            isolation_window: 5.0,
            ideal_duration_band: DurationBand::new(0.5, 2.0),
            encoding: EncodingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            input_folder: env_path("EPISPLIT_INPUT_DIR", defaults.input_folder),
            output_folder: env_path("EPISPLIT_OUTPUT_DIR", defaults.output_folder),
            catalog_path: env_path("EPISPLIT_CATALOG", defaults.catalog_path),
            intro_duration: env_parse("EPISPLIT_INTRO_DURATION", defaults.intro_duration),
            sensitivity: DetectionSensitivity {
                min_black_duration: env_parse(
                    "EPISPLIT_BLACK_DURATION",
                    defaults.sensitivity.min_black_duration,
                ),
                pixel_threshold: env_parse(
                    "EPISPLIT_PIXEL_THRESHOLD",
                    defaults.sensitivity.pixel_threshold,
                ),
                picture_threshold: env_parse(
                    "EPISPLIT_PICTURE_THRESHOLD",
                    defaults.sensitivity.picture_threshold,
                ),
            },
            acceptance_band: DurationBand::new(
                env_parse("EPISPLIT_MIN_TRANSITION", defaults.acceptance_band.min),
                env_parse("EPISPLIT_MAX_TRANSITION", defaults.acceptance_band.max),
            ),
            window: SelectionWindow::new(
                env_parse("EPISPLIT_TARGET_TIME", defaults.window.target),
                env_parse("EPISPLIT_TIME_MARGIN", defaults.window.margin),
            ),
            selection_policy: env_selection_policy(defaults.selection_policy),
            split_point_policy: env_split_point_policy(defaults.split_point_policy),
            match_threshold: env_parse("EPISPLIT_MATCH_THRESHOLD", defaults.match_threshold),
            isolation_window: env_parse("EPISPLIT_ISOLATION_WINDOW", defaults.isolation_window),
            ideal_duration_band: defaults.ideal_duration_band,
            encoding: defaults.encoding,
        }
    }
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_selection_policy(default: SelectionPolicy) -> SelectionPolicy {
    match std::env::var("EPISPLIT_SELECTION_POLICY").as_deref() {
        Ok("scored_best") => SelectionPolicy::ScoredBest,
        Ok("select_latest") => SelectionPolicy::SelectLatest,
        Ok("select_earliest") => SelectionPolicy::SelectEarliest,
        _ => default,
    }
}

fn env_split_point_policy(default: SplitPointPolicy) -> SplitPointPolicy {
    match std::env::var("EPISPLIT_SPLIT_POINT").as_deref() {
        Ok("at_start_of_fade") => SplitPointPolicy::AtStartOfFade,
        Ok("after_fade") => SplitPointPolicy::AfterFade,
        _ => default,
    }
}
