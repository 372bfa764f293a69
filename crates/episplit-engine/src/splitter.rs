//! Per-file split orchestration.
//!
//! State machine per file: Parse -> Classify -> (SingleEpisode |
//! DualEpisode) -> Finalize. Temp storage is scoped to the file and removed
//! on every exit path.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use episplit_catalog::EpisodeCatalog;
use episplit_media::{
    concat_clips, convert_container, detect_black_intervals, extract_intro, extract_segment,
    extract_segment_reencoded, get_duration, MediaError,
};
use episplit_models::{format_seconds, split_boundaries, BatchEvent};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::events::EventSink;
use crate::filename::{output_file_name, parse_episode_filename, EpisodeTitles, ParsedEpisodeFile};
use crate::selector::{select_transition, ScoringParams};

/// What the pipeline produced for one file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Single-episode file copied under its canonical name
    Copied { output: PathBuf },
    /// Dual-episode file split into two named outputs
    Split { outputs: Vec<PathBuf> },
}

/// Runs the full pipeline for one input file.
///
/// The catalog is shared read-only across the batch; everything else here
/// is exclusive to the file being processed.
pub struct FileSplitter<'a> {
    config: &'a EngineConfig,
    catalog: &'a EpisodeCatalog,
}

impl<'a> FileSplitter<'a> {
    pub fn new(config: &'a EngineConfig, catalog: &'a EpisodeCatalog) -> Self {
        Self { config, catalog }
    }

    /// Process one input file to completion.
    ///
    /// Any error is a skip for this file; the caller logs the reason and
    /// moves on.
    pub async fn process(
        &self,
        video_path: &Path,
        sink: &dyn EventSink,
    ) -> EngineResult<FileOutcome> {
        let file_name = video_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| EngineError::FilenameParse(video_path.display().to_string()))?;
        let parsed = parse_episode_filename(file_name)?;

        match parsed.titles.clone() {
            EpisodeTitles::Single(title) => self.copy_single(video_path, &parsed, &title).await,
            EpisodeTitles::Dual(first, second) => {
                self.split_dual(video_path, &parsed, &first, &second, sink)
                    .await
            }
        }
    }

    /// Single-episode file: resolve the title and copy byte-for-byte.
    async fn copy_single(
        &self,
        video_path: &Path,
        parsed: &ParsedEpisodeFile,
        title: &str,
    ) -> EngineResult<FileOutcome> {
        let output_name = match self.catalog.find_match(title, self.config.match_threshold) {
            Some(matched) => output_file_name(
                &parsed.show,
                parsed.season,
                matched.record.episode,
                &matched.record.title,
                &parsed.extension,
            ),
            None => {
                // Non-fatal: keep the derived title and parsed numbering
                info!(title, "No catalog match for single episode; using derived title");
                output_file_name(
                    &parsed.show,
                    parsed.season,
                    parsed.episode,
                    title,
                    &parsed.extension,
                )
            }
        };

        let output = self.config.output_folder.join(output_name);
        info!(
            "Single episode file detected, copying to {}",
            output.display()
        );
        tokio::fs::copy(video_path, &output).await?;
        Ok(FileOutcome::Copied { output })
    }

    /// Dual-episode file: detect the boundary, cut, re-encode, concatenate.
    async fn split_dual(
        &self,
        video_path: &Path,
        parsed: &ParsedEpisodeFile,
        first_title: &str,
        second_title: &str,
        sink: &dyn EventSink,
    ) -> EngineResult<FileOutcome> {
        let file_name = video_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // Everything intermediate lives here and dies with this value
        let temp = tempfile::tempdir()?;
        debug!(temp = %temp.path().display(), "Created per-file temp folder");

        // Cut from an mkv container regardless of the input's own
        let work_input = if parsed.extension == ".mkv" {
            video_path.to_path_buf()
        } else {
            let converted = temp.path().join("converted.mkv");
            convert_container(video_path, &converted)
                .await
                .map_err(|e| EngineError::extraction("container remux", e))?;
            converted
        };

        let total_duration = get_duration(&work_input).await?;
        if total_duration <= 0.0 {
            return Err(EngineError::Media(MediaError::InvalidVideo(
                "could not determine video duration".to_string(),
            )));
        }
        info!(
            "Video duration: {:.2} seconds ({:.2} minutes)",
            total_duration,
            total_duration / 60.0
        );

        // A failed scan reads as "no transitions found", never a batch abort
        let candidates = match detect_black_intervals(
            &work_input,
            &self.config.sensitivity,
            &self.config.acceptance_band,
        )
        .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Blackout detection failed; treating as no transitions");
                Vec::new()
            }
        };

        let params = ScoringParams {
            isolation_window: self.config.isolation_window,
            ideal_duration_band: self.config.ideal_duration_band,
        };
        let chosen = *select_transition(
            &candidates,
            &self.config.window,
            self.config.selection_policy,
            &params,
        )
        .ok_or(EngineError::NoTransition)?;

        sink.emit(&BatchEvent::TransitionFound {
            file: file_name.clone(),
            start: chosen.start,
            end: chosen.end,
            duration: chosen.duration,
        });

        let (first, second) =
            split_boundaries(&chosen, total_duration, self.config.split_point_policy);
        info!(
            "Episode 1: {} to {} ({:.2} minutes)",
            format_seconds(first.start),
            format_seconds(first.end),
            first.duration() / 60.0
        );
        info!(
            "Episode 2: {} to {} ({:.2} minutes)",
            format_seconds(second.start),
            format_seconds(second.end),
            second.duration() / 60.0
        );

        // Dual outputs always come out of the mkv working copy
        let (first_name, second_name) = self.dual_output_names(parsed, first_title, second_title);
        let first_output = self.config.output_folder.join(first_name);
        let second_output = self.config.output_folder.join(second_name);

        // Episode 1 keeps its own intro; a straight stream copy suffices
        extract_segment(&work_input, &first_output, &first)
            .await
            .map_err(|e| EngineError::extraction("extract segment 1", e))?;
        info!("Created {}", first_output.display());

        if self.config.intro_duration > 0.0 {
            // Episode 2 lost its title sequence to the combined recording;
            // borrow the one from the head of the source file
            let intro = temp.path().join("intro.mkv");
            extract_intro(
                &work_input,
                &intro,
                self.config.intro_duration - 0.5,
                &self.config.encoding,
            )
            .await
            .map_err(|e| EngineError::extraction("extract intro", e))?;

            let episode2 = temp.path().join("episode2.mkv");
            extract_segment_reencoded(&work_input, &episode2, &second, &self.config.encoding)
                .await
                .map_err(|e| EngineError::extraction("extract segment 2", e))?;

            concat_clips(
                &intro,
                &episode2,
                &second_output,
                temp.path().join("concat.txt"),
                &self.config.encoding,
            )
            .await
            .map_err(|e| EngineError::extraction("concatenate intro", e))?;
        } else {
            extract_segment_reencoded(&work_input, &second_output, &second, &self.config.encoding)
                .await
                .map_err(|e| EngineError::extraction("extract segment 2", e))?;
        }
        info!("Created {}", second_output.display());

        Ok(FileOutcome::Split {
            outputs: vec![first_output, second_output],
        })
    }

    /// Resolve both halves' output names independently.
    ///
    /// An unmatched half falls back to the parsed numbering (base episode
    /// for the first, base + 1 for the second) with the derived title.
    pub(crate) fn dual_output_names(
        &self,
        parsed: &ParsedEpisodeFile,
        first_title: &str,
        second_title: &str,
    ) -> (String, String) {
        let resolve = |title: &str, fallback_episode: u32| {
            match self.catalog.find_match(title, self.config.match_threshold) {
                Some(matched) => (matched.record.episode, matched.record.title.clone()),
                None => {
                    info!(title, "No catalog match; using derived title");
                    (fallback_episode, title.to_string())
                }
            }
        };

        let (first_episode, first_name) = resolve(first_title, parsed.episode);
        let (second_episode, second_name) = resolve(second_title, parsed.episode + 1);

        (
            output_file_name(
                &parsed.show,
                parsed.season,
                first_episode,
                &first_name,
                ".mkv",
            ),
            output_file_name(
                &parsed.show,
                parsed.season,
                second_episode,
                &second_name,
                ".mkv",
            ),
        )
    }
}
