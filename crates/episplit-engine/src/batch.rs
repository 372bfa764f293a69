//! Batch driving.
//!
//! Sequential, single-worker iteration over the input folder. One file is
//! processed to completion before the next starts; the cancellation flag is
//! observed only between files.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tracing::{error, info, warn};

use episplit_catalog::EpisodeCatalog;
use episplit_models::{BatchEvent, ProgressUpdate};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::events::{CancellationFlag, EventSink, ProgressCallback, TracingSink};
use crate::filename::is_supported_video;
use crate::splitter::{FileOutcome, FileSplitter};

/// What one batch run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files that produced outputs
    pub completed: usize,
    /// Files skipped with a logged reason
    pub skipped: usize,
    /// Supported files found in the input folder
    pub total: usize,
    /// Whether the run stopped on the cancellation flag
    pub cancelled: bool,
}

/// Drives the per-file pipeline over a folder of recordings.
pub struct BatchDriver {
    config: EngineConfig,
    catalog: EpisodeCatalog,
    sink: Arc<dyn EventSink>,
    progress: Option<ProgressCallback>,
    cancel: CancellationFlag,
}

impl BatchDriver {
    /// Create a driver, loading the catalog from the configured path.
    ///
    /// A broken catalog is recovered locally: the batch proceeds with an
    /// empty catalog and every title lookup falls back to derived names.
    pub fn new(config: EngineConfig) -> Self {
        let catalog = match EpisodeCatalog::load(&config.catalog_path) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!(
                    path = %config.catalog_path.display(),
                    error = %e,
                    "Failed to load episode catalog; continuing with no matches"
                );
                EpisodeCatalog::empty()
            }
        };
        Self::with_catalog(config, catalog)
    }

    /// Create a driver around an already-loaded catalog.
    pub fn with_catalog(config: EngineConfig, catalog: EpisodeCatalog) -> Self {
        Self {
            config,
            catalog,
            sink: Arc::new(TracingSink),
            progress: None,
            cancel: CancellationFlag::new(),
        }
    }

    /// Replace the typed event sink.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attach a `(message, percentage)` progress callback.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Handle for requesting cancellation from another task.
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Process every supported file in the input folder.
    pub async fn run(&self) -> EngineResult<BatchSummary> {
        fs::create_dir_all(&self.config.output_folder).await?;

        let files = self.list_input_files().await?;
        let total = files.len();

        if total == 0 {
            info!(
                folder = %self.config.input_folder.display(),
                "No supported video files found"
            );
            info!("Supported formats: .mkv, .mp4");
            self.report(ProgressUpdate::new("No supported video files found", 100.0));
            self.sink.emit(&BatchEvent::BatchFinished {
                completed: 0,
                total: 0,
                cancelled: false,
            });
            return Ok(BatchSummary {
                completed: 0,
                skipped: 0,
                total: 0,
                cancelled: false,
            });
        }

        let splitter = FileSplitter::new(&self.config, &self.catalog);
        let mut completed = 0;
        let mut skipped = 0;
        let mut cancelled = false;

        for (index, path) in files.iter().enumerate() {
            if self.cancel.is_requested() {
                cancelled = true;
                break;
            }

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.sink.emit(&BatchEvent::FileStarted {
                file: file_name.clone(),
                index,
                total,
            });
            self.report(ProgressUpdate::message(format!(
                "Processing {}/{}: {}",
                index + 1,
                total,
                file_name
            )));

            match splitter.process(path, self.sink.as_ref()).await {
                Ok(FileOutcome::Copied { output }) => {
                    completed += 1;
                    self.sink.emit(&BatchEvent::FileCopied {
                        file: file_name,
                        output: output.display().to_string(),
                    });
                }
                Ok(FileOutcome::Split { outputs }) => {
                    completed += 1;
                    self.sink.emit(&BatchEvent::SplitCompleted {
                        file: file_name,
                        outputs: outputs.iter().map(|p| p.display().to_string()).collect(),
                    });
                }
                Err(e) => {
                    skipped += 1;
                    warn!(
                        file = %file_name,
                        stage = e.stage(),
                        error = %e,
                        "File pipeline failed; skipping"
                    );
                    self.sink.emit(&BatchEvent::FileSkipped {
                        file: file_name,
                        reason: e.to_string(),
                    });
                }
            }

            let processed = completed + skipped;
            self.report(ProgressUpdate::new(
                format!("Processed {}/{}", processed, total),
                processed as f64 / total as f64 * 100.0,
            ));
        }

        self.sink.emit(&BatchEvent::BatchFinished {
            completed,
            total,
            cancelled,
        });
        if cancelled {
            self.report(ProgressUpdate::message("Processing cancelled by user"));
        } else {
            self.report(ProgressUpdate::new("All videos processed!", 100.0));
        }

        Ok(BatchSummary {
            completed,
            skipped,
            total,
            cancelled,
        })
    }

    /// Supported files in directory-listing order.
    async fn list_input_files(&self) -> EngineResult<Vec<PathBuf>> {
        let mut entries = fs::read_dir(&self.config.input_folder).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && is_supported_video(&path) {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn report(&self, update: ProgressUpdate) {
        if let Some(progress) = &self.progress {
            progress(update);
        }
    }
}
