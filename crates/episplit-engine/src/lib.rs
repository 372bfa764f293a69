//! Segmentation and identification engine.
//!
//! This crate provides:
//! - Per-file split orchestration (parse, classify, split, finalize)
//! - Batch driving with progress emission and cooperative cancellation
//! - Transition selection policies
//! - Filename parsing and output naming

pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod filename;
pub mod selector;
pub mod splitter;

pub use batch::{BatchDriver, BatchSummary};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use events::{CancellationFlag, ChannelSink, EventSink, ProgressCallback, TracingSink};
pub use filename::{parse_episode_filename, sanitize_filename, EpisodeTitles, ParsedEpisodeFile};
pub use selector::{select_transition, ScoringParams};
pub use splitter::{FileOutcome, FileSplitter};
