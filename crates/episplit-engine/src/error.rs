//! Engine error types.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Per-file pipeline failures.
///
/// Every variant is a skip reason for the file it occurred on, never a
/// batch abort; the batch only stops early on explicit cancellation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("filename does not match the expected episode pattern: {0}")]
    FilenameParse(String),

    #[error("unsupported title layout ({parts} '+'-joined parts)")]
    UnsupportedLayout { parts: usize },

    #[error("no valid transition found")]
    NoTransition,

    #[error("{stage} failed: {source}")]
    Extraction {
        stage: &'static str,
        #[source]
        source: episplit_media::MediaError,
    },

    #[error("media error: {0}")]
    Media(#[from] episplit_media::MediaError),

    #[error("catalog error: {0}")]
    Catalog(#[from] episplit_catalog::CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Wrap a media failure with the pipeline stage it happened in.
    pub fn extraction(stage: &'static str, source: episplit_media::MediaError) -> Self {
        Self::Extraction { stage, source }
    }

    /// Pipeline stage label for diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FilenameParse(_) | Self::UnsupportedLayout { .. } => "parse",
            Self::NoTransition => "detect",
            Self::Extraction { stage, .. } => stage,
            Self::Media(_) => "media",
            Self::Catalog(_) => "catalog",
            Self::Io(_) => "io",
        }
    }
}
