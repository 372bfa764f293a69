//! Error types for catalog operations.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading the episode catalog.
///
/// Callers are expected to recover by substituting an empty catalog; a
/// broken catalog makes every match fail but never aborts a job.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read episode catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed episode catalog: {0}")]
    Malformed(#[from] csv::Error),
}
