//! Episode reference catalog.
//!
//! This crate provides:
//! - CSV catalog loading into normalized-title keyed records
//! - Title normalization (abbreviations, joiners, punctuation, case)
//! - Exact-then-fuzzy lookup of derived episode titles

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod normalize;

pub use catalog::{EpisodeCatalog, EpisodeRecord};
pub use error::{CatalogError, CatalogResult};
pub use matcher::MatchResult;
pub use normalize::normalize_title;
