//! Derived-title resolution against the catalog.
//!
//! Exact normalized-key lookup first; otherwise the best similarity ratio
//! over every catalog key, accepted only above the caller's threshold.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::catalog::{EpisodeCatalog, EpisodeRecord};
use crate::normalize::normalize_title;

/// Trailing quality/source tokens that leak out of release filenames.
static QUALITY_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(DVD|WEBDL-\d+p)\s*$").unwrap());

/// A resolved catalog record with its match confidence.
///
/// Confidence 1.0 is an exact normalized-key hit; values in `(0, 1)` come
/// from similarity ranking.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub record: &'a EpisodeRecord,
    pub confidence: f64,
}

impl EpisodeCatalog {
    /// Resolve a derived episode title to a catalog record.
    ///
    /// A fuzzy match is accepted only when its ratio is strictly above
    /// `threshold`; ties on the maximum ratio go to the first record in
    /// source order. Pure read, no side effects.
    pub fn find_match(&self, derived_title: &str, threshold: f64) -> Option<MatchResult<'_>> {
        let cleaned = QUALITY_SUFFIX_RE.replace(derived_title, "");
        let needle = normalize_title(&cleaned);
        debug!(derived = derived_title, normalized = %needle, "Looking up episode title");

        if let Some(record) = self.get(&needle) {
            debug!(title = %record.title, "Exact catalog match");
            return Some(MatchResult {
                record,
                confidence: 1.0,
            });
        }

        let mut best: Option<MatchResult<'_>> = None;
        for record in self.iter() {
            let ratio = strsim::normalized_damerau_levenshtein(&needle, &record.normalized_title);
            if ratio > threshold && best.map_or(true, |b| ratio > b.confidence) {
                best = Some(MatchResult {
                    record,
                    confidence: ratio,
                });
            }
        }

        match best {
            Some(result) => {
                debug!(
                    title = %result.record.title,
                    confidence = format!("{:.2}", result.confidence),
                    "Fuzzy catalog match"
                );
            }
            None => {
                debug!(
                    threshold,
                    "No catalog match above confidence threshold"
                );
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const THRESHOLD: f64 = 0.75;

    fn catalog() -> EpisodeCatalog {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo\n\
              1,1,Alpha,a\n\
              1,2,Beta,b\n\
              1,3,The Long Goodbye,tlg\n\
              1,4,Mr. Nobody,mn\n",
        )
        .unwrap();
        file.flush().unwrap();
        EpisodeCatalog::load(file.path()).unwrap()
    }

    #[test]
    fn test_exact_match_has_full_confidence() {
        let catalog = catalog();
        let result = catalog.find_match("Alpha", THRESHOLD).unwrap();
        assert_eq!(result.record.episode, 1);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_exact_match_is_normalization_insensitive() {
        let catalog = catalog();
        let result = catalog.find_match("mr nobody", THRESHOLD).unwrap();
        assert_eq!(result.record.episode, 4);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let catalog = catalog();
        // One transposition away from "the long goodbye"
        let result = catalog.find_match("The Long Goobdye", THRESHOLD).unwrap();
        assert_eq!(result.record.episode, 3);
        assert!(result.confidence > THRESHOLD);
        assert!(result.confidence < 1.0);
    }

    #[test]
    fn test_no_match_below_threshold() {
        let catalog = catalog();
        assert!(catalog
            .find_match("Completely Unrelated Title", THRESHOLD)
            .is_none());
    }

    #[test]
    fn test_quality_suffix_is_ignored() {
        let catalog = catalog();
        let result = catalog.find_match("Alpha DVD", THRESHOLD).unwrap();
        assert_eq!(result.confidence, 1.0);

        let result = catalog.find_match("Beta WEBDL-480p", THRESHOLD).unwrap();
        assert_eq!(result.record.episode, 2);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_tie_break_prefers_first_in_source_order() {
        let mut file = NamedTempFile::new().unwrap();
        // "abcd" is equidistant from both entries
        file.write_all(
            b"SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo\n\
              1,1,abcx,1\n\
              1,2,abcy,2\n",
        )
        .unwrap();
        file.flush().unwrap();
        let catalog = EpisodeCatalog::load(file.path()).unwrap();

        let result = catalog.find_match("abcd", 0.5).unwrap();
        assert_eq!(result.record.episode, 1);
    }

    #[test]
    fn test_empty_catalog_never_matches() {
        let catalog = EpisodeCatalog::empty();
        assert!(catalog.find_match("Alpha", THRESHOLD).is_none());
    }
}
