//! Episode catalog loading.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::CatalogResult;
use crate::normalize::normalize_title;

/// One catalog entry, keyed by its normalized title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub season: u32,
    pub episode: u32,
    /// Canonical display title, as it appears in the catalog source
    pub title: String,
    /// Comparison key derived from `title`
    pub normalized_title: String,
}

/// CSV row shape: `SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo`.
/// The `AbbvCombo` column is part of the source format but unused here.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "SeasonNumber")]
    season: u32,
    #[serde(rename = "EpisodeNumber")]
    episode: u32,
    #[serde(rename = "EpisodeName")]
    title: String,
}

/// Read-only mapping from normalized titles to episode records.
///
/// Built once per job and shared across all per-file operations. Duplicate
/// normalized titles are resolved last-write-wins, preserving the earlier
/// row's position so fuzzy ranking stays in stable source order.
#[derive(Debug, Default)]
pub struct EpisodeCatalog {
    records: Vec<EpisodeRecord>,
    index: HashMap<String, usize>,
}

impl EpisodeCatalog {
    /// A catalog with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the catalog from a CSV file.
    ///
    /// Fails on an unreadable or malformed source. Callers recover with
    /// [`EpisodeCatalog::empty`] so a broken catalog never aborts a job.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;

        let mut catalog = Self::empty();
        for row in reader.deserialize() {
            let row: CatalogRow = row?;
            catalog.insert(row.season, row.episode, row.title);
        }

        debug!(
            path = %path.display(),
            entries = catalog.len(),
            "Loaded episode catalog"
        );
        Ok(catalog)
    }

    fn insert(&mut self, season: u32, episode: u32, title: String) {
        let normalized_title = normalize_title(&title);
        let record = EpisodeRecord {
            season,
            episode,
            title,
            normalized_title: normalized_title.clone(),
        };
        match self.index.get(&normalized_title) {
            // Duplicate normalized title: the later row wins
            Some(&pos) => self.records[pos] = record,
            None => {
                self.index.insert(normalized_title, self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Exact lookup by an already-normalized key.
    pub fn get(&self, normalized_title: &str) -> Option<&EpisodeRecord> {
        self.index.get(normalized_title).map(|&pos| &self.records[pos])
    }

    /// Records in stable source order.
    pub fn iter(&self) -> impl Iterator<Item = &EpisodeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_catalog(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_basic() {
        let file = write_catalog(
            "SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo\n\
             1,1,Alpha,a\n\
             1,2,Beta,b\n",
        );
        let catalog = EpisodeCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let record = catalog.get("alpha").unwrap();
        assert_eq!(record.season, 1);
        assert_eq!(record.episode, 1);
        assert_eq!(record.title, "Alpha");
    }

    #[test]
    fn test_load_quoted_title_with_comma() {
        let file = write_catalog(
            "SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo\n\
             2,5,\"Run, Spot, Run\",rsr\n",
        );
        let catalog = EpisodeCatalog::load(file.path()).unwrap();
        let record = catalog.get("run spot run").unwrap();
        assert_eq!(record.title, "Run, Spot, Run");
    }

    #[test]
    fn test_duplicate_normalized_title_last_write_wins() {
        let file = write_catalog(
            "SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo\n\
             1,1,The Race,x\n\
             1,7,The Race!,y\n",
        );
        let catalog = EpisodeCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);

        let record = catalog.get("the race").unwrap();
        assert_eq!(record.episode, 7);
        assert_eq!(record.title, "The Race!");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = EpisodeCatalog::load("/nonexistent/episode_list.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_malformed_row_is_error() {
        let file = write_catalog(
            "SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo\n\
             one,1,Alpha,a\n",
        );
        assert!(EpisodeCatalog::load(file.path()).is_err());
    }

    #[test]
    fn test_every_loaded_row_hits_exactly_after_normalization() {
        let file = write_catalog(
            "SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo\n\
             1,1,Mr. Nobody,mn\n\
             1,2,Salt & Pepper,sp\n\
             1,3,Wait...For It,wfi\n",
        );
        let catalog = EpisodeCatalog::load(file.path()).unwrap();
        let titles: Vec<String> = catalog.iter().map(|r| r.title.clone()).collect();
        for title in titles {
            assert!(catalog.get(&crate::normalize_title(&title)).is_some());
        }
    }
}
