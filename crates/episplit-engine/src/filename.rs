//! Input filename parsing and output naming.
//!
//! Input contract: `"<Show> - S<ss>E<ee>[-N] - <Title1>[ + <Title2>]<ext>"`
//! with two-or-more digit season/episode numbers and `.mkv`/`.mp4`
//! extensions.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EngineError, EngineResult};

/// Extensions the batch driver picks up.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["mkv", "mp4"];

/// `Show - SxxEyy[-N] - remainder`
static EPISODE_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*-\s*S(\d{2,})E(\d{2,})(?:-\d+)?\s*-\s*(.+)$").unwrap());

/// Quality/source tokens that ride along in release names.
static QUALITY_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"WEBDL-\d+p|DVD").unwrap());

/// Characters the output filesystem rejects.
static INVALID_CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|*]"#).unwrap());

/// The derived title half (or halves) of a parsed filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeTitles {
    Single(String),
    Dual(String, String),
}

/// Structured form of an input filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEpisodeFile {
    pub show: String,
    pub season: u32,
    /// Base episode number from the `SxxEyy` token
    pub episode: u32,
    pub titles: EpisodeTitles,
    /// Original extension including the dot, lowercased
    pub extension: String,
}

impl ParsedEpisodeFile {
    /// Whether the file claims to hold two episodes.
    pub fn is_dual(&self) -> bool {
        matches!(self.titles, EpisodeTitles::Dual(_, _))
    }
}

/// Whether the batch driver should pick up this path.
pub fn is_supported_video(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Parse a file name (not a full path) into its episode structure.
pub fn parse_episode_filename(file_name: &str) -> EngineResult<ParsedEpisodeFile> {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| EngineError::FilenameParse(file_name.to_string()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    let captures = EPISODE_FILE_RE
        .captures(stem)
        .ok_or_else(|| EngineError::FilenameParse(file_name.to_string()))?;

    let show = captures[1].trim().to_string();
    let season: u32 = captures[2]
        .parse()
        .map_err(|_| EngineError::FilenameParse(file_name.to_string()))?;
    let episode: u32 = captures[3]
        .parse()
        .map_err(|_| EngineError::FilenameParse(file_name.to_string()))?;

    let remainder = QUALITY_TOKEN_RE.replace_all(&captures[4], "");
    let parts: Vec<&str> = remainder.split('+').map(str::trim).collect();
    let titles = match parts.as_slice() {
        [single] => EpisodeTitles::Single(single.to_string()),
        [first, second] => EpisodeTitles::Dual(first.to_string(), second.to_string()),
        _ => {
            return Err(EngineError::UnsupportedLayout { parts: parts.len() });
        }
    };

    Ok(ParsedEpisodeFile {
        show,
        season,
        episode,
        titles,
        extension,
    })
}

/// Strip or replace characters the output filesystem rejects.
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace('?', "");
    INVALID_CHAR_RE.replace_all(&name, "_").to_string()
}

/// Canonical output name: `"<Show> - SxxEyy - <Title><ext>"`, sanitized.
pub fn output_file_name(show: &str, season: u32, episode: u32, title: &str, ext: &str) -> String {
    sanitize_filename(&format!(
        "{} - S{:02}E{:02} - {}{}",
        show, season, episode, title, ext
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dual_episode() {
        let parsed = parse_episode_filename("Show - S01E01-02 - Alpha + Beta.mkv").unwrap();
        assert_eq!(parsed.show, "Show");
        assert_eq!(parsed.season, 1);
        assert_eq!(parsed.episode, 1);
        assert_eq!(
            parsed.titles,
            EpisodeTitles::Dual("Alpha".to_string(), "Beta".to_string())
        );
        assert_eq!(parsed.extension, ".mkv");
        assert!(parsed.is_dual());
    }

    #[test]
    fn test_parse_single_episode() {
        let parsed = parse_episode_filename("Show - S01E03 - Gamma.mkv").unwrap();
        assert_eq!(parsed.titles, EpisodeTitles::Single("Gamma".to_string()));
        assert!(!parsed.is_dual());
    }

    #[test]
    fn test_parse_show_name_with_hyphen_spacing() {
        let parsed =
            parse_episode_filename("My Great Show - S02E11 - The One Title.mp4").unwrap();
        assert_eq!(parsed.show, "My Great Show");
        assert_eq!(parsed.season, 2);
        assert_eq!(parsed.episode, 11);
        assert_eq!(parsed.extension, ".mp4");
    }

    #[test]
    fn test_parse_strips_quality_tokens() {
        let parsed =
            parse_episode_filename("Show - S01E01-02 - Alpha + Beta WEBDL-480p.mkv").unwrap();
        assert_eq!(
            parsed.titles,
            EpisodeTitles::Dual("Alpha".to_string(), "Beta".to_string())
        );

        let parsed = parse_episode_filename("Show - S01E03 - Gamma DVD.mkv").unwrap();
        assert_eq!(parsed.titles, EpisodeTitles::Single("Gamma".to_string()));
    }

    #[test]
    fn test_parse_rejects_unmatched_names() {
        assert!(matches!(
            parse_episode_filename("random_recording.mkv"),
            Err(EngineError::FilenameParse(_))
        ));
        // One-digit numbering is outside the contract
        assert!(parse_episode_filename("Show - S1E2 - Title.mkv").is_err());
    }

    #[test]
    fn test_parse_rejects_three_titles() {
        assert!(matches!(
            parse_episode_filename("Show - S01E01-03 - A + B + C.mkv"),
            Err(EngineError::UnsupportedLayout { parts: 3 })
        ));
    }

    #[test]
    fn test_is_supported_video() {
        assert!(is_supported_video(Path::new("a.mkv")));
        assert!(is_supported_video(Path::new("a.MP4")));
        assert!(!is_supported_video(Path::new("a.avi")));
        assert!(!is_supported_video(Path::new("noext")));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Who Did It?"), "Who Did It");
        assert_eq!(sanitize_filename("a<b>c:d/e\\f|g*h"), "a_b_c_d_e_f_g_h");
        assert_eq!(sanitize_filename("plain name"), "plain name");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("Show", 1, 2, "Beta", ".mkv"),
            "Show - S01E02 - Beta.mkv"
        );
        assert_eq!(
            output_file_name("Show", 1, 2, "What? No!", ".mkv"),
            "Show - S01E02 - What No!.mkv"
        );
    }
}
