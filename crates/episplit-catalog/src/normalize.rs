//! Title normalization.
//!
//! Raw episode titles and catalog titles are folded into one canonical
//! comparison key. The same function runs at catalog load time and at match
//! time; the matcher is only correct while that symmetry holds.

use once_cell::sync::Lazy;
use regex::Regex;

/// Abbreviations whose trailing dot must survive punctuation stripping.
static ABBREVIATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(Mr|Mrs|Ms|Dr|Jr|Sr|St|vs)\.").unwrap());

/// Ellipses become a word break, not a deleted token.
static ELLIPSIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.\.").unwrap());

/// `&` and `+` both read as "and" in catalog titles.
static AMPERSAND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*&\s*").unwrap());
static PLUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\+\s*").unwrap());

/// Hyphenated words are joined rather than split.
static HYPHENATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)-(\w)").unwrap());

static PUNCTUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Map a raw title to its canonical comparison key.
///
/// Protects known abbreviations and punctuation idioms from the generic
/// punctuation strip, then lowercases, strips what remains, and collapses
/// whitespace. Idempotent: `normalize_title(normalize_title(t)) ==
/// normalize_title(t)`.
pub fn normalize_title(title: &str) -> String {
    let working = ABBREVIATION_RE.replace_all(title, "$1");
    let working = ELLIPSIS_RE.replace_all(&working, " ");
    let working = AMPERSAND_RE.replace_all(&working, " and ");
    let working = PLUS_RE.replace_all(&working, " and ");
    let working = HYPHENATED_RE.replace_all(&working, "$1$2");

    let working = working.to_lowercase();
    let working = PUNCTUATION_RE.replace_all(&working, "");
    let working = WHITESPACE_RE.replace_all(&working, " ");

    working.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_folding() {
        assert_eq!(normalize_title("The Big Race"), "the big race");
        assert_eq!(normalize_title("  The   Big Race "), "the big race");
    }

    #[test]
    fn test_abbreviations_survive() {
        assert_eq!(normalize_title("Mr. Nobody"), "mr nobody");
        assert_eq!(normalize_title("Junior Jr. Day"), "junior jr day");
        assert_eq!(normalize_title("Cats vs. Dogs"), "cats vs dogs");
    }

    #[test]
    fn test_joiners_become_and() {
        assert_eq!(normalize_title("Salt & Pepper"), "salt and pepper");
        assert_eq!(normalize_title("Salt + Pepper"), "salt and pepper");
    }

    #[test]
    fn test_ellipsis_is_a_word_break() {
        assert_eq!(normalize_title("Wait...For It"), "wait for it");
    }

    #[test]
    fn test_hyphenated_words_join() {
        assert_eq!(normalize_title("The Re-Run"), "the rerun");
    }

    #[test]
    fn test_remaining_punctuation_stripped() {
        assert_eq!(normalize_title("Who's There?"), "whos there");
        assert_eq!(normalize_title("Hello, World!"), "hello world");
    }

    #[test]
    fn test_idempotence() {
        for title in [
            "Mr. Nobody",
            "Salt & Pepper",
            "Wait...For It",
            "The Re-Run",
            "Who's There?",
            "plain title",
        ] {
            let once = normalize_title(title);
            assert_eq!(normalize_title(&once), once, "not idempotent for {title:?}");
        }
    }
}
