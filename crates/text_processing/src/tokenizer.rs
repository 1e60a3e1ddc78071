//! Query tokenizer
//!
//! Splits on whitespace and a fixed punctuation set, lower-cases, and drops
//! single characters and stop words. Compound Hebrew words stay intact
//! unless a stripped prefix reveals a known location.

use crate::gazetteer::Gazetteer;
use crate::hebrew::strip_prefix;
use crate::stopwords::is_stop_word;
use datagov_core::char_len;

/// Punctuation treated as a token boundary
pub const DELIMITERS: &[char] = &[
    ',', '.', '-', ':', ';', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'', '/',
];

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || DELIMITERS.contains(&c)
}

/// Tokenize without touching prefixes
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(is_delimiter)
        .filter(|t| char_len(t) > 1 && !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Tokenize, replacing `בירושלים`-style tokens by the bare location.
///
/// A stripped form is accepted only when some gazetteer entry equals or
/// contains it; every other token is returned as written.
pub fn tokenize_stripping_locations(text: &str, gazetteer: &Gazetteer) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .map(|token| strip_prefix(&token, |rest| gazetteer.covers(rest)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(
            tokenize("Show me the Hospitals in Jerusalem!"),
            vec!["hospitals", "jerusalem"]
        );
    }

    #[test]
    fn test_tokenize_punctuation() {
        assert_eq!(
            tokenize("budget/2023: (ministry-of-health)"),
            vec!["budget", "2023", "ministry", "health"]
        );
    }

    #[test]
    fn test_tokenize_hebrew_stopwords() {
        assert_eq!(tokenize("רשימה של בתי חולים"), vec!["רשימה", "בתי", "חולים"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ,, a ").is_empty());
    }

    #[test]
    fn test_stripping_only_for_locations() {
        let g = Gazetteer::default();
        let tokens = tokenize_stripping_locations("בתי ספר בירושלים", &g);
        assert_eq!(tokens, vec!["בתי", "ספר", "ירושלים"]);

        // "לרכבים" strips to "רכבים", which is not a location
        let tokens = tokenize_stripping_locations("לרכבים", &g);
        assert_eq!(tokens, vec!["לרכבים"]);
    }
}
