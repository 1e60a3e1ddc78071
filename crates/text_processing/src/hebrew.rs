//! Hebrew morphology
//!
//! Hebrew attaches prepositions and conjunctions as prefix letters
//! (ב, ל, מ, ה, ו, כ, ש and ו-pairs such as וב, ול) and marks plurals with
//! the suffixes ים and ות. Matching against the corpus needs the bare forms:
//! `לרכבים` -> `רכבים` -> `רכב`.

use datagov_core::{char_len, contains_hebrew};

/// Prefix letters and ו-pairs, two-letter forms first. No ש-pairs:
/// `שמות` must strip to `מות`, never to `ות`.
pub const PREFIXES: &[&str] = &[
    "וב", "וה", "ול", "ומ", "וש", "וכ", "ל", "ב", "מ", "ה", "ו", "ש", "כ",
];

/// Plural suffixes
pub const PLURAL_SUFFIXES: &[&str] = &["ים", "ות"];

const MASCULINE_PLURAL: &str = "ים";
const FEMININE_SINGULAR: char = 'ה';

/// Drop the first `n` characters
fn skip_chars(word: &str, n: usize) -> &str {
    match word.char_indices().nth(n) {
        Some((idx, _)) => &word[idx..],
        None => "",
    }
}

fn push_unique(out: &mut Vec<String>, value: String) {
    if !out.contains(&value) {
        out.push(value);
    }
}

/// Morphological variants of a single token.
///
/// Always contains the token itself and its lower-cased form. Hebrew tokens
/// additionally yield the prefix-stripped form, the singular of the original
/// and of the stripped form, and for `ים` plurals a feminine singular
/// (`singular + ה`). Tokens shorter than two characters come back unchanged.
pub fn variants(word: &str) -> Vec<String> {
    if word.is_empty() {
        return Vec::new();
    }
    if char_len(word) < 2 {
        return vec![word.to_string()];
    }

    let mut out = vec![word.to_string()];
    push_unique(&mut out, word.to_lowercase());

    if !contains_hebrew(word) {
        return out;
    }

    let word_len = char_len(word);
    let mut stripped = word;
    for prefix in PREFIXES {
        if word.starts_with(prefix) && word_len > char_len(prefix) + 1 {
            stripped = &word[prefix.len()..];
            push_unique(&mut out, stripped.to_string());
            break;
        }
    }

    for base in [word, stripped] {
        for suffix in PLURAL_SUFFIXES {
            if base.ends_with(suffix) && char_len(base) > char_len(suffix) + 1 {
                let singular = &base[..base.len() - suffix.len()];
                push_unique(&mut out, singular.to_string());
                if *suffix == MASCULINE_PLURAL {
                    let mut feminine = singular.to_string();
                    feminine.push(FEMININE_SINGULAR);
                    push_unique(&mut out, feminine);
                }
            }
        }
    }

    out
}

/// Strip one prefix (two letters tried before one) from a Hebrew word.
///
/// A candidate is only considered when the word has at least four
/// characters and the remainder keeps at least three. `accept` decides
/// whether a candidate remainder is kept; when it refuses, the shorter
/// prefix is tried next. Returns the word unchanged when nothing is accepted.
pub fn strip_prefix<F>(word: &str, accept: F) -> String
where
    F: Fn(&str) -> bool,
{
    let len = char_len(word);
    if len < 4 || !contains_hebrew(word) {
        return word.to_string();
    }

    for prefix_len in [2usize, 1] {
        if len <= prefix_len + 2 {
            continue;
        }
        let rest = skip_chars(word, prefix_len);
        let prefix = &word[..word.len() - rest.len()];
        if !PREFIXES.contains(&prefix) || char_len(rest) < 3 {
            continue;
        }
        if accept(rest) {
            return rest.to_string();
        }
    }

    word.to_string()
}

/// Unconditionally strip a recognised prefix
pub fn strip_prefix_forced(word: &str) -> String {
    strip_prefix(word, |_| true)
}
