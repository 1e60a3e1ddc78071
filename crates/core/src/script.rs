//! Script detection helpers

/// Whether a character lies in the Hebrew Unicode block (U+0590..U+05FF)
#[inline]
pub fn is_hebrew_char(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

/// Whether the text contains at least one Hebrew character
pub fn contains_hebrew(text: &str) -> bool {
    text.chars().any(is_hebrew_char)
}

/// Number of characters (not bytes) in the text
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
