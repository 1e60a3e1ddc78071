//! Stop-word sets
//!
//! Two families: the tokenizer list, which removes function words before
//! any matching, and the rephrasing lists, which additionally drop question
//! words and generic data nouns ("information", "רשימה") when reducing a
//! query to its core subjects.

use once_cell::sync::Lazy;
use std::collections::HashSet;

#[rustfmt::skip]
static TOKENIZER_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Hebrew
        "של", "את", "על", "עם", "לא", "או", "גם", "כי", "מה", "זה", "הוא", "היא", "אני", "אנחנו",
        "ב", "ל", "מ", "ה", "ו", "כ", "ש",
        // English
        "the", "a", "an", "in", "on", "at", "to", "for", "of", "and", "or", "is", "are", "was",
        "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will", "would",
        "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
        "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
        "my", "your", "his", "its", "our", "their", "what", "which", "who", "whom",
        "use", "using", "show", "display", "find", "search", "get", "list", "give", "want",
        "provide", "each", "every", "all", "with", "from", "by",
    ]
    .into_iter()
    .collect()
});

#[rustfmt::skip]
static HEBREW_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "את", "של", "על", "עם", "אל", "מה", "איך", "למה", "מי", "היכן", "מתי",
        "האם", "יש", "אין", "כל", "גם", "או", "אם", "לא", "כי", "זה", "זו", "זאת",
        "הוא", "היא", "הם", "הן", "אני", "אנחנו", "אתה", "שלי", "שלך", "שלו",
        "בו", "בה", "בהם", "בהן", "לו", "לה", "להם", "להן", "ממנו", "ממנה",
        "מידע", "נתונים", "רשימה", "רשימת", "פרטים", "פרטי", "כמות", "סטטיסטיקה",
    ]
    .into_iter()
    .collect()
});

#[rustfmt::skip]
static ENGLISH_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "being",
        "have", "has", "had", "do", "does", "did", "will", "would", "could", "should",
        "what", "where", "when", "why", "how", "which", "who", "whom",
        "in", "on", "at", "to", "for", "of", "with", "by", "from", "about",
        "into", "through", "during", "before", "after", "above", "below",
        "all", "any", "both", "each", "few", "more", "most", "other", "some",
        "data", "information", "list", "details", "statistics", "numbers",
    ]
    .into_iter()
    .collect()
});

/// Dropped by the tokenizer
pub fn is_stop_word(token: &str) -> bool {
    TOKENIZER_STOP_WORDS.contains(token)
}

/// Hebrew function words, question words and generic data nouns
pub fn is_hebrew_stopword(token: &str) -> bool {
    HEBREW_STOPWORDS.contains(token)
}

/// Dropped when reducing a query to its core subjects
pub fn is_core_stopword(token: &str) -> bool {
    let lower = token.to_lowercase();
    HEBREW_STOPWORDS.contains(lower.as_str()) || ENGLISH_STOPWORDS.contains(lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_stop_words() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("של"));
        assert!(is_stop_word("show"));
        assert!(!is_stop_word("hospitals"));
        // generic data nouns survive tokenization
        assert!(!is_stop_word("data"));
    }

    #[test]
    fn test_core_stopwords() {
        assert!(is_core_stopword("Data"));
        assert!(is_core_stopword("נתונים"));
        assert!(is_core_stopword("how"));
        assert!(!is_core_stopword("תקציב"));
    }

    #[test]
    fn test_hebrew_stopwords() {
        assert!(is_hebrew_stopword("מידע"));
        assert!(!is_hebrew_stopword("information"));
    }
}
