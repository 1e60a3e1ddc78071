//! Rephrasing fallback
//!
//! When the first pass scores below the confidence threshold the resolver
//! retries with up to three alternative phrasings, most specific first:
//! 1. every token replaced by its best-connected morphological variant
//! 2. the core subjects only (no stop words, places or numbers)
//! 3. an English synonym of one of the first two core subjects

use datagov_core::char_len;
use datagov_text_processing::{
    is_core_stopword, is_hebrew_stopword, tokenize, variants, Gazetteer,
};

use crate::synonyms::SynonymIndex;

/// Core subjects kept by the second strategy
const CORE_TERMS: usize = 3;
/// Core subjects inspected by the third strategy
const CATEGORY_LOOKUPS: usize = 2;
/// Tokens must be longer than this to make a query specific
const MIN_MEANINGFUL_CHARS: usize = 3;

/// Example domains offered when a query is too vague
pub const VAGUE_QUERY_DOMAINS: &[(&str, &str, &str)] = &[
    ("בריאות", "health", "hospitals, clinics, medical data"),
    ("חינוך", "education", "schools, students, academic"),
    ("תחבורה", "transport", "vehicles, roads, traffic"),
    ("תקציב", "budget", "government spending, finance"),
    ("מים", "water", "water quality, supply"),
    ("סביבה", "environment", "pollution, nature, climate"),
];

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn push_new(list: &mut Vec<String>, candidate: String, original: &str) {
    if candidate.trim().is_empty() || candidate == original || list.contains(&candidate) {
        return;
    }
    list.push(candidate);
}

/// Variant of `token` with the largest synonym group, or the token itself
fn best_variant(token: &str, synonyms: &SynonymIndex) -> String {
    let mut best = token.to_string();
    let mut best_size = 1;
    for form in variants(token) {
        if char_len(&form) < 2 {
            continue;
        }
        let size = synonyms.group_size(&form);
        if size > best_size {
            best_size = size;
            best = form;
        }
    }
    best
}

/// Alternative phrasings of `query`, at most `max`, none equal to it
pub fn rephrase(
    query: &str,
    gazetteer: &Gazetteer,
    synonyms: &SynonymIndex,
    max: usize,
) -> Vec<String> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut alternatives = Vec::new();

    let normalized: Vec<String> = tokens
        .iter()
        .filter(|t| char_len(t) >= 2 && !is_number(t))
        .map(|t| best_variant(t, synonyms))
        .collect();
    if !normalized.is_empty() {
        push_new(&mut alternatives, normalized.join(" "), query);
    }

    let core: Vec<&String> = normalized
        .iter()
        .filter(|t| !is_core_stopword(t))
        .filter(|t| !gazetteer.is_exact(t))
        .filter(|t| !is_number(t) && char_len(t) >= 2)
        .collect();
    if !core.is_empty() && core.len() < normalized.len() {
        let core_query = core
            .iter()
            .take(CORE_TERMS)
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        push_new(&mut alternatives, core_query, query);
    }

    for token in core.iter().take(CATEGORY_LOOKUPS) {
        let group = synonyms.synonyms(token);
        if group.len() < 2 {
            continue;
        }
        let english = group.into_iter().find(|s| {
            s.is_ascii()
                && char_len(s) > 2
                && !s.eq_ignore_ascii_case(token)
                && !alternatives.contains(s)
                && s != query
        });
        if let Some(term) = english {
            alternatives.push(term);
            break;
        }
    }

    alternatives.truncate(max);
    tracing::debug!(query, alternatives = ?alternatives, "Generated rephrasings");
    alternatives
}

/// A query with no token longer than two characters outside the Hebrew
/// stop-word list
pub fn is_vague(query: &str) -> bool {
    !tokenize(query)
        .iter()
        .any(|t| char_len(t) >= MIN_MEANINGFUL_CHARS && !is_hebrew_stopword(t))
}

/// Message asking the user to name a domain
pub fn vague_query_message() -> String {
    let mut message = String::from("Query is too vague. Please specify a domain:");
    for (hebrew, english, examples) in VAGUE_QUERY_DOMAINS {
        message.push_str(&format!("\n• {} ({}) - {}", hebrew, english, examples));
    }
    message
}
