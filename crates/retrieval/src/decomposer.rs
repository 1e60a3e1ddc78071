//! Query decomposition
//!
//! Splits a query into what the user asks about (subject tokens) and where
//! (location tokens), and expands each subject through its morphological
//! variants and their synonym groups.

use datagov_text_processing::{strip_prefix_forced, tokenize, variants, Gazetteer};
use serde::{Deserialize, Serialize};

use crate::synonyms::SynonymIndex;

/// Expanded subjects kept when a decomposition is reported back
pub const DISPLAY_EXPANSIONS: usize = 10;

/// A query split into subject and location parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecomposedQuery {
    /// Tokens that are not locations, unmodified
    pub subject_tokens: Vec<String>,
    /// Location tokens with any Hebrew prefix removed
    pub location_tokens: Vec<String>,
    /// Location tokens as they appeared in the query
    #[serde(default)]
    pub location_tokens_original: Vec<String>,
    /// Variants and synonyms of the subject tokens, deduplicated
    pub expanded_subjects: Vec<String>,
    /// Every token the tokenizer produced
    pub all_tokens: Vec<String>,
}

impl DecomposedQuery {
    pub fn has_subjects(&self) -> bool {
        !self.subject_tokens.is_empty()
    }

    /// Copy with the expansion list cut to [`DISPLAY_EXPANSIONS`]
    pub fn for_display(&self) -> Self {
        let mut shown = self.clone();
        shown.expanded_subjects.truncate(DISPLAY_EXPANSIONS);
        shown
    }

    /// Subject tokens followed by their expansions
    pub fn search_terms(&self) -> Vec<String> {
        self.subject_tokens
            .iter()
            .chain(self.expanded_subjects.iter())
            .cloned()
            .collect()
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Decompose a raw query against a gazetteer and synonym index
pub fn decompose(query: &str, gazetteer: &Gazetteer, synonyms: &SynonymIndex) -> DecomposedQuery {
    let tokens = tokenize(query);
    let mut result = DecomposedQuery::default();

    for token in &tokens {
        if gazetteer.matches(token) {
            result.location_tokens.push(token.clone());
            result.location_tokens_original.push(token.clone());
            continue;
        }

        let stripped = strip_prefix_forced(token);
        if stripped != *token && gazetteer.matches(&stripped) {
            result.location_tokens.push(stripped);
            result.location_tokens_original.push(token.clone());
            continue;
        }

        result.subject_tokens.push(token.clone());
        let forms = variants(token);
        for form in &forms {
            let group = synonyms.synonyms(form);
            if group.len() > 1 {
                for synonym in group {
                    push_unique(&mut result.expanded_subjects, synonym);
                }
            }
        }
        for form in forms {
            push_unique(&mut result.expanded_subjects, form);
        }
    }

    // Multi-word places ("tel aviv", "באר שבע") the token pass split apart
    for entry in gazetteer.entries_in(query) {
        let known = result
            .location_tokens
            .iter()
            .any(|loc| loc.to_lowercase() == entry);
        if !known {
            result.location_tokens.push(entry.to_string());
            result.location_tokens_original.push(entry.to_string());
        }
    }

    result.all_tokens = tokens;

    tracing::debug!(
        subjects = result.subject_tokens.len(),
        locations = result.location_tokens.len(),
        expansions = result.expanded_subjects.len(),
        "Decomposed query"
    );

    result
}
