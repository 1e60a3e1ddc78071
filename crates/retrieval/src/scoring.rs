//! Relevance scoring
//!
//! Pure functions over typed inputs. The weights are tuned values; every
//! one of them lives in [`ScoringWeights`] so settings can override them.

use datagov_config::constants::scoring;
use datagov_config::{ExpansionTable, ScoringConfig};
use datagov_core::ResourceFormat;
use datagov_text_processing::tokenize;
use std::collections::HashSet;

/// Expansion words shorter than this never count as a partial hit
const MIN_EXPANSION_WORD_CHARS: usize = 3;

/// Every weight and threshold used while ranking
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub subject_weight: f64,
    pub location_weight: f64,
    pub resource_title_weight: f64,
    pub min_subject_score: f64,
    pub min_resource_score: f64,
    pub confidence_threshold: f64,
    pub medium_confidence_threshold: f64,

    pub format_csv: f64,
    pub format_xlsx: f64,
    pub format_json: f64,
    pub format_xml: f64,
    pub format_api: f64,
    pub format_pdf: f64,

    pub category_bonus: f64,
    pub category_expansion_bonus: f64,
    pub keyword_match_bonus: f64,
    pub keyword_match_max: usize,
    pub keyword_bonus_cap: f64,
    pub keywords_checked: usize,
    pub keyword_index_factor: f64,
    pub keyword_index_cap: f64,

    pub exact_token_match: f64,
    pub substring_token_match: f64,
    pub expansion_check_weight: f64,
    pub expansion_phrase_match: f64,
    pub expansion_word_match: f64,

    pub keyword_hit_original: f64,
    pub keyword_hit_variant: f64,
    pub keyword_hit_synonym: f64,

    pub max_rephrasings: usize,
    pub pipeline_candidates: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::from(&ScoringConfig::default())
    }
}

impl From<&ScoringConfig> for ScoringWeights {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            subject_weight: config.subject_weight,
            location_weight: config.location_weight,
            resource_title_weight: config.resource_title_weight,
            min_subject_score: config.min_subject_score,
            min_resource_score: config.min_resource_score,
            confidence_threshold: config.confidence_threshold,
            medium_confidence_threshold: config.medium_confidence_threshold,
            format_csv: config.format_bonus.csv,
            format_xlsx: config.format_bonus.xlsx,
            format_json: config.format_bonus.json,
            format_xml: config.format_bonus.xml,
            format_api: config.format_bonus.api,
            format_pdf: config.format_bonus.pdf,
            category_bonus: config.category_bonus,
            category_expansion_bonus: config.category_expansion_bonus,
            keyword_match_bonus: config.keyword_match_bonus,
            keyword_match_max: config.keyword_match_max,
            keyword_bonus_cap: config.keyword_bonus_cap,
            keywords_checked: config.keywords_checked,
            keyword_index_factor: config.keyword_index_factor,
            keyword_index_cap: config.keyword_index_cap,
            exact_token_match: scoring::EXACT_TOKEN_MATCH,
            substring_token_match: scoring::SUBSTRING_TOKEN_MATCH,
            expansion_check_weight: scoring::EXPANSION_CHECK_WEIGHT,
            expansion_phrase_match: scoring::EXPANSION_PHRASE_MATCH,
            expansion_word_match: scoring::EXPANSION_WORD_MATCH,
            keyword_hit_original: scoring::KEYWORD_HIT_ORIGINAL,
            keyword_hit_variant: scoring::KEYWORD_HIT_VARIANT,
            keyword_hit_synonym: scoring::KEYWORD_HIT_SYNONYM,
            max_rephrasings: config.max_rephrasings,
            pipeline_candidates: config.pipeline_candidates,
        }
    }
}

impl ScoringWeights {
    /// Preference bonus for a distribution format
    pub fn format_bonus(&self, format: &ResourceFormat) -> f64 {
        match format {
            ResourceFormat::Csv => self.format_csv,
            ResourceFormat::Xlsx => self.format_xlsx,
            ResourceFormat::Json => self.format_json,
            ResourceFormat::Xml => self.format_xml,
            ResourceFormat::Api => self.format_api,
            ResourceFormat::Pdf => self.format_pdf,
            ResourceFormat::Other(_) => 0.0,
        }
    }

    /// How well subjects and their expansions cover `text`, in `[0, 1]`.
    ///
    /// A subject token counts fully when it is one of the text's tokens and
    /// partially when it only occurs as a substring. Expansions weigh half
    /// a check each and score on a phrase hit, or on the first long word
    /// of the phrase found in the text.
    pub fn subject_match(&self, subjects: &[String], expansions: &[String], text: &str) -> f64 {
        if text.is_empty() || (subjects.is_empty() && expansions.is_empty()) {
            return 0.0;
        }

        let text_lower = text.to_lowercase();
        let text_tokens: HashSet<String> = tokenize(text).into_iter().collect();

        let mut matches = 0.0;
        let mut total = 0.0;

        for subject in subjects {
            total += self.exact_token_match;
            if text_tokens.contains(subject) {
                matches += self.exact_token_match;
            } else if text_lower.contains(subject.as_str()) {
                matches += self.substring_token_match;
            }
        }

        for expansion in expansions {
            total += self.expansion_check_weight;
            let expansion_lower = expansion.to_lowercase();
            if text_lower.contains(&expansion_lower) {
                matches += self.expansion_phrase_match;
            } else if expansion_lower.split_whitespace().any(|word| {
                word.chars().count() >= MIN_EXPANSION_WORD_CHARS && text_lower.contains(word)
            }) {
                matches += self.expansion_word_match;
            }
        }

        if total == 0.0 {
            return 0.0;
        }
        (matches / total).min(1.0)
    }

    /// Bonus when the query names one of the dataset's categories, or one
    /// of a category's own expansions
    pub fn category_bonus(
        &self,
        categories: &[String],
        query_lower: &str,
        expansions: &ExpansionTable,
    ) -> f64 {
        let mut bonus: f64 = 0.0;
        for category in categories.iter().filter(|c| !c.trim().is_empty()) {
            if query_lower.contains(&category.to_lowercase()) {
                bonus = self.category_bonus;
                break;
            }
            let expanded_hit = expansions.get(category).is_some_and(|terms| {
                terms
                    .iter()
                    .filter(|term| !term.trim().is_empty())
                    .any(|term| query_lower.contains(&term.to_lowercase()))
            });
            if expanded_hit {
                bonus = bonus.max(self.category_expansion_bonus);
            }
        }
        bonus.min(self.category_bonus)
    }

    /// Bonus per precomputed keyword overlapping the query
    pub fn keyword_bonus(&self, keywords: &[String], query_lower: &str) -> f64 {
        let mut hits = 0usize;
        for keyword in keywords.iter().take(self.keywords_checked) {
            let keyword_lower = keyword.trim().to_lowercase();
            if keyword_lower.is_empty() {
                continue;
            }
            if query_lower.contains(&keyword_lower) || keyword_lower.contains(query_lower) {
                hits += 1;
                if hits >= self.keyword_match_max {
                    break;
                }
            }
        }
        if hits == 0 {
            return 0.0;
        }
        (hits as f64 * self.keyword_match_bonus).min(self.keyword_bonus_cap)
    }

    /// Boost from the accumulated keyword-index score of a resource
    pub fn keyword_index_boost(&self, accumulated: f64) -> f64 {
        (accumulated * self.keyword_index_factor).min(self.keyword_index_cap)
    }
}

/// Fraction of location tokens occurring in `text`
pub fn location_match(locations: &[String], text: &str) -> f64 {
    if locations.is_empty() || text.is_empty() {
        return 0.0;
    }
    let text_lower = text.to_lowercase();
    let hits = locations
        .iter()
        .filter(|loc| text_lower.contains(loc.as_str()))
        .count();
    (hits as f64 / locations.len() as f64).min(1.0)
}

/// Round to `scoring::SCORE_PRECISION` decimals
pub fn round_score(value: f64) -> f64 {
    round_to(value, scoring::SCORE_PRECISION)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
