//! Keyword index over the corpus
//!
//! Maps lower-cased keywords, title words and categories to the resources
//! of the datasets carrying them. Lets a query reach a dataset through a
//! term that only appears in its precomputed keyword list.

use datagov_core::Corpus;
use datagov_text_processing::variants;
use std::collections::{HashMap, HashSet};

use crate::synonyms::SynonymIndex;
use crate::ScoringWeights;

/// Title words shorter than this are not indexed
const MIN_TITLE_WORD_CHARS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    keywords: HashMap<String, Vec<String>>,
    categories: HashMap<String, Vec<String>>,
}

impl KeywordIndex {
    /// Index every dataset that owns at least one resource
    pub fn build(corpus: &Corpus) -> Self {
        let mut keywords: HashMap<String, Vec<String>> = HashMap::new();
        let mut categories: HashMap<String, Vec<String>> = HashMap::new();

        for dataset in &corpus.datasets {
            let resource_ids: Vec<String> =
                dataset.resource_ids().map(str::to_string).collect();
            if resource_ids.is_empty() {
                continue;
            }

            for keyword in &dataset.keywords {
                keywords
                    .entry(keyword.to_lowercase())
                    .or_default()
                    .extend(resource_ids.iter().cloned());
            }

            for category in &dataset.categories {
                categories
                    .entry(category.to_lowercase())
                    .or_default()
                    .extend(resource_ids.iter().cloned());
            }

            let title = dataset.title.to_lowercase();
            for word in title.split_whitespace() {
                if word.chars().count() >= MIN_TITLE_WORD_CHARS {
                    keywords
                        .entry(word.to_string())
                        .or_default()
                        .extend(resource_ids.iter().cloned());
                }
            }
        }

        tracing::info!(
            keywords = keywords.len(),
            categories = categories.len(),
            "Keyword index built"
        );

        Self {
            keywords,
            categories,
        }
    }

    /// Resources indexed under a keyword or title word
    pub fn resources_by_keyword(&self, keyword: &str) -> &[String] {
        self.keywords
            .get(&keyword.to_lowercase())
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Resources indexed under a category
    pub fn resources_by_category(&self, category: &str) -> &[String] {
        self.categories
            .get(&category.to_lowercase())
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Accumulated hit score per resource for a set of query terms.
    ///
    /// Each term is tried in all its morphological variants (full credit
    /// for the term itself, less for other variants) and then through the
    /// synonyms of those variants. Scores are additive and unbounded.
    pub fn find_matching_resources(
        &self,
        tokens: &[String],
        synonyms: &SynonymIndex,
        weights: &ScoringWeights,
    ) -> HashMap<String, f64> {
        let mut scores: HashMap<String, f64> = HashMap::new();
        if self.keywords.is_empty() {
            return scores;
        }

        for token in tokens {
            let token_lower = token.to_lowercase();
            let forms = variants(token);
            let mut checked: HashSet<String> = HashSet::new();

            for form in &forms {
                let form_lower = form.to_lowercase();
                if !checked.insert(form_lower.clone()) {
                    continue;
                }
                let hit = if form_lower == token_lower {
                    weights.keyword_hit_original
                } else {
                    weights.keyword_hit_variant
                };
                for id in self.resources_by_keyword(&form_lower) {
                    *scores.entry(id.clone()).or_insert(0.0) += hit;
                }
            }

            for form in &forms {
                for synonym in synonyms.synonyms(form) {
                    let synonym_lower = synonym.to_lowercase();
                    if !checked.insert(synonym_lower.clone()) {
                        continue;
                    }
                    for id in self.resources_by_keyword(&synonym_lower) {
                        *scores.entry(id.clone()).or_insert(0.0) += weights.keyword_hit_synonym;
                    }
                }
            }
        }

        scores
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagov_config::ExpansionTable;
    use datagov_core::{Dataset, Resource, ResourceFormat};

    fn dataset(id: &str, title: &str, keywords: &[&str], categories: &[&str], rid: &str) -> Dataset {
        Dataset {
            id: id.to_string(),
            title: title.to_string(),
            name: String::new(),
            tags: vec![],
            organization: String::new(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            resources: vec![Resource {
                id: rid.to_string(),
                title: String::new(),
                name: String::new(),
                format: ResourceFormat::Csv,
                schema: None,
            }],
        }
    }

    fn corpus() -> Corpus {
        Corpus {
            datasets: vec![
                dataset("d1", "רכבים חשמליים", &["רכב", "Vehicles"], &["transport"], "r1"),
                dataset("d2", "Air Quality", &["אוויר"], &["environment"], "r2"),
            ],
        }
    }

    #[test]
    fn test_lookups() {
        let index = KeywordIndex::build(&corpus());
        assert_eq!(index.resources_by_keyword("VEHICLES"), ["r1".to_string()]);
        assert_eq!(index.resources_by_keyword("quality"), ["r2".to_string()]);
        // "air" is too short to be indexed as a title word
        assert!(index.resources_by_keyword("air").is_empty());
        assert_eq!(index.resources_by_category("Transport"), ["r1".to_string()]);
        // categories stay out of the keyword map
        assert!(index.resources_by_keyword("transport").is_empty());
        assert!(index.resources_by_keyword("missing").is_empty());
    }

    #[test]
    fn test_variant_scoring() {
        let index = KeywordIndex::build(&corpus());
        let synonyms = SynonymIndex::default();
        let weights = ScoringWeights::default();

        // exact title word
        let scores = index.find_matching_resources(&["חשמליים".into()], &synonyms, &weights);
        assert_eq!(scores.get("r1"), Some(&1.0));

        // prefixed plural reaches "רכבים" (title) and "רכב" (keyword) as variants
        let scores = index.find_matching_resources(&["לרכבים".into()], &synonyms, &weights);
        assert!((scores["r1"] - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_synonym_scoring() {
        let index = KeywordIndex::build(&corpus());
        let table: ExpansionTable = vec![("air".to_string(), vec!["אוויר".to_string()])]
            .into_iter()
            .collect();
        let synonyms = SynonymIndex::build(&table);
        let scores =
            index.find_matching_resources(&["air".into()], &synonyms, &ScoringWeights::default());
        assert_eq!(scores.get("r2"), Some(&0.5));
    }

    #[test]
    fn test_dataset_without_resources_skipped() {
        let mut corpus = corpus();
        corpus.datasets[1].resources.clear();
        let index = KeywordIndex::build(&corpus);
        assert!(index.resources_by_keyword("quality").is_empty());
    }
}
