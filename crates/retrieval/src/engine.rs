//! Resource resolver
//!
//! Scores every (dataset, resource) pair of the corpus against a
//! decomposed query. Datasets whose combined text does not match the
//! subject well enough are dropped before any resource is considered, so
//! a strong location match alone never surfaces an unrelated dataset.

use datagov_config::{DomainData, ExpansionTable, Settings};
use datagov_core::{Corpus, Dataset, Resource, ResourceFormat, Schema, SchemaCatalog};
use datagov_text_processing::Gazetteer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::decomposer::{decompose, DecomposedQuery};
use crate::fields::{match_fields, FieldMatch};
use crate::keyword_index::KeywordIndex;
use crate::rephrase::{is_vague, rephrase, vague_query_message};
use crate::scoring::{location_match, round_score, ScoringWeights};
use crate::synonyms::SynonymIndex;
use crate::templates::{CandidateTemplates, TemplateBuilder};

/// Tags carried on a candidate
const CANDIDATE_TAGS: usize = 5;
/// Expansions named in the no-match message
const MESSAGE_EXPANSIONS: usize = 5;

/// A scored resource and the dataset that owns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub dataset_id: String,
    pub dataset_title: String,
    pub dataset_name: String,
    pub resource_id: String,
    pub resource_title: String,
    pub format: ResourceFormat,
    pub organization: String,
    pub tags: Vec<String>,
    pub score: f64,
    pub subject_score: f64,
    pub location_score: f64,
}

impl Candidate {
    fn new(dataset: &Dataset, resource: &Resource, score: f64, subject: f64, location: f64) -> Self {
        Self {
            dataset_id: dataset.id.clone(),
            dataset_title: dataset.display_title().to_string(),
            dataset_name: dataset.name.clone(),
            resource_id: resource.id.clone(),
            resource_title: resource.display_title().to_string(),
            format: resource.format.clone(),
            organization: dataset.organization.clone(),
            tags: dataset.tags.iter().take(CANDIDATE_TAGS).cloned().collect(),
            score,
            subject_score: subject,
            location_score: location,
        }
    }
}

/// Ranked candidates for one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolveResult {
    pub query: String,
    pub decomposition: DecomposedQuery,
    pub candidates: Vec<Candidate>,
    pub templates: Vec<CandidateTemplates>,
    /// Candidates that cleared the resource threshold before the top-N cut
    pub total_matched: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResolveResult {
    pub fn top_score(&self) -> f64 {
        self.candidates.first().map(|c| c.score).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Result of resolving with the rephrasing fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A candidate cleared the confidence threshold
    Found {
        result: ResolveResult,
        /// Alternative phrasing that produced the match, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rephrased_query: Option<String>,
    },
    /// The query names no domain specific enough to search
    TooVague { message: String },
    /// Neither the query nor any rephrasing matched confidently
    NotFound {
        query: String,
        decomposition: DecomposedQuery,
        message: String,
        attempted: Vec<String>,
    },
}

/// Immutable indices plus the scoring pass over them.
///
/// Built once at startup; every method takes `&self` so a single resolver
/// can serve concurrent queries.
#[derive(Debug)]
pub struct ResourceResolver {
    corpus: Corpus,
    schemas: SchemaCatalog,
    expansions: ExpansionTable,
    synonyms: SynonymIndex,
    keywords: KeywordIndex,
    gazetteer: Gazetteer,
    weights: ScoringWeights,
    templates: TemplateBuilder,
}

impl ResourceResolver {
    pub fn new(corpus: Corpus, expansions: ExpansionTable, gazetteer: Gazetteer) -> Self {
        let schemas = SchemaCatalog::from_corpus(&corpus);
        let synonyms = SynonymIndex::build(&expansions);
        let keywords = KeywordIndex::build(&corpus);
        tracing::info!(
            datasets = corpus.dataset_count(),
            resources = corpus.resource_count(),
            schemas = schemas.len(),
            "Resource resolver ready"
        );
        Self {
            corpus,
            schemas,
            expansions,
            synonyms,
            keywords,
            gazetteer,
            weights: ScoringWeights::default(),
            templates: TemplateBuilder::default(),
        }
    }

    /// Resolver over loaded domain data, tuned by `settings`
    pub fn from_domain(data: DomainData, settings: &Settings) -> Self {
        let gazetteer = Gazetteer::from(&data.gazetteer);
        Self::new(data.corpus, data.expansions, gazetteer)
            .with_weights(ScoringWeights::from(&settings.scoring))
            .with_templates(TemplateBuilder::from(&settings.fetch))
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_templates(mut self, templates: TemplateBuilder) -> Self {
        self.templates = templates;
        self
    }

    /// Replace the schemas extracted from the corpus
    pub fn with_schemas(mut self, schemas: SchemaCatalog) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn schemas(&self) -> &SchemaCatalog {
        &self.schemas
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn synonyms(&self) -> &SynonymIndex {
        &self.synonyms
    }

    pub fn keywords(&self) -> &KeywordIndex {
        &self.keywords
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Owning dataset and resource for an identifier
    pub fn resource(&self, resource_id: &str) -> Option<(&Dataset, &Resource)> {
        self.corpus.resource(resource_id)
    }

    /// Break `query` into subject and location parts
    pub fn decompose(&self, query: &str) -> DecomposedQuery {
        decompose(query, &self.gazetteer, &self.synonyms)
    }

    /// Rank the corpus against `query` and keep the best `limit` candidates
    pub fn resolve(&self, query: &str, limit: usize) -> ResolveResult {
        let decomposition = self.decompose(query);
        let query_lower = query.to_lowercase();
        let weights = &self.weights;

        let keyword_scores: HashMap<String, f64> = self.keywords.find_matching_resources(
            &decomposition.search_terms(),
            &self.synonyms,
            weights,
        );
        tracing::debug!(hits = keyword_scores.len(), "Keyword index lookup");

        let subjects = &decomposition.subject_tokens;
        let expanded = &decomposition.expanded_subjects;
        let mut candidates = Vec::new();

        for dataset in &self.corpus.datasets {
            let blob = dataset.search_text();
            let subject_score = weights.subject_match(subjects, expanded, &blob);
            if !subjects.is_empty() && subject_score < weights.min_subject_score {
                continue;
            }
            let location_score = location_match(&decomposition.location_tokens, &blob);
            let base = subject_score * weights.subject_weight + location_score * weights.location_weight;

            let dataset_bonus = weights.category_bonus(&dataset.categories, &query_lower, &self.expansions)
                + weights.keyword_bonus(&dataset.keywords, &query_lower);

            for resource in &dataset.resources {
                let title_score = weights.subject_match(subjects, expanded, resource.display_title());
                let mut score = base
                    + title_score * weights.resource_title_weight
                    + weights.format_bonus(&resource.format)
                    + dataset_bonus;
                if let Some(acc) = keyword_scores.get(&resource.id) {
                    score += weights.keyword_index_boost(*acc);
                }

                if score > weights.min_resource_score {
                    candidates.push(Candidate::new(
                        dataset,
                        resource,
                        round_score(score.min(1.0)),
                        round_score(subject_score),
                        round_score(location_score),
                    ));
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.resource_id.cmp(&b.resource_id))
        });
        let total_matched = candidates.len();
        candidates.truncate(limit);

        let message = candidates.is_empty().then(|| {
            let searched: Vec<&str> = expanded
                .iter()
                .take(MESSAGE_EXPANSIONS)
                .map(String::as_str)
                .collect();
            format!(
                "No datasets found matching subject '{}'. Hebrew expansions searched: [{}]. \
                 Try using Hebrew keywords or different terms.",
                subjects.join(" "),
                searched.join(", ")
            )
        });

        let templates = candidates
            .iter()
            .map(|c| self.templates.for_candidate(c, query))
            .collect();

        tracing::debug!(
            query,
            matched = total_matched,
            returned = candidates.len(),
            top = ?candidates.first().map(|c| c.score),
            "Resolved query"
        );

        ResolveResult {
            query: query.to_string(),
            decomposition: decomposition.for_display(),
            candidates,
            templates,
            total_matched,
            message,
        }
    }

    /// Resolve, and when the best score is below the confidence threshold,
    /// try alternative phrasings until one clears it
    pub fn resolve_with_fallback(&self, query: &str, limit: usize) -> SearchOutcome {
        let threshold = self.weights.confidence_threshold;
        let result = self.resolve(query, limit);
        if !result.is_empty() && result.top_score() >= threshold {
            return SearchOutcome::Found {
                result,
                rephrased_query: None,
            };
        }

        if is_vague(query) {
            tracing::debug!(query, "Query too vague to rephrase");
            return SearchOutcome::TooVague {
                message: vague_query_message(),
            };
        }

        let attempted = rephrase(
            query,
            &self.gazetteer,
            &self.synonyms,
            self.weights.max_rephrasings,
        );
        for alternative in &attempted {
            let rephrased = self.resolve(alternative, limit);
            if !rephrased.is_empty() && rephrased.top_score() >= threshold {
                tracing::info!(
                    query,
                    rephrased = %alternative,
                    score = rephrased.top_score(),
                    "Matched via rephrased query"
                );
                return SearchOutcome::Found {
                    result: rephrased,
                    rephrased_query: Some(alternative.clone()),
                };
            }
        }

        tracing::debug!(query, attempted = attempted.len(), "No confident match");
        SearchOutcome::NotFound {
            query: query.to_string(),
            decomposition: result.decomposition,
            message: format!(
                "No matching datasets found in the {} resources for: '{}'",
                self.corpus.resource_count(),
                query
            ),
            attempted,
        }
    }

    /// Match requested field intents against a resource's schema.
    ///
    /// A resource without a known schema yields no matches and every intent
    /// missing.
    pub fn match_fields(&self, resource_id: &str, intents: &[String]) -> FieldMatch {
        match self.schemas.get(resource_id) {
            Some(schema) => match_fields(intents, schema),
            None => match_fields(intents, &Schema::default()),
        }
    }
}
