//! End-to-end query pipeline
//!
//! Resolve a natural-language query to one resource, then fetch its
//! records through a [`RecordSource`]. Steps:
//! 1. resolve with the rephrasing fallback (vague and not-found stop here)
//! 2. drop candidates lacking the requested kinds of fields
//! 3. pick the best datastore-backed resource and grade the confidence
//! 4. map field intents onto the schema, filter by location
//! 5. fetch with retries, and sum numeric columns for count queries

use datagov_config::FetchConfig;
use datagov_core::{Field, FetchRequest, Record, RecordSource};
use datagov_text_processing::{extract_field_intents, first_non_ascii, is_count_query};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::aggregate::{calculate_aggregates, ColumnAggregate};
use crate::decomposer::DecomposedQuery;
use crate::engine::{Candidate, ResourceResolver, SearchOutcome};
use crate::fetch::{fetch_with_retry, RetryPolicy};
use crate::fields::{filter_by_availability, match_fields};
use crate::RetrievalError;

/// Schema fields echoed in the metadata
const METADATA_SCHEMA_FIELDS: usize = 15;
/// Alternative titles offered with a low-confidence warning
const LOW_CONFIDENCE_ALTERNATIVES: usize = 3;
const ALTERNATIVE_TITLE_CHARS: usize = 40;
const INTERNAL_ID: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
}

/// Attached when the selected resource scored below the high-confidence band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWarning {
    pub level: ConfidenceLevel,
    pub message: String,
    pub score: f64,
    /// Other dataset titles worth a look, low confidence only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

/// Requested fields the selected resource does not have
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWarning {
    pub message: String,
    pub missing_intents: Vec<String>,
    pub matched_fields: Vec<String>,
    pub available_fields: Vec<String>,
}

/// What was selected and how the fetch was shaped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMetadata {
    pub query: String,
    pub resource_id: String,
    pub dataset_title: String,
    pub resource_title: String,
    pub format: String,
    pub organization: String,
    pub total: u64,
    pub returned: usize,
    pub offset: usize,
    pub has_more: bool,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location_filter: Vec<String>,
    pub filter_applied: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_intents: Vec<String>,
    pub is_count_query: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rephrased_query: Option<String>,
}

/// Records of the selected resource plus everything learned on the way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryData {
    pub records: Vec<Record>,
    /// Column names, internal id excluded
    pub fields: Vec<String>,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<BTreeMap<String, ColumnAggregate>>,
    pub metadata: QueryMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_warning: Option<ConfidenceWarning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_warning: Option<FieldWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    Data(Box<QueryData>),
    TooVague {
        message: String,
    },
    NotFound {
        query: String,
        decomposition: DecomposedQuery,
        message: String,
    },
}

/// Resolver plus upstream source
pub struct QueryPipeline {
    resolver: Arc<ResourceResolver>,
    source: Arc<dyn RecordSource>,
    fetch: FetchConfig,
}

impl QueryPipeline {
    pub fn new(resolver: Arc<ResourceResolver>, source: Arc<dyn RecordSource>) -> Self {
        Self {
            resolver,
            source,
            fetch: FetchConfig::default(),
        }
    }

    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    /// Answer `query` with records from the best matching resource
    pub async fn run(
        &self,
        query: &str,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<QueryOutcome, RetrievalError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }

        let count_query = is_count_query(query);
        let limit = if count_query {
            self.fetch.max_limit
        } else {
            self.fetch.clamp_limit(limit)
        };

        let weights = self.resolver.weights();
        let (result, rephrased_query) =
            match self.resolver.resolve_with_fallback(query, weights.pipeline_candidates) {
                SearchOutcome::Found {
                    result,
                    rephrased_query,
                } => (result, rephrased_query),
                SearchOutcome::TooVague { message } => {
                    return Ok(QueryOutcome::TooVague { message });
                }
                SearchOutcome::NotFound {
                    query,
                    decomposition,
                    message,
                    ..
                } => {
                    return Ok(QueryOutcome::NotFound {
                        query,
                        decomposition,
                        message,
                    });
                }
            };

        let field_intents = extract_field_intents(query);
        let candidates =
            filter_by_availability(result.candidates, &field_intents, self.resolver.schemas());
        let best = select_best(&candidates, weights.min_resource_score)
            .ok_or_else(|| RetrievalError::NoCandidates(query.to_string()))?;
        if best.resource_id.is_empty() {
            return Err(RetrievalError::MissingResourceId {
                dataset_id: best.dataset_id.clone(),
            });
        }

        let confidence_warning = self.grade_confidence(best, &candidates);
        if let Some(warning) = &confidence_warning {
            tracing::warn!(
                level = ?warning.level,
                score = best.score,
                resource_id = %best.resource_id,
                "Selected resource below high confidence"
            );
        }
        tracing::info!(
            resource_id = %best.resource_id,
            dataset = %best.dataset_title,
            score = best.score,
            "Selected resource"
        );

        let schema_fields: Vec<String> = self
            .resolver
            .schemas()
            .get(&best.resource_id)
            .map(|s| s.field_names().map(str::to_string).collect())
            .unwrap_or_default();

        let mut selected_fields = Vec::new();
        let mut field_warning = None;
        if !field_intents.is_empty() && !schema_fields.is_empty() {
            if let Some(schema) = self.resolver.schemas().get(&best.resource_id) {
                let matched = match_fields(&field_intents, schema);
                if !matched.is_complete() {
                    tracing::debug!(missing = ?matched.missing_intents, "Requested fields unavailable");
                    field_warning = Some(FieldWarning {
                        message: format!(
                            "The requested fields ({}) are not available in this dataset.",
                            matched.missing_intents.join(", ")
                        ),
                        missing_intents: matched.missing_intents.clone(),
                        matched_fields: matched.matched_fields.clone(),
                        available_fields: matched.all_fields.clone(),
                    });
                }
                selected_fields = matched.matched_fields;
            }
        }

        let decomposition = self.resolver.decompose(query);
        let location_tokens = decomposition.location_tokens;
        let filter_values = self.resolver.gazetteer().filter_values_for(&location_tokens);

        let mut request = FetchRequest::new(&best.resource_id, limit)
            .with_offset(offset)
            .with_fields(selected_fields);
        if let Some(location) = first_non_ascii(&filter_values) {
            request = request.with_q(location).with_plain(true);
        }

        let page = fetch_with_retry(
            self.source.as_ref(),
            &request,
            RetryPolicy::from(&self.fetch),
        )
        .await?;

        let returned = page.records.len();
        let total = page.total.unwrap_or(returned as u64);
        let aggregates = (count_query && !page.records.is_empty())
            .then(|| calculate_aggregates(&page.records, &page.fields))
            .filter(|a| !a.is_empty());
        if let Some(aggregates) = &aggregates {
            tracing::info!(columns = aggregates.len(), "Calculated aggregates");
        }

        let metadata = QueryMetadata {
            query: query.to_string(),
            resource_id: best.resource_id.clone(),
            dataset_title: best.dataset_title.clone(),
            resource_title: best.resource_title.clone(),
            format: best.format.to_string(),
            organization: best.organization.clone(),
            total,
            returned,
            offset,
            has_more: ((offset + returned) as u64) < total,
            score: best.score,
            location_filter: location_tokens,
            filter_applied: !filter_values.is_empty(),
            schema_fields: schema_fields.into_iter().take(METADATA_SCHEMA_FIELDS).collect(),
            field_intents,
            is_count_query: count_query,
            rephrased_query,
        };

        Ok(QueryOutcome::Data(Box::new(QueryData {
            fields: column_names(&page.fields),
            records: page.records,
            total,
            aggregates,
            metadata,
            confidence_warning,
            field_warning,
        })))
    }

    fn grade_confidence(&self, best: &Candidate, candidates: &[Candidate]) -> Option<ConfidenceWarning> {
        let weights = self.resolver.weights();
        if best.score < weights.confidence_threshold {
            Some(ConfidenceWarning {
                level: ConfidenceLevel::Low,
                message: "No dataset closely matches your query. Results may not be relevant."
                    .to_string(),
                score: best.score,
                alternatives: candidates
                    .iter()
                    .take(LOW_CONFIDENCE_ALTERNATIVES)
                    .map(|c| c.dataset_title.chars().take(ALTERNATIVE_TITLE_CHARS).collect())
                    .collect(),
            })
        } else if best.score < weights.medium_confidence_threshold {
            Some(ConfidenceWarning {
                level: ConfidenceLevel::Medium,
                message: "Partial match found. Review results to confirm relevance.".to_string(),
                score: best.score,
                alternatives: Vec::new(),
            })
        } else {
            None
        }
    }
}

/// First tabular candidate above `min_score`, else the top candidate
pub fn select_best(candidates: &[Candidate], min_score: f64) -> Option<&Candidate> {
    candidates
        .iter()
        .find(|c| c.format.is_tabular() && c.score > min_score)
        .or_else(|| candidates.first())
}

fn column_names(fields: &[Field]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.name != INTERNAL_ID)
        .map(|f| f.name.clone())
        .collect()
}
