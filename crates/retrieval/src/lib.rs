//! Resource resolution over the data.gov.il catalogue
//!
//! Features:
//! - Symmetric bilingual synonym index and keyword index, built once
//! - Query decomposition into subject and location tokens
//! - Subject-first relevance scoring with format, category and keyword bonuses
//! - Rephrasing fallback for low-confidence queries
//! - Field-intent matching against resource schemas
//! - CKAN request templates, retrying fetch, aggregates for count queries

pub mod aggregate;
pub mod decomposer;
pub mod engine;
pub mod fetch;
pub mod fields;
pub mod keyword_index;
pub mod pipeline;
pub mod rephrase;
pub mod scoring;
pub mod synonyms;
pub mod templates;

pub use aggregate::{calculate_aggregates, ColumnAggregate};
pub use decomposer::{decompose, DecomposedQuery};
pub use engine::{Candidate, ResolveResult, ResourceResolver, SearchOutcome};
pub use fetch::{fetch_with_retry, RetryPolicy};
pub use fields::{filter_by_availability, match_field_names, match_fields, FieldMatch};
pub use keyword_index::KeywordIndex;
pub use pipeline::{
    select_best, ConfidenceLevel, ConfidenceWarning, FieldWarning, QueryData, QueryMetadata,
    QueryOutcome, QueryPipeline,
};
pub use rephrase::{is_vague, rephrase, vague_query_message};
pub use scoring::ScoringWeights;
pub use synonyms::SynonymIndex;
pub use templates::{CandidateTemplates, RequestTemplate, TemplateBuilder};

use datagov_core::FetchError;
use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("No candidate resources for query: {0}")]
    NoCandidates(String),

    #[error("Candidate from dataset {dataset_id} has no resource identifier")]
    MissingResourceId { dataset_id: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl From<RetrievalError> for datagov_core::Error {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::MissingResourceId { dataset_id } => {
                datagov_core::Error::MissingResourceId { dataset_id }
            }
            RetrievalError::Fetch(err) => datagov_core::Error::Fetch(err),
            other => datagov_core::Error::Retrieval(other.to_string()),
        }
    }
}
