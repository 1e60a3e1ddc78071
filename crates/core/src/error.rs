//! Error types shared across the resolver crates

use thiserror::Error;

/// Top-level resolver error
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error("Candidate from dataset {dataset_id} has no resource identifier")]
    MissingResourceId { dataset_id: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Upstream fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used by the core crate and its dependents
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by an upstream record source.
///
/// The variants drive retry decisions: `Forbidden` and `Transient` are
/// worth another attempt, `NotFound` and `Api` are not.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Access denied (403) for resource {0}")]
    Forbidden(String),

    #[error("Resource {0} not found in datastore")]
    NotFound(String),

    #[error("Transient upstream error: {0}")]
    Transient(String),

    #[error("Upstream API error: {0}")]
    Api(String),
}

impl FetchError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::Transient(_))
    }
}
