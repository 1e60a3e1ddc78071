//! Upstream record source interface
//!
//! The resolver never performs network I/O itself. Once a resource is
//! selected, callers hand a [`FetchRequest`] to a [`RecordSource`]
//! implementation (an HTTP client against the CKAN datastore in
//! production, an in-memory table in tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FetchError;
use crate::schema::Field;

/// One datastore row
pub type Record = Map<String, Value>;

/// Parameters of a single `datastore_search` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub resource_id: String,
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    /// Exact-match column filters
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub filters: Map<String, Value>,
    /// Plain-text search term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Plain-text (true) or full-text query syntax (false) for `q`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain: Option<bool>,
    /// Restrict the returned columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl FetchRequest {
    pub fn new(resource_id: impl Into<String>, limit: usize) -> Self {
        Self {
            resource_id: resource_id.into(),
            limit,
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn with_plain(mut self, plain: bool) -> Self {
        self.plain = Some(plain);
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filters.insert(field.into(), value);
        self
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }
}

/// A page of records plus the column layout reported upstream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Total rows matching the request upstream, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Upstream datastore collaborator
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Run one search request
    async fn search(&self, request: &FetchRequest) -> Result<RecordPage, FetchError>;

    /// Source name for logging
    fn name(&self) -> &str {
        "record-source"
    }
}
