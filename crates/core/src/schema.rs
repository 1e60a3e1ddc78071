//! Resource schemas and field availability flags

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::corpus::Corpus;

/// Semantic role detected for a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SemanticTag {
    Phone,
    Address,
    Email,
    Date,
    City,
    Name,
    Url,
    Other(String),
}

impl SemanticTag {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "phone" => Self::Phone,
            "address" => Self::Address,
            "email" => Self::Email,
            "date" => Self::Date,
            "city" => Self::City,
            "name" => Self::Name,
            "url" => Self::Url,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Email => "email",
            Self::Date => "date",
            Self::City => "city",
            Self::Name => "name",
            Self::Url => "url",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for SemanticTag {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<SemanticTag> for String {
    fn from(tag: SemanticTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column of a tabular resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Column name (`id` in datastore responses)
    #[serde(alias = "id")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticTag>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            semantic: None,
        }
    }

    pub fn with_semantic(mut self, tag: SemanticTag) -> Self {
        self.semantic = Some(tag);
        self
    }
}

/// Coarse field categories used when filtering candidates by user intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    Phone,
    Address,
    Email,
    Date,
    Location,
}

/// Precomputed flags describing which kinds of data a resource carries.
///
/// Missing flags deserialize as `true`: an unknown answer never excludes
/// a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAvailability {
    #[serde(default = "default_true")]
    pub has_phone: bool,
    #[serde(default = "default_true")]
    pub has_address: bool,
    #[serde(default = "default_true")]
    pub has_location: bool,
    #[serde(default = "default_true")]
    pub has_email: bool,
    #[serde(default = "default_true")]
    pub has_date: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FieldAvailability {
    fn default() -> Self {
        Self {
            has_phone: true,
            has_address: true,
            has_location: true,
            has_email: true,
            has_date: true,
        }
    }
}

impl FieldAvailability {
    pub fn has(&self, category: FieldCategory) -> bool {
        match category {
            FieldCategory::Phone => self.has_phone,
            FieldCategory::Address => self.has_address,
            FieldCategory::Email => self.has_email,
            FieldCategory::Date => self.has_date,
            FieldCategory::Location => self.has_location,
        }
    }
}

/// Column layout of one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub field_availability: FieldAvailability,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            field_availability: FieldAvailability::default(),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// First field carrying the given semantic tag
    pub fn field_for_tag(&self, tag: &str) -> Option<&Field> {
        let wanted = SemanticTag::parse(tag);
        self.fields
            .iter()
            .find(|f| f.semantic.as_ref() == Some(&wanted))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Schemas keyed by resource identifier
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: HashMap<String, Schema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every schema embedded in the corpus
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let schemas = corpus
            .datasets
            .iter()
            .flat_map(|ds| ds.resources.iter())
            .filter_map(|r| r.schema.clone().map(|s| (r.id.clone(), s)))
            .collect();
        Self { schemas }
    }

    pub fn insert(&mut self, resource_id: impl Into<String>, schema: Schema) {
        self.schemas.insert(resource_id.into(), schema);
    }

    pub fn get(&self, resource_id: &str) -> Option<&Schema> {
        self.schemas.get(resource_id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
