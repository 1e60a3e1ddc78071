//! Typed corpus model
//!
//! A corpus is the static catalogue of datasets the resolver scores against.
//! It is loaded once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::schema::Schema;
use crate::{Error, Result};

/// Distribution format of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceFormat {
    Csv,
    Xlsx,
    Json,
    Xml,
    Api,
    Pdf,
    /// Anything else, stored upper-cased
    Other(String),
}

impl ResourceFormat {
    /// Parse a format label, case-insensitively
    pub fn parse(label: &str) -> Self {
        let upper = label.trim().to_uppercase();
        match upper.as_str() {
            "CSV" => Self::Csv,
            "XLSX" => Self::Xlsx,
            "JSON" => Self::Json,
            "XML" => Self::Xml,
            "API" => Self::Api,
            "PDF" => Self::Pdf,
            _ => Self::Other(upper),
        }
    }

    /// Upper-case label as it appears in candidate output
    pub fn as_str(&self) -> &str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Api => "API",
            Self::Pdf => "PDF",
            Self::Other(label) => label,
        }
    }

    /// Formats the datastore can serve as tabular records
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::Csv | Self::Json | Self::Xlsx)
    }
}

impl Default for ResourceFormat {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ResourceFormat {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<ResourceFormat> for String {
    fn from(format: ResourceFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for ResourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A downloadable resource owned by exactly one dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier (UUID on data.gov.il)
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Fallback name used when the title is empty
    #[serde(default)]
    pub name: String,
    /// Distribution format
    #[serde(default)]
    pub format: ResourceFormat,
    /// Precomputed schema, when one was extracted offline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl Resource {
    /// Title, falling back to name
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}

/// A published dataset and its resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub name: String,
    /// Ordered tag list
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub organization: String,
    /// Precomputed keywords (Hebrew and English)
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Precomputed topical categories (e.g. "health", "education")
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Dataset {
    /// Title, falling back to name
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }

    /// Combined searchable text: title, name, tags, organization
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.display_title(),
            self.name,
            self.tags.join(" "),
            self.organization
        )
    }

    /// Identifiers of all resources with a non-empty id
    pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
        self.resources
            .iter()
            .map(|r| r.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// The full static catalogue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

impl Corpus {
    /// Build a corpus, rejecting empty or duplicated resource identifiers
    pub fn new(datasets: Vec<Dataset>) -> Result<Self> {
        let corpus = Self { datasets };
        corpus.validate()?;
        Ok(corpus)
    }

    /// Check that every resource has a unique, non-empty identifier
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for dataset in &self.datasets {
            for resource in &dataset.resources {
                if resource.id.is_empty() {
                    return Err(Error::MissingResourceId {
                        dataset_id: dataset.id.clone(),
                    });
                }
                if !seen.insert(resource.id.as_str()) {
                    return Err(Error::InvalidCorpus(format!(
                        "resource {} appears in more than one place",
                        resource.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Find a resource and its owning dataset
    pub fn resource(&self, resource_id: &str) -> Option<(&Dataset, &Resource)> {
        self.datasets.iter().find_map(|ds| {
            ds.resources
                .iter()
                .find(|r| r.id == resource_id)
                .map(|r| (ds, r))
        })
    }

    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    pub fn resource_count(&self) -> usize {
        self.datasets.iter().map(|ds| ds.resources.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &str, format: &str) -> Resource {
        Resource {
            id: id.to_string(),
            title: String::new(),
            name: format!("{id}-name"),
            format: ResourceFormat::parse(format),
            schema: None,
        }
    }

    fn dataset(id: &str, resources: Vec<Resource>) -> Dataset {
        Dataset {
            id: id.to_string(),
            title: String::new(),
            name: format!("{id}-name"),
            tags: vec!["health".into(), "hospital".into()],
            organization: "Ministry of Health".into(),
            keywords: vec![],
            categories: vec![],
            resources,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(ResourceFormat::parse("csv"), ResourceFormat::Csv);
        assert_eq!(ResourceFormat::parse(" Xlsx "), ResourceFormat::Xlsx);
        assert_eq!(
            ResourceFormat::parse("zip"),
            ResourceFormat::Other("ZIP".into())
        );
        assert!(ResourceFormat::Json.is_tabular());
        assert!(!ResourceFormat::Pdf.is_tabular());
    }

    #[test]
    fn test_format_serde_roundtrip_as_label() {
        let json = serde_json::to_string(&ResourceFormat::Csv).unwrap();
        assert_eq!(json, "\"CSV\"");
        let parsed: ResourceFormat = serde_json::from_str("\"xml\"").unwrap();
        assert_eq!(parsed, ResourceFormat::Xml);
    }

    #[test]
    fn test_display_title_fallback() {
        let ds = dataset("d1", vec![]);
        assert_eq!(ds.display_title(), "d1-name");
        let r = resource("r1", "CSV");
        assert_eq!(r.display_title(), "r1-name");
    }

    #[test]
    fn test_search_text_contains_all_parts() {
        let mut ds = dataset("d1", vec![]);
        ds.title = "בתי חולים".into();
        let text = ds.search_text();
        assert!(text.contains("בתי חולים"));
        assert!(text.contains("d1-name"));
        assert!(text.contains("health hospital"));
        assert!(text.contains("Ministry of Health"));
    }

    #[test]
    fn test_corpus_rejects_duplicate_ids() {
        let result = Corpus::new(vec![
            dataset("d1", vec![resource("r1", "CSV")]),
            dataset("d2", vec![resource("r1", "JSON")]),
        ]);
        assert!(matches!(result, Err(Error::InvalidCorpus(_))));
    }

    #[test]
    fn test_corpus_rejects_missing_id() {
        let result = Corpus::new(vec![dataset("d1", vec![resource("", "CSV")])]);
        assert!(matches!(result, Err(Error::MissingResourceId { .. })));
    }

    #[test]
    fn test_resource_lookup() {
        let corpus = Corpus::new(vec![
            dataset("d1", vec![resource("r1", "CSV")]),
            dataset("d2", vec![resource("r2", "PDF"), resource("r3", "API")]),
        ])
        .unwrap();

        let (ds, res) = corpus.resource("r3").unwrap();
        assert_eq!(ds.id, "d2");
        assert_eq!(res.format, ResourceFormat::Api);
        assert!(corpus.resource("missing").is_none());
        assert_eq!(corpus.dataset_count(), 2);
        assert_eq!(corpus.resource_count(), 3);
    }

    #[test]
    fn test_deserialize_minimal_dataset() {
        let json = r#"{"datasets":[{"id":"d1","title":"Road Maintenance",
            "resources":[{"id":"r1","format":"csv"}]}]}"#;
        let corpus: Corpus = serde_json::from_str(json).unwrap();
        assert_eq!(corpus.datasets[0].resources[0].format, ResourceFormat::Csv);
        assert!(corpus.datasets[0].tags.is_empty());
    }
}
