//! Ready-to-use CKAN request templates
//!
//! For each candidate the resolver reports the upstream requests a caller
//! can issue directly: a `datastore_search` GET and POST, a Hebrew
//! prefix-wildcard search, and `package_show` for the owning dataset.

use datagov_config::constants::fetch;
use datagov_config::FetchConfig;
use datagov_core::FetchRequest;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::engine::Candidate;

/// One HTTP request, described but not sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTemplate {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

/// All templates for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTemplates {
    pub choice: Candidate,
    pub datastore_search_get: RequestTemplate,
    pub datastore_search_post: RequestTemplate,
    pub datastore_search_hebrew: RequestTemplate,
    pub package_show: RequestTemplate,
}

/// Builds request templates against one CKAN endpoint
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    base_url: String,
    limit: usize,
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for TemplateBuilder {
    fn from(config: &FetchConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.template_limit,
        }
    }
}

fn base_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("User-Agent".to_string(), fetch::USER_AGENT.to_string());
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}

impl TemplateBuilder {
    pub fn new(base_url: impl Into<String>, limit: usize) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
        }
    }

    /// `datastore_search` URL carrying every parameter of `request`
    pub fn datastore_search_url(&self, request: &FetchRequest) -> String {
        let mut parts = vec![
            format!("resource_id={}", request.resource_id),
            format!("limit={}", request.limit),
            format!("offset={}", request.offset),
        ];
        if !request.fields.is_empty() {
            let fields: Vec<_> = request
                .fields
                .iter()
                .map(|f| urlencoding::encode(f))
                .collect();
            parts.push(format!("fields={}", fields.join(",")));
        }
        if !request.filters.is_empty() {
            let filters = Value::Object(request.filters.clone()).to_string();
            parts.push(format!("filters={}", urlencoding::encode(&filters)));
        }
        if let Some(q) = &request.q {
            parts.push(format!("q={}", urlencoding::encode(q)));
        }
        if let Some(plain) = request.plain {
            parts.push(format!("plain={}", plain));
        }
        format!(
            "{}/action/datastore_search?{}",
            self.base_url,
            parts.join("&")
        )
    }

    pub fn datastore_search_get(&self, request: &FetchRequest) -> RequestTemplate {
        RequestTemplate {
            method: "GET".to_string(),
            url: self.datastore_search_url(request),
            headers: base_headers(),
            json: None,
        }
    }

    pub fn datastore_search_post(&self, request: &FetchRequest) -> RequestTemplate {
        let mut body = json!({
            "resource_id": request.resource_id,
            "limit": request.limit,
            "offset": request.offset,
        });
        if let Some(obj) = body.as_object_mut() {
            if !request.fields.is_empty() {
                obj.insert("fields".to_string(), json!(request.fields));
            }
            if !request.filters.is_empty() {
                obj.insert("filters".to_string(), Value::Object(request.filters.clone()));
            }
            if let Some(q) = &request.q {
                obj.insert("q".to_string(), json!(q));
            }
            if let Some(plain) = request.plain {
                obj.insert("plain".to_string(), json!(plain));
            }
        }

        let mut headers = base_headers();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        RequestTemplate {
            method: "POST".to_string(),
            url: format!("{}/action/datastore_search", self.base_url),
            headers,
            json: Some(body),
        }
    }

    /// Prefix search (`term:*`, full-text syntax) over the first
    /// characters of the query
    pub fn datastore_search_hebrew(&self, resource_id: &str, query: &str) -> RequestTemplate {
        let term: String = query.chars().take(fetch::WILDCARD_QUERY_CHARS).collect();
        let request = FetchRequest::new(resource_id, self.limit)
            .with_q(format!("{}:*", term))
            .with_plain(false);
        self.datastore_search_get(&request)
    }

    pub fn package_show(&self, dataset_id: &str) -> RequestTemplate {
        RequestTemplate {
            method: "GET".to_string(),
            url: format!(
                "{}/action/package_show?id={}",
                self.base_url,
                urlencoding::encode(dataset_id)
            ),
            headers: base_headers(),
            json: None,
        }
    }

    /// Templates for one candidate, first page at the template limit
    pub fn for_candidate(&self, candidate: &Candidate, query: &str) -> CandidateTemplates {
        let request = FetchRequest::new(&candidate.resource_id, self.limit);
        CandidateTemplates {
            choice: candidate.clone(),
            datastore_search_get: self.datastore_search_get(&request),
            datastore_search_post: self.datastore_search_post(&request),
            datastore_search_hebrew: self.datastore_search_hebrew(&candidate.resource_id, query),
            package_show: self.package_show(&candidate.dataset_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://data.gov.il/api/3";

    #[test]
    fn test_basic_get_url() {
        let builder = TemplateBuilder::default();
        let url = builder.datastore_search_url(&FetchRequest::new("abc", 100));
        assert_eq!(
            url,
            format!("{}/action/datastore_search?resource_id=abc&limit=100&offset=0", BASE)
        );
    }

    #[test]
    fn test_url_with_all_parameters() {
        let builder = TemplateBuilder::new("https://example.org/api/3/", 100);
        let request = FetchRequest::new("abc", 20)
            .with_offset(40)
            .with_fields(vec!["name".into(), "city".into()])
            .with_filter("city", json!("חיפה"))
            .with_q("בית ספר")
            .with_plain(true);
        let url = builder.datastore_search_url(&request);
        assert!(url.starts_with("https://example.org/api/3/action/datastore_search?"));
        assert!(url.contains("&offset=40&fields=name,city&filters=%7B%22city%22"));
        assert!(url.contains(&format!("q={}", urlencoding::encode("בית ספר"))));
        assert!(url.ends_with("&plain=true"));
    }

    #[test]
    fn test_url_encodes_hebrew_field_names() {
        let builder = TemplateBuilder::default();
        let request = FetchRequest::new("abc", 20).with_fields(vec!["שם".into(), "כתובת".into()]);
        let url = builder.datastore_search_url(&request);
        assert!(url.contains(&format!(
            "fields={},{}",
            urlencoding::encode("שם"),
            urlencoding::encode("כתובת")
        )));
        assert!(!url.contains("כתובת"));
    }

    #[test]
    fn test_post_template() {
        let builder = TemplateBuilder::default();
        let post = builder.datastore_search_post(&FetchRequest::new("abc", 100));
        assert_eq!(post.method, "POST");
        assert_eq!(post.url, format!("{}/action/datastore_search", BASE));
        assert_eq!(post.headers["User-Agent"], "Mozilla/5.0 datagov-external-client");
        assert_eq!(post.headers["Content-Type"], "application/json");
        assert_eq!(
            post.json,
            Some(json!({"resource_id": "abc", "limit": 100, "offset": 0}))
        );

        let get = builder.datastore_search_get(&FetchRequest::new("abc", 100));
        assert!(!get.headers.contains_key("Content-Type"));
        assert!(get.json.is_none());
    }

    #[test]
    fn test_hebrew_wildcard_truncates_query() {
        let builder = TemplateBuilder::default();
        let query = "בתי ספר יסודיים בירושלים ובסביבה";
        let template = builder.datastore_search_hebrew("abc", query);
        let term: String = query.chars().take(20).collect();
        let expected_q = urlencoding::encode(&format!("{}:*", term)).into_owned();
        assert!(template.url.contains(&format!("q={}", expected_q)));
        assert!(template.url.ends_with("&plain=false"));
    }

    #[test]
    fn test_package_show_encodes_id() {
        let builder = TemplateBuilder::default();
        let template = builder.package_show("בתי-חולים");
        assert_eq!(
            template.url,
            format!("{}/action/package_show?id={}", BASE, urlencoding::encode("בתי-חולים"))
        );
    }
}
