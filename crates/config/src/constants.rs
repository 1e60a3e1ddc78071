//! Centralized constants for the resolver
//!
//! Single source of truth for the tuned scoring weights and the upstream
//! defaults. Settings defaults and the retrieval crate both read from here.

/// Relevance scoring weights and thresholds
pub mod scoring {
    /// Weight of the dataset-level subject score
    pub const SUBJECT_WEIGHT: f64 = 0.7;

    /// Weight of the dataset-level location score
    pub const LOCATION_WEIGHT: f64 = 0.1;

    /// Weight of the subject score computed against a resource title
    pub const RESOURCE_TITLE_WEIGHT: f64 = 0.15;

    /// Datasets below this subject score are dropped when the query has subjects
    pub const MIN_SUBJECT_SCORE: f64 = 0.15;

    /// Resources must score strictly above this to be kept
    pub const MIN_RESOURCE_SCORE: f64 = 0.1;

    /// Top score below this triggers rephrasing and a low-confidence warning
    pub const CONFIDENCE_THRESHOLD: f64 = 0.35;

    /// Top score below this yields a medium-confidence warning
    pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.5;

    pub const FORMAT_BONUS_CSV: f64 = 0.15;
    pub const FORMAT_BONUS_XLSX: f64 = 0.12;
    pub const FORMAT_BONUS_JSON: f64 = 0.10;
    pub const FORMAT_BONUS_XML: f64 = 0.05;
    pub const FORMAT_BONUS_API: f64 = 0.08;
    pub const FORMAT_BONUS_PDF: f64 = 0.02;

    /// Category appears verbatim in the query
    pub const CATEGORY_BONUS: f64 = 0.12;

    /// One of the category's expansions appears in the query
    pub const CATEGORY_EXPANSION_BONUS: f64 = 0.10;

    pub const KEYWORD_MATCH_BONUS: f64 = 0.04;
    pub const KEYWORD_MATCH_MAX: usize = 3;
    pub const KEYWORD_BONUS_CAP: f64 = 0.10;

    /// Only the first N precomputed keywords are compared against the query
    pub const KEYWORDS_CHECKED: usize = 25;

    pub const KEYWORD_INDEX_FACTOR: f64 = 0.08;
    pub const KEYWORD_INDEX_CAP: f64 = 0.25;

    /// Token overlap weights
    pub const EXACT_TOKEN_MATCH: f64 = 1.0;
    pub const SUBSTRING_TOKEN_MATCH: f64 = 0.7;
    pub const EXPANSION_CHECK_WEIGHT: f64 = 0.5;
    pub const EXPANSION_PHRASE_MATCH: f64 = 0.8;
    pub const EXPANSION_WORD_MATCH: f64 = 0.4;

    /// Keyword index hit weights
    pub const KEYWORD_HIT_ORIGINAL: f64 = 1.0;
    pub const KEYWORD_HIT_VARIANT: f64 = 0.8;
    pub const KEYWORD_HIT_SYNONYM: f64 = 0.5;

    /// Maximum rephrased alternatives per query
    pub const MAX_REPHRASINGS: usize = 3;

    /// Candidates considered by the end-to-end query flow
    pub const PIPELINE_CANDIDATES: usize = 5;

    /// Decimal places kept on reported scores
    pub const SCORE_PRECISION: i32 = 3;
}

/// Upstream datastore defaults
pub mod fetch {
    /// CKAN API root of data.gov.il
    pub const BASE_URL: &str = "https://data.gov.il/api/3";

    /// Additional attempts after the first failure
    pub const MAX_RETRIES: u32 = 2;

    /// Fixed pause between attempts
    pub const BACKOFF_MS: u64 = 500;

    pub const DEFAULT_LIMIT: usize = 20;
    pub const MAX_LIMIT: usize = 100;

    /// Page size used in generated request templates
    pub const TEMPLATE_LIMIT: usize = 100;

    /// Characters of the query used in the Hebrew wildcard template
    pub const WILDCARD_QUERY_CHARS: usize = 20;

    pub const USER_AGENT: &str = "Mozilla/5.0 datagov-external-client";
}

/// Default file locations
pub mod paths {
    pub const CORPUS: &str = "data/resources_map.json";
}
