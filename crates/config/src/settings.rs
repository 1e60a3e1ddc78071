//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{fetch, paths, scoring};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Locations of the corpus and dictionaries
    #[serde(default)]
    pub data: DataPaths,

    /// Relevance weights and thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Upstream datastore access
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Paths to static data files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Corpus catalogue (JSON or YAML)
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,

    /// Extra subject expansions merged over the built-in table
    #[serde(default)]
    pub expansions_path: Option<String>,

    /// Replacement gazetteer
    #[serde(default)]
    pub gazetteer_path: Option<String>,
}

fn default_corpus_path() -> String {
    paths::CORPUS.to_string()
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            expansions_path: None,
            gazetteer_path: None,
        }
    }
}

/// Format preference bonuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatBonusConfig {
    #[serde(default = "default_csv_bonus")]
    pub csv: f64,
    #[serde(default = "default_xlsx_bonus")]
    pub xlsx: f64,
    #[serde(default = "default_json_bonus")]
    pub json: f64,
    #[serde(default = "default_xml_bonus")]
    pub xml: f64,
    #[serde(default = "default_api_bonus")]
    pub api: f64,
    #[serde(default = "default_pdf_bonus")]
    pub pdf: f64,
}

fn default_csv_bonus() -> f64 {
    scoring::FORMAT_BONUS_CSV
}
fn default_xlsx_bonus() -> f64 {
    scoring::FORMAT_BONUS_XLSX
}
fn default_json_bonus() -> f64 {
    scoring::FORMAT_BONUS_JSON
}
fn default_xml_bonus() -> f64 {
    scoring::FORMAT_BONUS_XML
}
fn default_api_bonus() -> f64 {
    scoring::FORMAT_BONUS_API
}
fn default_pdf_bonus() -> f64 {
    scoring::FORMAT_BONUS_PDF
}

impl Default for FormatBonusConfig {
    fn default() -> Self {
        Self {
            csv: default_csv_bonus(),
            xlsx: default_xlsx_bonus(),
            json: default_json_bonus(),
            xml: default_xml_bonus(),
            api: default_api_bonus(),
            pdf: default_pdf_bonus(),
        }
    }
}

impl FormatBonusConfig {
    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("csv", self.csv),
            ("xlsx", self.xlsx),
            ("json", self.json),
            ("xml", self.xml),
            ("api", self.api),
            ("pdf", self.pdf),
        ]
    }
}

/// Scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_subject_weight")]
    pub subject_weight: f64,

    #[serde(default = "default_location_weight")]
    pub location_weight: f64,

    #[serde(default = "default_resource_title_weight")]
    pub resource_title_weight: f64,

    /// Subject-first cutoff
    #[serde(default = "default_min_subject_score")]
    pub min_subject_score: f64,

    #[serde(default = "default_min_resource_score")]
    pub min_resource_score: f64,

    /// Below this the resolver tries rephrased queries
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    #[serde(default = "default_medium_confidence_threshold")]
    pub medium_confidence_threshold: f64,

    #[serde(default)]
    pub format_bonus: FormatBonusConfig,

    #[serde(default = "default_category_bonus")]
    pub category_bonus: f64,

    #[serde(default = "default_category_expansion_bonus")]
    pub category_expansion_bonus: f64,

    #[serde(default = "default_keyword_match_bonus")]
    pub keyword_match_bonus: f64,

    #[serde(default = "default_keyword_match_max")]
    pub keyword_match_max: usize,

    #[serde(default = "default_keyword_bonus_cap")]
    pub keyword_bonus_cap: f64,

    #[serde(default = "default_keywords_checked")]
    pub keywords_checked: usize,

    #[serde(default = "default_keyword_index_factor")]
    pub keyword_index_factor: f64,

    #[serde(default = "default_keyword_index_cap")]
    pub keyword_index_cap: f64,

    #[serde(default = "default_max_rephrasings")]
    pub max_rephrasings: usize,

    /// Candidates requested by the end-to-end query flow
    #[serde(default = "default_pipeline_candidates")]
    pub pipeline_candidates: usize,
}

fn default_subject_weight() -> f64 {
    scoring::SUBJECT_WEIGHT
}
fn default_location_weight() -> f64 {
    scoring::LOCATION_WEIGHT
}
fn default_resource_title_weight() -> f64 {
    scoring::RESOURCE_TITLE_WEIGHT
}
fn default_min_subject_score() -> f64 {
    scoring::MIN_SUBJECT_SCORE
}
fn default_min_resource_score() -> f64 {
    scoring::MIN_RESOURCE_SCORE
}
fn default_confidence_threshold() -> f64 {
    scoring::CONFIDENCE_THRESHOLD
}
fn default_medium_confidence_threshold() -> f64 {
    scoring::MEDIUM_CONFIDENCE_THRESHOLD
}
fn default_category_bonus() -> f64 {
    scoring::CATEGORY_BONUS
}
fn default_category_expansion_bonus() -> f64 {
    scoring::CATEGORY_EXPANSION_BONUS
}
fn default_keyword_match_bonus() -> f64 {
    scoring::KEYWORD_MATCH_BONUS
}
fn default_keyword_match_max() -> usize {
    scoring::KEYWORD_MATCH_MAX
}
fn default_keyword_bonus_cap() -> f64 {
    scoring::KEYWORD_BONUS_CAP
}
fn default_keywords_checked() -> usize {
    scoring::KEYWORDS_CHECKED
}
fn default_keyword_index_factor() -> f64 {
    scoring::KEYWORD_INDEX_FACTOR
}
fn default_keyword_index_cap() -> f64 {
    scoring::KEYWORD_INDEX_CAP
}
fn default_max_rephrasings() -> usize {
    scoring::MAX_REPHRASINGS
}
fn default_pipeline_candidates() -> usize {
    scoring::PIPELINE_CANDIDATES
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            subject_weight: default_subject_weight(),
            location_weight: default_location_weight(),
            resource_title_weight: default_resource_title_weight(),
            min_subject_score: default_min_subject_score(),
            min_resource_score: default_min_resource_score(),
            confidence_threshold: default_confidence_threshold(),
            medium_confidence_threshold: default_medium_confidence_threshold(),
            format_bonus: FormatBonusConfig::default(),
            category_bonus: default_category_bonus(),
            category_expansion_bonus: default_category_expansion_bonus(),
            keyword_match_bonus: default_keyword_match_bonus(),
            keyword_match_max: default_keyword_match_max(),
            keyword_bonus_cap: default_keyword_bonus_cap(),
            keywords_checked: default_keywords_checked(),
            keyword_index_factor: default_keyword_index_factor(),
            keyword_index_cap: default_keyword_index_cap(),
            max_rephrasings: default_max_rephrasings(),
            pipeline_candidates: default_pipeline_candidates(),
        }
    }
}

/// Upstream datastore configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Additional attempts after the first failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    #[serde(default = "default_template_limit")]
    pub template_limit: usize,
}

fn default_base_url() -> String {
    fetch::BASE_URL.to_string()
}
fn default_max_retries() -> u32 {
    fetch::MAX_RETRIES
}
fn default_backoff_ms() -> u64 {
    fetch::BACKOFF_MS
}
fn default_limit() -> usize {
    fetch::DEFAULT_LIMIT
}
fn default_max_limit() -> usize {
    fetch::MAX_LIMIT
}
fn default_template_limit() -> usize {
    fetch::TEMPLATE_LIMIT
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            template_limit: default_template_limit(),
        }
    }
}

impl FetchConfig {
    /// Clamp a caller-supplied page size into `1..=max_limit`
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(0) | None => self.default_limit,
            Some(n) => n.min(self.max_limit),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_data()?;
        self.validate_scoring()?;
        self.validate_fetch()?;
        Ok(())
    }

    fn validate_data(&self) -> Result<(), ConfigError> {
        if self.data.corpus_path.trim().is_empty() {
            return Err(ConfigError::MissingField("data.corpus_path".to_string()));
        }
        Ok(())
    }

    fn validate_scoring(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;

        let unit_values = [
            ("scoring.subject_weight", s.subject_weight),
            ("scoring.location_weight", s.location_weight),
            ("scoring.resource_title_weight", s.resource_title_weight),
            ("scoring.min_subject_score", s.min_subject_score),
            ("scoring.min_resource_score", s.min_resource_score),
            ("scoring.confidence_threshold", s.confidence_threshold),
            (
                "scoring.medium_confidence_threshold",
                s.medium_confidence_threshold,
            ),
            ("scoring.category_bonus", s.category_bonus),
            ("scoring.category_expansion_bonus", s.category_expansion_bonus),
            ("scoring.keyword_match_bonus", s.keyword_match_bonus),
            ("scoring.keyword_bonus_cap", s.keyword_bonus_cap),
            ("scoring.keyword_index_factor", s.keyword_index_factor),
            ("scoring.keyword_index_cap", s.keyword_index_cap),
        ];
        for (field, value) in unit_values {
            check_unit(field, value)?;
        }
        for (name, value) in s.format_bonus.entries() {
            check_unit(&format!("scoring.format_bonus.{}", name), value)?;
        }

        if s.medium_confidence_threshold < s.confidence_threshold {
            return Err(ConfigError::InvalidValue {
                field: "scoring.medium_confidence_threshold".to_string(),
                message: format!(
                    "Must be >= confidence_threshold ({}), got {}",
                    s.confidence_threshold, s.medium_confidence_threshold
                ),
            });
        }

        if s.pipeline_candidates == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scoring.pipeline_candidates".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    fn validate_fetch(&self) -> Result<(), ConfigError> {
        let f = &self.fetch;

        if f.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("fetch.base_url".to_string()));
        }

        if f.default_limit == 0 || f.max_limit == 0 || f.template_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch".to_string(),
                message: "Page limits must be non-zero".to_string(),
            });
        }

        if f.max_limit < f.default_limit {
            return Err(ConfigError::InvalidValue {
                field: "fetch.max_limit".to_string(),
                message: format!(
                    "Must be >= default_limit ({}), got {}",
                    f.default_limit, f.max_limit
                ),
            });
        }

        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be between 0.0 and 1.0, got {}", value),
        });
    }
    Ok(())
}

/// Load settings from files and environment
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("DATAGOV")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
