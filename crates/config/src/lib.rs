//! Configuration management for the data.gov.il resolver
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files (`config/default`, `config/{env}`)
//! - Environment variables (`DATAGOV__` prefix, `__` separator)
//!
//! # Domain data
//!
//! Static dictionaries live in [`domain`]:
//! - the corpus catalogue (JSON or YAML)
//! - the bilingual subject-expansion table (built-in base, optional file overlay)
//! - the location gazetteer and its filter values

pub mod constants;
pub mod domain;
pub mod settings;

pub use domain::{load_corpus, DomainData, ExpansionTable, GazetteerConfig};
pub use settings::{
    load_settings, DataPaths, FetchConfig, FormatBonusConfig, ObservabilityConfig,
    RuntimeEnvironment, ScoringConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for datagov_core::Error {
    fn from(err: ConfigError) -> Self {
        datagov_core::Error::Config(err.to_string())
    }
}
