//! Static domain data
//!
//! Everything the resolver needs besides settings: the corpus catalogue,
//! the subject-expansion table and the gazetteer. Files may be JSON or
//! YAML, chosen by extension.

mod corpus;
mod expansions;
mod gazetteer;

pub use corpus::load_corpus;
pub use expansions::ExpansionTable;
pub use gazetteer::GazetteerConfig;

use datagov_core::Corpus;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::{ConfigError, DataPaths};

/// Read a JSON or YAML file into `T`
pub(crate) fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    } else {
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }
}

/// Corpus plus dictionaries, loaded once at startup
#[derive(Debug, Clone)]
pub struct DomainData {
    pub corpus: Corpus,
    pub expansions: ExpansionTable,
    pub gazetteer: GazetteerConfig,
}

impl DomainData {
    /// Load everything named in `paths`.
    ///
    /// The corpus is required. Optional dictionaries that are configured but
    /// missing fall back to the built-in tables; malformed ones are errors.
    pub fn load(paths: &DataPaths) -> Result<Self, ConfigError> {
        let corpus = load_corpus(&paths.corpus_path)?;

        let mut expansions = ExpansionTable::builtin();
        if let Some(path) = &paths.expansions_path {
            if Path::new(path).exists() {
                let overlay = ExpansionTable::load(path)?;
                tracing::info!(entries = overlay.len(), "Merged expansions from {}", path);
                expansions.merge(overlay);
            } else {
                tracing::warn!("Expansions file {} not found, using built-in table", path);
            }
        }

        let gazetteer = match &paths.gazetteer_path {
            Some(path) if Path::new(path).exists() => GazetteerConfig::load(path)?,
            Some(path) => {
                tracing::warn!("Gazetteer file {} not found, using built-in gazetteer", path);
                GazetteerConfig::builtin()
            }
            None => GazetteerConfig::builtin(),
        };

        Ok(Self {
            corpus,
            expansions,
            gazetteer,
        })
    }
}
