//! Corpus catalogue loading

use datagov_core::Corpus;
use std::path::Path;

use super::read_structured;
use crate::ConfigError;

/// Load and validate the corpus catalogue
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus, ConfigError> {
    let path = path.as_ref();
    let corpus: Corpus = read_structured(path)?;
    corpus.validate().map_err(|e| ConfigError::InvalidValue {
        field: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::info!(
        datasets = corpus.dataset_count(),
        resources = corpus.resource_count(),
        "Loaded corpus from {}",
        path.display()
    );
    Ok(corpus)
}
