//! Text processing for bilingual data.gov.il queries
//!
//! This crate provides the language-level building blocks of resolution:
//! - **Morphology**: Hebrew prefix stripping and plural/singular variants
//! - **Tokenization**: punctuation-aware splitting with bilingual stop words
//! - **Gazetteer**: location recognition and datastore filter values
//! - **Intents**: requested-field detection and count-query detection
//!
//! # Example
//!
//! ```ignore
//! use datagov_text_processing::{tokenize, variants};
//!
//! let tokens = tokenize("בתי חולים בירושלים");
//! let forms = variants("לרכבים");
//! ```

pub mod gazetteer;
pub mod hebrew;
pub mod intent;
pub mod stopwords;
pub mod tokenizer;

pub use gazetteer::{first_non_ascii, Gazetteer};
pub use hebrew::{strip_prefix, strip_prefix_forced, variants, PLURAL_SUFFIXES, PREFIXES};
pub use intent::{
    extract_field_intents, intent_category, intent_patterns, is_count_query, FIELD_INTENTS,
};
pub use stopwords::{is_core_stopword, is_hebrew_stopword, is_stop_word};
pub use tokenizer::{tokenize, tokenize_stripping_locations};
