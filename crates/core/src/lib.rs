//! Core types for the data.gov.il resource resolver
//!
//! This crate provides foundational types used across all other crates:
//! - Typed corpus model (datasets, resources, schemas)
//! - Script detection for Hebrew text
//! - The upstream record source interface
//! - Error types

pub mod corpus;
pub mod error;
pub mod record_source;
pub mod schema;
pub mod script;

pub use corpus::{Corpus, Dataset, Resource, ResourceFormat};
pub use error::{Error, FetchError, Result};
pub use record_source::{FetchRequest, Record, RecordPage, RecordSource};
pub use schema::{Field, FieldAvailability, FieldCategory, Schema, SchemaCatalog, SemanticTag};
pub use script::{char_len, contains_hebrew, is_hebrew_char};
