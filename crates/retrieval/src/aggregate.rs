//! Aggregate calculator for count-style queries
//!
//! "How many electric cars" is answered from the fetched rows: every
//! numeric column is summed, skipping nulls and unparsable cells.

use datagov_core::{Field, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::scoring::round_to;

/// Declared datastore types treated as numeric
pub const NUMERIC_TYPES: &[&str] = &[
    "int", "int4", "int8", "float", "float8", "numeric", "integer", "number",
];

/// Records sampled when a column's type does not settle the question
const SAMPLE_RECORDS: usize = 5;
const SUM_DECIMALS: i32 = 2;
const INTERNAL_ID: &str = "_id";

/// Sum and counted cells of one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnAggregate {
    pub sum: f64,
    pub count: usize,
}

fn looks_numeric(value: &Value) -> bool {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return false,
    };
    let digits: String = text.chars().filter(|c| !matches!(c, ',' | '.' | '-')).collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn numeric_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', "").trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn is_numeric_column(field: &Field, records: &[Record]) -> bool {
    if NUMERIC_TYPES.contains(&field.field_type.to_lowercase().as_str()) {
        return true;
    }
    records
        .iter()
        .take(SAMPLE_RECORDS)
        .filter_map(|r| r.get(&field.name))
        .filter(|v| !v.is_null())
        .any(looks_numeric)
}

/// Sum every numeric column across `records`.
///
/// Columns with no countable cell are left out. Sums are rounded to two
/// decimals.
pub fn calculate_aggregates(records: &[Record], fields: &[Field]) -> BTreeMap<String, ColumnAggregate> {
    let mut aggregates = BTreeMap::new();
    if records.is_empty() {
        return aggregates;
    }

    for field in fields {
        if field.name == INTERNAL_ID || !is_numeric_column(field, records) {
            continue;
        }

        let (sum, count) = records
            .iter()
            .filter_map(|r| r.get(&field.name))
            .filter_map(numeric_value)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

        if count > 0 {
            aggregates.insert(
                field.name.clone(),
                ColumnAggregate {
                    sum: round_to(sum, SUM_DECIMALS),
                    count,
                },
            );
        }
    }

    tracing::debug!(columns = aggregates.len(), rows = records.len(), "Calculated aggregates");
    aggregates
}
