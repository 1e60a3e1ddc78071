//! Field-intent matching
//!
//! Maps the columns a user asked for ("phone", "כתובת") onto the actual
//! field names of a resource schema, and drops candidates whose schema
//! lacks a requested kind of field.

use datagov_core::{char_len, FieldCategory, Schema, SchemaCatalog};
use datagov_text_processing::{intent_category, intent_patterns};
use serde::{Deserialize, Serialize};

use crate::engine::Candidate;

/// Coordinate and internal columns never returned for an intent
pub const EXCLUDED_FIELDS: &[&str] = &[
    "x", "y", "lat", "lon", "lng", "latitude", "longitude", "_id", "id", "itm_x", "itm_y",
    "utm_x", "utm_y", "e_ord", "n_ord",
];

/// Patterns and field names must both reach this length for a partial match
const MIN_PARTIAL_CHARS: usize = 3;

/// Outcome of matching intents against one schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    /// Schema fields selected, deduplicated, in intent order
    pub matched_fields: Vec<String>,
    /// Intents no field could satisfy
    pub missing_intents: Vec<String>,
    /// Every field name of the schema
    pub all_fields: Vec<String>,
}

impl FieldMatch {
    pub fn is_complete(&self) -> bool {
        self.missing_intents.is_empty()
    }
}

fn is_excluded(field_lower: &str) -> bool {
    EXCLUDED_FIELDS.contains(&field_lower)
}

/// First field matching one of the intent's patterns.
///
/// Per pattern, an exact case-folded match wins; otherwise the first field
/// that contains the pattern, or is contained in it, is taken.
pub fn match_intent_by_pattern<'a>(intent: &str, fields: &'a [String]) -> Option<&'a str> {
    for pattern in intent_patterns(intent) {
        let pattern_lower = pattern.to_lowercase();

        let exact = fields
            .iter()
            .rev()
            .find(|f| f.to_lowercase() == pattern_lower);
        if let Some(field) = exact {
            if !is_excluded(&field.to_lowercase()) {
                return Some(field.as_str());
            }
        }

        if char_len(&pattern_lower) < MIN_PARTIAL_CHARS {
            continue;
        }
        let partial = fields.iter().find(|f| {
            let field_lower = f.to_lowercase();
            !is_excluded(&field_lower)
                && char_len(&field_lower) >= MIN_PARTIAL_CHARS
                && (field_lower.contains(&pattern_lower) || pattern_lower.contains(&field_lower))
        });
        if let Some(field) = partial {
            return Some(field.as_str());
        }
    }
    None
}

/// Match intents against bare field names
pub fn match_field_names(intents: &[String], fields: &[String]) -> FieldMatch {
    let mut result = FieldMatch {
        all_fields: fields.to_vec(),
        ..Default::default()
    };
    for intent in intents {
        match match_intent_by_pattern(intent, fields) {
            Some(field) => {
                if !result.matched_fields.iter().any(|m| m == field) {
                    result.matched_fields.push(field.to_string());
                }
            }
            None => result.missing_intents.push(intent.clone()),
        }
    }
    result
}

/// Match intents against a schema, trusting semantic tags before names
pub fn match_fields(intents: &[String], schema: &Schema) -> FieldMatch {
    let fields: Vec<String> = schema.field_names().map(str::to_string).collect();
    let mut result = FieldMatch {
        all_fields: fields.clone(),
        ..Default::default()
    };

    for intent in intents {
        let tagged = schema
            .field_for_tag(intent)
            .map(|f| f.name.as_str())
            .filter(|name| fields.iter().any(|f| f == name));
        let matched = tagged.or_else(|| match_intent_by_pattern(intent, &fields));

        match matched {
            Some(field) => {
                tracing::debug!(intent = %intent, field, "Matched requested field");
                if !result.matched_fields.iter().any(|m| m == field) {
                    result.matched_fields.push(field.to_string());
                }
            }
            None => result.missing_intents.push(intent.clone()),
        }
    }

    result
}

/// Availability categories implied by a set of intents
pub fn required_categories(intents: &[String]) -> Vec<FieldCategory> {
    let mut categories = Vec::new();
    for category in intents.iter().filter_map(|i| intent_category(i)) {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}

/// Keep candidates whose schema offers every requested kind of field.
///
/// Resources without a known schema are assumed to qualify. When nothing
/// qualifies the input is returned unchanged.
pub fn filter_by_availability(
    candidates: Vec<Candidate>,
    intents: &[String],
    schemas: &SchemaCatalog,
) -> Vec<Candidate> {
    let required = required_categories(intents);
    if required.is_empty() || candidates.is_empty() {
        return candidates;
    }

    let filtered: Vec<Candidate> = candidates
        .iter()
        .filter(|c| !c.resource_id.is_empty())
        .filter(|c| match schemas.get(&c.resource_id) {
            Some(schema) => required
                .iter()
                .all(|category| schema.field_availability.has(*category)),
            None => true,
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        tracing::debug!(
            candidates = candidates.len(),
            required = ?required,
            "No candidate offers the requested fields, keeping all"
        );
        return candidates;
    }

    tracing::debug!(
        before = candidates.len(),
        after = filtered.len(),
        required = ?required,
        "Filtered candidates by field availability"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagov_core::{Field, FieldAvailability, SemanticTag};

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn candidate(resource_id: &str) -> Candidate {
        Candidate {
            resource_id: resource_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_then_partial() {
        let fields = names(&["_id", "שם_מוסד", "Address", "טלפון_מוסד"]);
        let result = match_field_names(&names(&["address", "phone"]), &fields);
        assert_eq!(result.matched_fields, vec!["Address", "טלפון_מוסד"]);
        assert!(result.is_complete());
        assert_eq!(result.all_fields, fields);
    }

    #[test]
    fn test_excluded_fields_skipped() {
        let fields = names(&["lat", "lon", "id"]);
        let result = match_field_names(&names(&["location", "email"]), &fields);
        assert!(result.matched_fields.is_empty());
        assert_eq!(result.missing_intents, vec!["location", "email"]);
    }

    #[test]
    fn test_short_patterns_need_exact_match() {
        // "tel" is only three characters, "שם" two
        let fields = names(&["tel", "שם"]);
        let result = match_field_names(&names(&["phone", "name"]), &fields);
        assert_eq!(result.matched_fields, vec!["tel", "שם"]);

        let fields = names(&["שמות"]);
        assert!(match_intent_by_pattern("שם", &fields).is_none());
    }

    #[test]
    fn test_duplicate_matches_collapsed() {
        let fields = names(&["כתובת"]);
        let result = match_field_names(&names(&["address", "addresses", "כתובת"]), &fields);
        assert_eq!(result.matched_fields, vec!["כתובת"]);
    }

    #[test]
    fn test_unknown_intent_matches_itself() {
        let fields = names(&["capacity_beds"]);
        let result = match_field_names(&names(&["beds"]), &fields);
        assert_eq!(result.matched_fields, vec!["capacity_beds"]);
    }

    #[test]
    fn test_semantic_tag_wins() {
        let schema = Schema::new(vec![
            Field::new("phone_old", "text"),
            Field::new("מספר_התקשרות", "text").with_semantic(SemanticTag::Phone),
        ]);
        let result = match_fields(&names(&["phone"]), &schema);
        assert_eq!(result.matched_fields, vec!["מספר_התקשרות"]);
    }

    #[test]
    fn test_schema_falls_back_to_patterns() {
        let schema = Schema::new(vec![Field::new("email_address", "text")]);
        let result = match_fields(&names(&["email", "hours"]), &schema);
        assert_eq!(result.matched_fields, vec!["email_address"]);
        assert_eq!(result.missing_intents, vec!["hours"]);
    }

    #[test]
    fn test_required_categories() {
        let categories = required_categories(&names(&["phone", "phones", "address", "hours"]));
        assert_eq!(categories, vec![FieldCategory::Phone, FieldCategory::Address]);
    }

    fn catalog() -> SchemaCatalog {
        let mut no_phone = Schema::new(vec![Field::new("name", "text")]);
        no_phone.field_availability = FieldAvailability {
            has_phone: false,
            ..Default::default()
        };
        let with_phone = Schema::new(vec![Field::new("phone", "text")]);

        let mut catalog = SchemaCatalog::new();
        catalog.insert("r1", no_phone);
        catalog.insert("r2", with_phone);
        catalog
    }

    #[test]
    fn test_filter_keeps_available() {
        let candidates = vec![candidate("r1"), candidate("r2"), candidate("r3")];
        let filtered = filter_by_availability(candidates, &names(&["phone"]), &catalog());
        let ids: Vec<&str> = filtered.iter().map(|c| c.resource_id.as_str()).collect();
        // r3 has no schema and is assumed to qualify
        assert_eq!(ids, vec!["r2", "r3"]);
    }

    #[test]
    fn test_filter_never_empties() {
        let candidates = vec![candidate("r1")];
        let filtered = filter_by_availability(candidates.clone(), &names(&["phone"]), &catalog());
        assert_eq!(filtered, candidates);
    }

    #[test]
    fn test_filter_ignores_unmapped_intents() {
        let candidates = vec![candidate("r1")];
        let filtered = filter_by_availability(candidates.clone(), &names(&["hours"]), &catalog());
        assert_eq!(filtered, candidates);
    }
}
