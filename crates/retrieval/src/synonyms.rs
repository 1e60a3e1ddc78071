//! Bidirectional synonym index
//!
//! The expansion table is one-directional (`hospital -> בתי חולים`). Here
//! every entry becomes a group `{term} ∪ expansions`, and each member maps
//! to the union of all groups it belongs to, so `בתי חולים` also reaches
//! `hospital`.

use datagov_config::ExpansionTable;
use std::collections::HashMap;

/// Symmetric term -> synonyms map, built once and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    groups: HashMap<String, Vec<String>>,
}

impl SynonymIndex {
    /// Build the index from a raw expansion table
    pub fn build(table: &ExpansionTable) -> Self {
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();

        for (term, expansions) in table.iter() {
            let mut group: Vec<&str> = Vec::with_capacity(expansions.len() + 1);
            for member in std::iter::once(term).chain(expansions.iter().map(|e| e.as_str())) {
                if !group.contains(&member) {
                    group.push(member);
                }
            }

            for member in &group {
                let synonyms = groups.entry(member.to_string()).or_default();
                for other in &group {
                    if !synonyms.iter().any(|s| s == other) {
                        synonyms.push(other.to_string());
                    }
                }
            }
        }

        tracing::info!(terms = groups.len(), entries = table.len(), "Synonym index built");
        Self { groups }
    }

    /// All synonyms of `term`, including itself.
    ///
    /// Looked up case-folded first, then verbatim. Unknown terms come back
    /// as the singleton `[term]`.
    pub fn synonyms(&self, term: &str) -> Vec<String> {
        self.lookup(term)
            .map(|group| group.to_vec())
            .unwrap_or_else(|| vec![term.to_string()])
    }

    /// Size of the synonym group for `term` (1 when unknown)
    pub fn group_size(&self, term: &str) -> usize {
        self.lookup(term).map_or(1, |group| group.len())
    }

    /// Whether `term` has any synonym besides itself
    pub fn has_synonyms(&self, term: &str) -> bool {
        self.group_size(term) > 1
    }

    fn lookup(&self, term: &str) -> Option<&[String]> {
        self.groups
            .get(&term.to_lowercase())
            .or_else(|| self.groups.get(term))
            .filter(|group| !group.is_empty())
            .map(|group| group.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[&str])]) -> ExpansionTable {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_reverse_lookup() {
        let index = SynonymIndex::build(&table(&[("crime", &["פשיעה", "עבירות"])]));
        let synonyms = index.synonyms("פשיעה");
        assert!(synonyms.contains(&"crime".to_string()));
        assert!(synonyms.contains(&"עבירות".to_string()));
        assert!(synonyms.contains(&"פשיעה".to_string()));
    }

    #[test]
    fn test_groups_merge_on_shared_term() {
        let index = SynonymIndex::build(&table(&[
            ("health", &["בריאות", "רפואה"]),
            ("medical", &["רפואה", "רפואי"]),
        ]));
        let synonyms = index.synonyms("רפואה");
        for term in ["health", "בריאות", "medical", "רפואי"] {
            assert!(synonyms.contains(&term.to_string()), "missing {}", term);
        }
        // "health" only shares the first group
        assert!(!index.synonyms("health").contains(&"רפואי".to_string()));
    }

    #[test]
    fn test_symmetric_over_builtin_table() {
        let index = SynonymIndex::build(&ExpansionTable::builtin());
        for (term, group) in &index.groups {
            for other in group {
                assert!(
                    index.synonyms(other).contains(term),
                    "{} -> {} is not symmetric",
                    term,
                    other
                );
            }
        }
    }

    #[test]
    fn test_unknown_term_is_singleton() {
        let index = SynonymIndex::build(&ExpansionTable::builtin());
        assert_eq!(index.synonyms("zebra"), vec!["zebra"]);
        assert_eq!(index.group_size("zebra"), 1);
        assert!(!index.has_synonyms("zebra"));
    }

    #[test]
    fn test_case_folded_lookup() {
        let index = SynonymIndex::build(&table(&[("court", &["בית משפט"])]));
        assert!(index.synonyms("COURT").contains(&"בית משפט".to_string()));
    }

    #[test]
    fn test_verbatim_fallback_lookup() {
        let index = SynonymIndex::build(&table(&[("GIS", &["מפות"])]));
        assert!(index.synonyms("GIS").contains(&"מפות".to_string()));
    }

    #[test]
    fn test_empty_table() {
        let index = SynonymIndex::build(&ExpansionTable::new());
        assert!(index.is_empty());
        assert_eq!(index.synonyms("x"), vec!["x"]);
    }
}
