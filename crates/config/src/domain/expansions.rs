//! Bilingual subject-expansion table
//!
//! Maps a subject term to equivalent terms in the other language. The
//! synonym index turns this one-directional table into symmetric groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::read_structured;
use crate::ConfigError;

/// Built-in expansions, English and Hebrew keys
const BASE_EXPANSIONS: &[(&str, &[&str])] = &[
    // Legal
    ("court", &["בית משפט", "בתי משפט", "משפט", "שופט", "שפיטה", "תיקים"]),
    ("courts", &["בית משפט", "בתי משפט", "משפט", "שופט", "שפיטה", "תיקים"]),
    ("judge", &["שופט", "שופטים", "בית משפט"]),
    ("legal", &["משפטי", "חוקי", "משפט"]),
    ("law", &["חוק", "חוקים", "משפט", "חקיקה"]),

    // Health
    ("hospital", &["בית חולים", "בתי חולים", "רפואי", "רפואה", "אשפוז"]),
    ("hospitals", &["בית חולים", "בתי חולים", "רפואי", "רפואה", "אשפוז"]),
    ("clinic", &["מרפאה", "מרפאות", "קופת חולים"]),
    ("health", &["בריאות", "רפואי", "רפואה"]),
    ("medical", &["רפואי", "רפואה", "בריאות"]),
    ("trauma", &["טראומה", "מרכז טראומה", "פציעות"]),
    ("doctor", &["רופא", "רופאים", "רפואה"]),
    ("pharmacy", &["בית מרקחת", "תרופות", "רוקחות"]),

    // Education
    ("school", &["בית ספר", "בתי ספר", "חינוך", "לימודים", "מוסד חינוך", "מוסדות חינוך"]),
    ("schools", &["בית ספר", "בתי ספר", "חינוך", "לימודים", "מוסד חינוך", "מוסדות חינוך"]),
    ("high school", &["תיכון", "תיכונים", "בית ספר תיכון", "בתי ספר תיכוניים", "חטיבה עליונה", "מוסדות חינוך"]),
    ("highschool", &["תיכון", "תיכונים", "בית ספר תיכון", "בתי ספר תיכוניים", "חטיבה עליונה"]),
    ("תיכון", &["תיכון", "תיכונים", "high school", "חטיבה עליונה", "מוסדות חינוך"]),
    ("תיכוניים", &["תיכון", "תיכונים", "high school", "חטיבה עליונה", "מוסדות חינוך"]),
    ("elementary", &["יסודי", "בית ספר יסודי", "חטיבת ביניים", "מוסדות חינוך"]),
    ("university", &["אוניברסיטה", "אוניברסיטאות", "השכלה גבוהה"]),
    ("college", &["מכללה", "מכללות", "השכלה"]),
    ("education", &["חינוך", "לימודים", "הוראה", "מוסדות חינוך", "בתי ספר"]),
    ("student", &["תלמיד", "תלמידים", "סטודנט"]),
    ("kindergarten", &["גן ילדים", "גני ילדים", "גנים"]),

    // Government and public services
    ("ministry", &["משרד", "משרדים", "ממשלתי"]),
    ("government", &["ממשלה", "ממשלתי", "ציבורי"]),
    ("municipality", &["עירייה", "עיריות", "רשות מקומית"]),
    ("office", &["משרד", "לשכה", "מוסד"]),
    ("police", &["משטרה", "משטרתי", "שוטר"]),
    ("fire", &["כבאות", "כבאי", "מכבי אש"]),

    // Transport
    ("bus", &["אוטובוס", "תחבורה ציבורית", "קווים"]),
    ("train", &["רכבת", "תחנת רכבת", "רכבות"]),
    ("airport", &["שדה תעופה", "נמל תעופה", "טיסות"]),
    ("road", &["כביש", "כבישים", "דרך"]),
    ("traffic", &["תנועה", "תחבורה", "פקקים"]),
    ("vehicle", &["רכב", "רכבים", "כלי רכב"]),
    ("electric", &["חשמלי", "חשמליים", "חשמל"]),

    // Economy
    ("business", &["עסק", "עסקים", "חברה", "חברות"]),
    ("company", &["חברה", "חברות", "עסק"]),
    ("license", &["רישיון", "רישוי", "היתר"]),
    ("permit", &["היתר", "רישיון", "אישור"]),
    ("tax", &["מס", "מיסים", "מסוי"]),
    ("budget", &["תקציב", "תקציבי", "כספים"]),

    // Environment
    ("water", &["מים", "מקורות מים", "ביוב"]),
    ("air", &["אוויר", "זיהום אוויר", "איכות אוויר"]),
    ("environment", &["סביבה", "איכות הסביבה", "אקולוגי"]),
    ("weather", &["מזג אוויר", "גשם", "טמפרטורה"]),
    ("park", &["פארק", "גן ציבורי", "שטח פתוח"]),

    // Social services
    ("welfare", &["רווחה", "סעד", "שירותי רווחה"]),
    ("elderly", &["קשישים", "זקנים", "גיל הזהב"]),
    ("disability", &["נכות", "נכים", "מוגבלות"]),
    ("housing", &["דיור", "שיכון", "מגורים"]),

    // Statistics
    ("population", &["אוכלוסייה", "דמוגרפיה", "תושבים"]),
    ("census", &["מפקד", "מפקד אוכלוסין", "סטטיסטיקה"]),
    ("statistics", &["סטטיסטיקה", "נתונים", "מדדים"]),
];

/// Raw term -> expansions table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl ExpansionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in base table
    pub fn builtin() -> Self {
        let entries = BASE_EXPANSIONS
            .iter()
            .map(|(term, expansions)| {
                (
                    term.to_string(),
                    expansions.iter().map(|e| e.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Load a table from a JSON or YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        read_structured(path.as_ref())
    }

    /// Overlay another table; its entries win on key collision
    pub fn merge(&mut self, overlay: ExpansionTable) {
        self.entries.extend(overlay.entries);
    }

    pub fn insert(&mut self, term: impl Into<String>, expansions: Vec<String>) {
        self.entries.insert(term.into(), expansions);
    }

    /// Raw expansions for an exact key
    pub fn get(&self, term: &str) -> Option<&[String]> {
        self.entries.get(term).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for ExpansionTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_table() {
        let table = ExpansionTable::builtin();
        assert!(table.len() > 50);
        let hospitals = table.get("hospitals").unwrap();
        assert!(hospitals.contains(&"בתי חולים".to_string()));
        assert!(table.get("תיכון").is_some());
        assert!(table.get("missing").is_none());
    }

    #[test]
    fn test_merge_overlay_wins() {
        let mut table = ExpansionTable::builtin();
        let overlay: ExpansionTable =
            vec![("court".to_string(), vec!["בית דין".to_string()])]
                .into_iter()
                .collect();
        table.merge(overlay);
        assert_eq!(table.get("court").unwrap(), ["בית דין".to_string()]);
        assert!(table.get("courts").unwrap().len() > 1);
    }

    #[test]
    fn test_load_yaml_and_json() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "crime:\n  - פשיעה\n  - עבירות").unwrap();
        let table = ExpansionTable::load(yaml.path()).unwrap();
        assert_eq!(table.get("crime").unwrap().len(), 2);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"noise": ["רעש"]}}"#).unwrap();
        let table = ExpansionTable::load(json.path()).unwrap();
        assert_eq!(table.get("noise").unwrap(), ["רעש".to_string()]);
    }
}
