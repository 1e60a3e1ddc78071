//! Field intents and count-query detection
//!
//! A field intent is a column the user asked for by name ("phone numbers of
//! clinics", "כתובות בתי ספר"). Each intent carries the patterns used to
//! find the matching column in a resource schema.

use datagov_core::FieldCategory;
use once_cell::sync::Lazy;
use regex::Regex;

/// Intent key and the field-name patterns it stands for, in priority order
#[rustfmt::skip]
pub const FIELD_INTENTS: &[(&str, &[&str])] = &[
    ("address", &["כתובת", "address", "רחוב", "street", "מיקום", "location", "כתובת_מלאה"]),
    ("addresses", &["כתובת", "address", "רחוב", "street", "מיקום", "location"]),
    ("כתובת", &["כתובת", "address", "רחוב", "street", "מיקום", "location"]),
    ("phone", &["טלפון", "phone", "tel", "telephone", "פקס", "fax", "נייד", "mobile"]),
    ("phones", &["טלפון", "phone", "tel", "telephone", "פקס", "fax"]),
    ("טלפון", &["טלפון", "phone", "tel", "telephone"]),
    ("contact", &["איש_קשר", "contact", "אימייל", "email", "טלפון", "phone"]),
    ("email", &["אימייל", "email", "דואר", "mail"]),
    ("name", &["שם", "name", "שם_מלא", "full_name", "כותרת", "title"]),
    ("שם", &["שם", "name", "שם_מלא", "full_name"]),
    ("city", &["עיר", "city", "יישוב", "town", "רשות", "municipality"]),
    ("עיר", &["עיר", "city", "יישוב", "town"]),
    ("district", &["מחוז", "district", "אזור", "region"]),
    ("מחוז", &["מחוז", "district", "אזור", "region"]),
    ("type", &["סוג", "type", "קטגוריה", "category", "תחום", "domain"]),
    ("סוג", &["סוג", "type", "קטגוריה", "category"]),
    ("status", &["סטטוס", "status", "מצב", "state"]),
    ("link", &["קישור", "link", "url", "אתר", "website"]),
    ("url", &["קישור", "link", "url", "אתר", "website"]),
    ("date", &["תאריך", "date", "יום", "day", "שנה", "year"]),
    ("תאריך", &["תאריך", "date", "יום", "day"]),
    ("hours", &["שעות", "hours", "שעות_פתיחה", "opening_hours", "זמנים"]),
    ("שעות", &["שעות", "hours", "שעות_פתיחה", "opening_hours"]),
];

#[rustfmt::skip]
const COUNT_PATTERNS: &[&str] = &[
    r"\bכמה\b", r#"\bסה"כ\b"#, r"\bסהכ\b", r"\bמספר\b", r"\bסכום\b",
    r"\bhow many\b", r"\btotal\b", r"\bcount\b", r"\bsum of\b", r"\bhow much\b",
];

static COUNT_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    COUNT_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

/// Intents named in the query, deduplicated, in table order
pub fn extract_field_intents(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    FIELD_INTENTS
        .iter()
        .filter(|(key, patterns)| {
            lower.contains(key) || patterns.iter().any(|p| lower.contains(p))
        })
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Field-name patterns for an intent; unknown intents match themselves
pub fn intent_patterns(intent: &str) -> Vec<String> {
    FIELD_INTENTS
        .iter()
        .find(|(key, _)| *key == intent)
        .map(|(_, patterns)| patterns.iter().map(|p| p.to_string()).collect())
        .unwrap_or_else(|| vec![intent.to_string()])
}

/// Availability category an intent is checked against, if any
pub fn intent_category(intent: &str) -> Option<FieldCategory> {
    match intent.to_lowercase().as_str() {
        "phone" | "phones" | "telephone" | "טלפון" | "contact" => Some(FieldCategory::Phone),
        "address" | "addresses" | "כתובת" | "location" | "מיקום" => Some(FieldCategory::Address),
        "email" | "אימייל" | "mail" => Some(FieldCategory::Email),
        "date" | "תאריך" | "time" => Some(FieldCategory::Date),
        "city" | "עיר" | "district" | "מחוז" => Some(FieldCategory::Location),
        _ => None,
    }
}

/// Query asks for a count or a total
pub fn is_count_query(query: &str) -> bool {
    let lower = query.to_lowercase();
    COUNT_REGEXES.iter().any(|re| re.is_match(&lower))
}
