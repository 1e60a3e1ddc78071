//! Location gazetteer and filter values
//!
//! Israeli cities, regions and districts in both languages, plus the
//! variants a datastore column may use for each well-known location.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::read_structured;
use crate::ConfigError;

#[rustfmt::skip]
const LOCATIONS: &[&str] = &[
    // Cities
    "jerusalem", "ירושלים", "tel aviv", "תל אביב", "haifa", "חיפה",
    "beer sheva", "באר שבע", "beersheba", "netanya", "נתניה",
    "ashdod", "אשדוד", "rishon", "ראשון לציון", "petah tikva", "פתח תקווה",
    "holon", "חולון", "bnei brak", "בני ברק", "ramat gan", "רמת גן",
    "ashkelon", "אשקלון", "rehovot", "רחובות", "bat yam", "בת ים",
    "herzliya", "הרצליה", "kfar saba", "כפר סבא", "ra'anana", "רעננה",
    "modi'in", "מודיעין", "lod", "לוד", "ramla", "רמלה",
    "nazareth", "נצרת", "acre", "עכו", "akko", "eilat", "אילת",
    "tiberias", "טבריה", "safed", "צפת", "kiryat", "קריית",
    "dimona", "דימונה", "arad", "ערד", "nahariya", "נהריה",
    // Regions
    "north", "צפון", "south", "דרום", "center", "מרכז",
    "galilee", "גליל", "negev", "נגב", "golan", "גולן",
    "sharon", "שרון", "shfela", "שפלה", "coastal", "חוף",
    // Districts
    "tel aviv district", "מחוז תל אביב", "jerusalem district", "מחוז ירושלים",
    "northern district", "מחוז צפון", "southern district", "מחוז דרום",
    "central district", "מחוז מרכז", "haifa district", "מחוז חיפה",
];

/// (English key, Hebrew key, datastore values)
#[rustfmt::skip]
const FILTER_VALUES: &[(&str, &str, &[&str])] = &[
    ("jerusalem", "ירושלים", &["ירושלים", "Jerusalem", "JERUSALEM", "3"]),
    ("tel aviv", "תל אביב", &["תל אביב", "Tel Aviv", "TEL AVIV", "5", "תל-אביב"]),
    ("haifa", "חיפה", &["חיפה", "Haifa", "HAIFA", "6"]),
    ("beer sheva", "באר שבע", &["באר שבע", "Beer Sheva", "BEER SHEVA", "2", "באר-שבע"]),
    ("netanya", "נתניה", &["נתניה", "Netanya", "NETANYA"]),
    ("ashdod", "אשדוד", &["אשדוד", "Ashdod", "ASHDOD"]),
    ("north", "צפון", &["צפון", "North", "NORTH", "7"]),
    ("south", "דרום", &["דרום", "South", "SOUTH", "2"]),
    ("center", "מרכז", &["מרכז", "Center", "CENTRAL", "4"]),
];

/// Gazetteer entries and per-location filter variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GazetteerConfig {
    /// Known place names, lower-case where the script has case
    #[serde(default)]
    pub locations: Vec<String>,

    /// Lower-cased location -> values to try against datastore columns
    #[serde(default)]
    pub filter_values: BTreeMap<String, Vec<String>>,
}

impl GazetteerConfig {
    /// Built-in Israeli gazetteer
    pub fn builtin() -> Self {
        let locations = LOCATIONS.iter().map(|l| l.to_string()).collect();
        let mut filter_values = BTreeMap::new();
        for (english, hebrew, values) in FILTER_VALUES {
            let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            filter_values.insert(english.to_string(), values.clone());
            filter_values.insert(hebrew.to_string(), values);
        }
        Self {
            locations,
            filter_values,
        }
    }

    /// Load a gazetteer from a JSON or YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut gazetteer: Self = read_structured(path.as_ref())?;
        for location in gazetteer.locations.iter_mut() {
            *location = location.to_lowercase();
        }
        if gazetteer.locations.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "gazetteer.locations".to_string(),
                message: "Gazetteer must list at least one location".to_string(),
            });
        }
        Ok(gazetteer)
    }
}
