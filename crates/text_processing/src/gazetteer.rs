//! Location gazetteer
//!
//! Decides whether a query token names a place and maps recognised places
//! to the values datastore columns use for them.

use datagov_config::GazetteerConfig;
use std::collections::HashMap;

/// Known locations plus their filter variants
#[derive(Debug, Clone)]
pub struct Gazetteer {
    locations: Vec<String>,
    filter_values: HashMap<String, Vec<String>>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::from(&GazetteerConfig::builtin())
    }
}

impl From<&GazetteerConfig> for Gazetteer {
    fn from(config: &GazetteerConfig) -> Self {
        let mut locations: Vec<String> = Vec::with_capacity(config.locations.len());
        for location in &config.locations {
            let lower = location.to_lowercase();
            if !lower.is_empty() && !locations.contains(&lower) {
                locations.push(lower);
            }
        }
        let filter_values = config
            .filter_values
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect::<HashMap<_, _>>();
        tracing::debug!(
            locations = locations.len(),
            filter_keys = filter_values.len(),
            "Built gazetteer"
        );
        Self {
            locations,
            filter_values,
        }
    }
}

impl Gazetteer {
    /// Location entries, lower-cased, in configuration order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|l| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Token equals, contains, or is contained in some location
    pub fn matches(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.locations
            .iter()
            .any(|loc| *loc == token || loc.contains(&token) || token.contains(loc.as_str()))
    }

    /// Token equals or is contained in some location.
    ///
    /// Used to accept a prefix-stripped remainder during tokenization.
    pub fn covers(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.locations
            .iter()
            .any(|loc| *loc == token || loc.contains(&token))
    }

    /// Token is exactly a location entry
    pub fn is_exact(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.locations.iter().any(|loc| *loc == token)
    }

    /// Entries appearing verbatim inside `text` (case-folded)
    pub fn entries_in<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a str> + 'a {
        let text = text.to_lowercase();
        self.locations
            .iter()
            .filter(move |loc| text.contains(loc.as_str()))
            .map(|loc| loc.as_str())
    }

    /// Datastore values for a location token; unknown tokens map to themselves
    pub fn filter_values(&self, location: &str) -> Vec<String> {
        match self.filter_values.get(&location.to_lowercase()) {
            Some(values) => values.clone(),
            None => vec![location.to_string()],
        }
    }

    /// Filter values for every token, in order
    pub fn filter_values_for(&self, locations: &[String]) -> Vec<String> {
        locations
            .iter()
            .flat_map(|loc| self.filter_values(loc))
            .collect()
    }
}

/// First value containing a non-ASCII character
pub fn first_non_ascii(values: &[String]) -> Option<&str> {
    values
        .iter()
        .find(|v| !v.is_ascii())
        .map(|v| v.as_str())
}
