//! Synonym and location-alias dictionaries and query expansion.
//!
//! Dictionaries are plain data: a map from a normalized term to a set of
//! normalized aliases. They are loaded once (from JSON, or the bundled
//! defaults) and only ever read afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::normalize::normalize;

/// Bundled dictionary data.
const BUILTIN_JSON: &str = include_str!("../data/dictionaries.json");

/// A term-to-aliases table.
///
/// Keys and aliases are normalized on construction, so lookups can use
/// normalized query text directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct Dictionary {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl From<BTreeMap<String, Vec<String>>> for Dictionary {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        raw.into_iter().collect()
    }
}

impl From<Dictionary> for BTreeMap<String, Vec<String>> {
    fn from(dict: Dictionary) -> Self {
        dict.entries
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().collect()))
            .collect()
    }
}

impl<K, I, S> FromIterator<(K, I)> for Dictionary
where
    K: AsRef<str>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (term, aliases) in iter {
            let term = normalize(term.as_ref());
            if term.is_empty() {
                continue;
            }
            let set = entries.entry(term).or_default();
            set.extend(
                aliases
                    .into_iter()
                    .map(|a| normalize(a.as_ref()))
                    .filter(|a| !a.is_empty()),
            );
        }
        Self { entries }
    }
}

impl Dictionary {
    /// Number of terms in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no terms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aliases recorded for exactly `term` (already normalized).
    pub fn aliases(&self, term: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(term)
    }

    /// Expand `term` into itself plus every alias it reaches.
    ///
    /// The normalized term is always part of the result. Aliases come from an
    /// exact key lookup and from every key that is a substring of the term or
    /// contains it. Aliases are never looked up in reverse.
    ///
    /// # Examples
    ///
    /// ```
    /// use collegematch::dictionary::Dictionary;
    ///
    /// let dict: Dictionary = [("iit", ["indian institute of technology"])].into_iter().collect();
    /// let expanded = dict.expand("IIT Bombay");
    /// assert!(expanded.contains("iit bombay"));
    /// assert!(expanded.contains("indian institute of technology"));
    /// ```
    pub fn expand(&self, term: &str) -> BTreeSet<String> {
        let term = normalize(term);
        let mut out = BTreeSet::new();
        if term.is_empty() {
            out.insert(term);
            return out;
        }

        if let Some(aliases) = self.entries.get(&term) {
            out.extend(aliases.iter().cloned());
        }
        for (key, aliases) in &self.entries {
            if *key == term {
                continue;
            }
            if term.contains(key.as_str()) || key.contains(term.as_str()) {
                out.extend(aliases.iter().cloned());
            }
        }

        out.insert(term);
        out
    }
}

fn default_location_suffixes() -> Vec<String> {
    ["city", "town", "village", "district", "state"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// The full set of expansion tables used by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionaries {
    /// Term synonyms (degrees, institution kinds, abbreviations).
    #[serde(default)]
    pub synonyms: Dictionary,
    /// Place-name aliases (historic names, spellings).
    #[serde(default)]
    pub locations: Dictionary,
    /// Generic suffixes appended to a location term as synthetic variants.
    #[serde(default = "default_location_suffixes")]
    pub location_suffixes: Vec<String>,
}

impl Default for Dictionaries {
    fn default() -> Self {
        Self {
            synonyms: Dictionary::default(),
            locations: Dictionary::default(),
            location_suffixes: default_location_suffixes(),
        }
    }
}

impl Dictionaries {
    /// Parse dictionaries from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load dictionaries from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// The bundled dictionaries, parsed on first use and shared afterwards.
    pub fn builtin() -> &'static Dictionaries {
        static BUILTIN: OnceLock<Dictionaries> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::from_json_str(BUILTIN_JSON).unwrap_or_else(|err| {
                tracing::error!(%err, "bundled dictionaries failed to parse");
                Dictionaries::default()
            })
        })
    }

    /// Expand `term` through the synonym table.
    pub fn expand_synonyms(&self, term: &str) -> BTreeSet<String> {
        self.synonyms.expand(term)
    }

    /// Expand `term` through the location table, adding `"{term} {suffix}"`
    /// for every configured suffix.
    pub fn expand_location(&self, term: &str) -> BTreeSet<String> {
        let mut out = self.locations.expand(term);
        let term = normalize(term);
        if !term.is_empty() {
            for suffix in &self.location_suffixes {
                out.insert(format!("{term} {suffix}"));
            }
        }
        out
    }
}

/// Expand `term` with the bundled synonym table.
///
/// ```
/// use collegematch::dictionary::expand_synonyms;
///
/// let expanded = expand_synonyms("MBBS");
/// assert!(expanded.contains("mbbs"));
/// assert!(expanded.contains("bachelor of medicine"));
/// ```
pub fn expand_synonyms(term: &str) -> BTreeSet<String> {
    Dictionaries::builtin().expand_synonyms(term)
}

/// Expand `term` with the bundled location table and suffixes.
///
/// ```
/// use collegematch::dictionary::expand_location;
///
/// let expanded = expand_location("bombay");
/// assert!(expanded.contains("bombay"));
/// assert!(expanded.contains("bombay city"));
/// ```
pub fn expand_location(term: &str) -> BTreeSet<String> {
    Dictionaries::builtin().expand_location(term)
}
