//! Per-search options.
//!
//! [`SearchOptions`] switches individual strategies on and off and tunes the
//! fuzzy and semantic thresholds for one call. Engine-wide settings live in
//! [`EngineConfig`](crate::EngineConfig).

use serde::{Deserialize, Serialize};

/// Default edit-distance limit for fuzzy matches.
pub const DEFAULT_FUZZY_THRESHOLD: usize = 3;
/// Default minimum similarity for semantic matches.
pub const DEFAULT_SEMANTIC_THRESHOLD: f64 = 0.3;

/// Options for a single search.
///
/// # Defaults
///
/// Every strategy is enabled, `fuzzy_threshold` is 3 and
/// `semantic_threshold` is 0.3. Exact, contains and word-start matching
/// cannot be switched off.
///
/// Deserialization accepts both `useFuzzy` and `use_fuzzy` style keys, and
/// missing keys take their default.
///
/// # Examples
///
/// ```
/// use collegematch::SearchOptions;
///
/// let opts = SearchOptions::default();
/// assert!(opts.use_fuzzy && opts.use_semantic);
/// assert_eq!(opts.fuzzy_threshold, 3);
///
/// let opts = SearchOptions { use_semantic: false, fuzzy_threshold: 1, ..Default::default() };
/// assert!(!opts.use_semantic);
///
/// let opts: SearchOptions = serde_json::from_str(r#"{"usePhonetic": false}"#).unwrap();
/// assert!(!opts.use_phonetic);
/// assert!(opts.use_regex);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Edit-distance matching.
    #[serde(alias = "use_fuzzy")]
    pub use_fuzzy: bool,
    /// Soundex and Metaphone matching.
    #[serde(alias = "use_phonetic")]
    pub use_phonetic: bool,
    /// `*` / `?` pattern queries.
    #[serde(alias = "use_wildcard")]
    pub use_wildcard: bool,
    /// `/.../` regex queries.
    #[serde(alias = "use_regex")]
    pub use_regex: bool,
    /// Synonym expansion.
    #[serde(alias = "use_synonyms")]
    pub use_synonyms: bool,
    /// Location alias expansion.
    #[serde(alias = "use_location")]
    pub use_location: bool,
    /// Word-overlap similarity.
    #[serde(alias = "use_semantic")]
    pub use_semantic: bool,
    /// Largest edit distance still accepted as fuzzy.
    #[serde(alias = "fuzzy_threshold")]
    pub fuzzy_threshold: usize,
    /// Smallest similarity in `[0, 1]` accepted as semantic.
    #[serde(alias = "semantic_threshold")]
    pub semantic_threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            use_fuzzy: true,
            use_phonetic: true,
            use_wildcard: true,
            use_regex: true,
            use_synonyms: true,
            use_location: true,
            use_semantic: true,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            semantic_threshold: DEFAULT_SEMANTIC_THRESHOLD,
        }
    }
}

impl SearchOptions {
    /// Only exact, contains and word-start matching.
    ///
    /// ```
    /// use collegematch::SearchOptions;
    ///
    /// let opts = SearchOptions::literal_only();
    /// assert!(!opts.use_fuzzy && !opts.use_regex && !opts.use_location);
    /// ```
    pub fn literal_only() -> Self {
        Self {
            use_fuzzy: false,
            use_phonetic: false,
            use_wildcard: false,
            use_regex: false,
            use_synonyms: false,
            use_location: false,
            use_semantic: false,
            ..Self::default()
        }
    }
}
