//! Match types, base scores and the ordered strategy cascade.
//!
//! Every field of every record is tested against the prepared query by a
//! list of [`Strategy`] evaluators, in priority order. The first strategy
//! that matches decides the field's [`MatchType`] and base score; later,
//! more expensive strategies are never consulted for that field.
//!
//! | Strategy         | Match type(s)              | Base score             |
//! |------------------|----------------------------|------------------------|
//! | `Exact`          | `exact`                    | 100                    |
//! | `Contains`       | `contains`                 | 80                     |
//! | `WordStart`      | `word_start`               | 70                     |
//! | `Fuzzy`          | `fuzzy`                    | `max(60 - 10·d, 1)`    |
//! | `Phonetic`       | `soundex` / `metaphone`    | 50 / 45                |
//! | `Wildcard`       | `wildcard`                 | 40                     |
//! | `Regex`          | `regex`                    | 35                     |
//! | `Synonym`        | `synonym`                  | 30                     |
//! | `Location`       | `location_variant`         | 25                     |
//! | `Semantic`       | `semantic`                 | `similarity · 20`      |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::levenshtein_bounded;
use crate::options::SearchOptions;
use crate::phonetic::soundex;
use crate::semantic::{significant_words, similarity_of_words};

mod query;

pub(crate) use query::PreparedQuery;

/// Base score of an exact match.
pub const EXACT_SCORE: f64 = 100.0;
/// Base score of an interior substring match.
pub const CONTAINS_SCORE: f64 = 80.0;
/// Base score of a match at the start of a word.
pub const WORD_START_SCORE: f64 = 70.0;
/// Base score of an acronym match (suggestions only).
pub const ACRONYM_SCORE: f64 = 65.0;
/// Base score of a fuzzy match before the per-edit penalty.
pub const FUZZY_SCORE: f64 = 60.0;
/// Penalty per edit for fuzzy matches.
pub const FUZZY_EDIT_PENALTY: f64 = 10.0;
/// Floor for fuzzy matches, however many edits they needed.
pub const FUZZY_MIN_SCORE: f64 = 1.0;
/// Base score of a Soundex match.
pub const SOUNDEX_SCORE: f64 = 50.0;
/// Base score of a Metaphone match.
pub const METAPHONE_SCORE: f64 = 45.0;
/// Base score of a wildcard match.
pub const WILDCARD_SCORE: f64 = 40.0;
/// Base score of a regex match.
pub const REGEX_SCORE: f64 = 35.0;
/// Base score of a synonym match.
pub const SYNONYM_SCORE: f64 = 30.0;
/// Base score of a location-alias match.
pub const LOCATION_SCORE: f64 = 25.0;
/// Multiplier applied to semantic similarity.
pub const SEMANTIC_SCALE: f64 = 20.0;

/// Which strategy produced a match.
///
/// Serialized in snake_case (`word_start`, `location_variant`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Field equals the query.
    Exact,
    /// Query occurs inside the field, not at a word start.
    Contains,
    /// A word of the field starts with the query.
    WordStart,
    /// Field is within the fuzzy edit-distance threshold.
    Fuzzy,
    /// Same Soundex code.
    Soundex,
    /// Same simplified Metaphone code.
    Metaphone,
    /// Wildcard pattern matched.
    Wildcard,
    /// User regex matched.
    Regex,
    /// A synonym of the query occurs in the field.
    Synonym,
    /// A location alias of the query occurs in a location field.
    LocationVariant,
    /// Semantic similarity above the threshold.
    Semantic,
    /// The field's word initials occur in the query (suggestions only).
    Acronym,
    /// No strategy matched.
    #[serde(rename = "none")]
    NoMatch,
}

impl MatchType {
    /// The snake_case tag for this match type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Contains => "contains",
            MatchType::WordStart => "word_start",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Soundex => "soundex",
            MatchType::Metaphone => "metaphone",
            MatchType::Wildcard => "wildcard",
            MatchType::Regex => "regex",
            MatchType::Synonym => "synonym",
            MatchType::LocationVariant => "location_variant",
            MatchType::Semantic => "semantic",
            MatchType::Acronym => "acronym",
            MatchType::NoMatch => "none",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positive match of one field: its type and unweighted base score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMatch {
    /// Strategy that matched.
    pub match_type: MatchType,
    /// Base score before the field weight is applied.
    pub base: f64,
}

impl FieldMatch {
    fn new(match_type: MatchType, base: f64) -> Self {
        Self { match_type, base }
    }
}

/// One step of the matching cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Whole-field equality.
    Exact,
    /// Interior substring occurrence.
    Contains,
    /// Occurrence at the start of a word.
    WordStart,
    /// Edit distance within `fuzzy_threshold`.
    Fuzzy,
    /// Soundex, then Metaphone code equality.
    Phonetic,
    /// `*` / `?` pattern queries.
    Wildcard,
    /// `/.../` regex queries.
    Regex,
    /// Synonym expansion.
    Synonym,
    /// Location alias expansion, location fields only.
    Location,
    /// Word-overlap similarity.
    Semantic,
}

impl Strategy {
    /// The default priority order, cheapest and most specific first.
    pub const DEFAULT_ORDER: [Strategy; 10] = [
        Strategy::Exact,
        Strategy::Contains,
        Strategy::WordStart,
        Strategy::Fuzzy,
        Strategy::Phonetic,
        Strategy::Wildcard,
        Strategy::Regex,
        Strategy::Synonym,
        Strategy::Location,
        Strategy::Semantic,
    ];

    /// Test one normalized field against the prepared query.
    ///
    /// Returns `None` when the strategy is disabled by `options`, does not
    /// apply to this query or field, or simply does not match.
    pub(crate) fn evaluate(
        self,
        q: &PreparedQuery<'_>,
        field: &str,
        is_location: bool,
        options: &SearchOptions,
    ) -> Option<FieldMatch> {
        match self {
            Strategy::Exact => (field == q.text).then(|| FieldMatch::new(MatchType::Exact, EXACT_SCORE)),
            Strategy::Contains => (q.occurrence(field) == Occurrence::Interior)
                .then(|| FieldMatch::new(MatchType::Contains, CONTAINS_SCORE)),
            Strategy::WordStart => (q.occurrence(field) == Occurrence::WordStart)
                .then(|| FieldMatch::new(MatchType::WordStart, WORD_START_SCORE)),
            Strategy::Fuzzy => {
                if !options.use_fuzzy {
                    return None;
                }
                fuzzy_match(&q.text, field, options.fuzzy_threshold)
            }
            Strategy::Phonetic => {
                if !options.use_phonetic || (q.soundex.is_empty() && q.metaphone.is_empty()) {
                    return None;
                }
                if !q.soundex.is_empty() && soundex(field) == q.soundex {
                    return Some(FieldMatch::new(MatchType::Soundex, SOUNDEX_SCORE));
                }
                (!q.metaphone.is_empty() && q.phonetic_rules().metaphone(field) == q.metaphone)
                    .then(|| FieldMatch::new(MatchType::Metaphone, METAPHONE_SCORE))
            }
            Strategy::Wildcard => {
                let pattern = q.wildcard.as_ref().filter(|_| options.use_wildcard)?;
                pattern
                    .is_match(field)
                    .then(|| FieldMatch::new(MatchType::Wildcard, WILDCARD_SCORE))
            }
            Strategy::Regex => {
                let pattern = q.regex.as_ref().filter(|_| options.use_regex)?;
                pattern
                    .is_match(field)
                    .then(|| FieldMatch::new(MatchType::Regex, REGEX_SCORE))
            }
            Strategy::Synonym => (options.use_synonyms
                && q.synonyms.iter().any(|s| field.contains(s.as_str())))
            .then(|| FieldMatch::new(MatchType::Synonym, SYNONYM_SCORE)),
            Strategy::Location => (options.use_location
                && is_location
                && q.locations.iter().any(|l| field.contains(l.as_str())))
            .then(|| FieldMatch::new(MatchType::LocationVariant, LOCATION_SCORE)),
            Strategy::Semantic => {
                if !options.use_semantic || q.words.is_empty() {
                    return None;
                }
                let similarity = similarity_of_words(&q.words, &significant_words(field));
                (similarity > 0.0 && similarity >= options.semantic_threshold)
                    .then(|| FieldMatch::new(MatchType::Semantic, similarity * SEMANTIC_SCALE))
            }
        }
    }
}

/// Run `order` against one field, stopping at the first match.
pub(crate) fn match_field(
    order: &[Strategy],
    q: &PreparedQuery<'_>,
    field: &str,
    is_location: bool,
    options: &SearchOptions,
) -> Option<FieldMatch> {
    order
        .iter()
        .find_map(|strategy| strategy.evaluate(q, field, is_location, options))
}

/// Fuzzy score for `query` against `field`, if within `threshold` edits.
pub(crate) fn fuzzy_match(query: &str, field: &str, threshold: usize) -> Option<FieldMatch> {
    let distance = levenshtein_bounded(query, field, threshold)?;
    let base = (FUZZY_SCORE - FUZZY_EDIT_PENALTY * distance as f64).max(FUZZY_MIN_SCORE);
    Some(FieldMatch::new(MatchType::Fuzzy, base))
}

/// Where the query occurs inside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Occurrence {
    /// Not a substring.
    Absent,
    /// At position 0 or right after whitespace (at least once).
    WordStart,
    /// Only in the middle of words.
    Interior,
}

/// Classify every occurrence of `needle` in `haystack`. One occurrence at a
/// word start is enough to make the whole field a word-start match.
pub(crate) fn classify_occurrence(
    finder: &memchr::memmem::Finder<'_>,
    haystack: &str,
) -> Occurrence {
    let mut found = false;
    for pos in finder.find_iter(haystack.as_bytes()) {
        found = true;
        let at_word_start = haystack[..pos]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if at_word_start {
            return Occurrence::WordStart;
        }
    }
    if found { Occurrence::Interior } else { Occurrence::Absent }
}

/// Returns whether `c` separates words for acronym purposes.
fn is_acronym_delimiter(c: char) -> bool {
    c == ' ' || c == '-'
}

/// Collect the first character of every word, where words are separated by
/// spaces or hyphens. The caller is responsible for normalizing first.
///
/// # Examples
///
/// ```
/// use collegematch::ranking::get_acronym;
///
/// assert_eq!(get_acronym("all india institute of medical sciences"), "aiioms");
/// assert_eq!(get_acronym("jawaharlal nehru-university"), "jnu");
/// assert_eq!(get_acronym(""), "");
/// ```
pub fn get_acronym(s: &str) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let word_count_estimate = 1 + memchr::memchr2_iter(b' ', b'-', s.as_bytes()).count();
    let mut acronym = String::with_capacity(word_count_estimate);
    if !is_acronym_delimiter(first) {
        acronym.push(first);
    }

    let mut prev = first;
    for c in chars {
        if is_acronym_delimiter(prev) && !is_acronym_delimiter(c) {
            acronym.push(c);
        }
        prev = c;
    }
    acronym
}
