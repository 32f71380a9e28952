//! Type-ahead suggestions.
//!
//! Suggestions use a reduced cascade (exact, contains, word start, acronym,
//! fuzzy) over the configured suggestion fields, then de-duplicate by text
//! and category.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::field::{FieldSpec, Record};
use crate::normalize::{normalize, prepare};
use crate::ranking::{
    ACRONYM_SCORE, CONTAINS_SCORE, EXACT_SCORE, FieldMatch, MatchType, Occurrence, PreparedQuery,
    WORD_START_SCORE, fuzzy_match, get_acronym,
};
use crate::sort::sort_suggestions;

/// Shortest acronym considered for acronym suggestions.
const MIN_ACRONYM_CHARS: usize = 2;

/// One suggested completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The field value as stored in the record, trimmed.
    pub text: String,
    /// Category of the field the value came from, such as `"college"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Base score times field weight. Higher is better.
    pub score: f64,
    /// How the value matched.
    pub match_type: MatchType,
}

/// Match one normalized field value against the query.
fn match_value(q: &PreparedQuery<'_>, value: &str, fuzzy_threshold: usize) -> Option<FieldMatch> {
    if value == q.text {
        return Some(FieldMatch {
            match_type: MatchType::Exact,
            base: EXACT_SCORE,
        });
    }
    match q.occurrence(value) {
        Occurrence::Interior => {
            return Some(FieldMatch {
                match_type: MatchType::Contains,
                base: CONTAINS_SCORE,
            });
        }
        Occurrence::WordStart => {
            return Some(FieldMatch {
                match_type: MatchType::WordStart,
                base: WORD_START_SCORE,
            });
        }
        Occurrence::Absent => {}
    }

    let acronym = get_acronym(value);
    if acronym.chars().count() >= MIN_ACRONYM_CHARS && q.text.contains(acronym.as_str()) {
        return Some(FieldMatch {
            match_type: MatchType::Acronym,
            base: ACRONYM_SCORE,
        });
    }

    fuzzy_match(&q.text, value, fuzzy_threshold)
}

/// Suggestions contributed by a single record, in field order.
pub(crate) fn record_suggestions<R: Record + ?Sized>(
    record: &R,
    fields: &[FieldSpec],
    q: &PreparedQuery<'_>,
    fuzzy_threshold: usize,
    fold: bool,
    buf: &mut String,
) -> Vec<Suggestion> {
    let mut out = Vec::new();
    for spec in fields {
        let Some(raw) = record.field(&spec.name) else {
            continue;
        };
        prepare(raw, fold, buf);
        if buf.is_empty() {
            continue;
        }
        if let Some(m) = match_value(q, buf, fuzzy_threshold) {
            out.push(Suggestion {
                text: raw.trim().to_owned(),
                kind: spec.category_or_name().to_owned(),
                score: m.base * spec.weight,
                match_type: m.match_type,
            });
        }
    }
    out
}

/// Collapse suggestions with the same normalized text and category, keeping
/// the highest score (the first one on ties), then sort and truncate.
pub(crate) fn rank_suggestions(candidates: Vec<Suggestion>, max: usize) -> Vec<Suggestion> {
    let mut slots: HashMap<(String, String), usize> = HashMap::new();
    let mut out: Vec<Suggestion> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = (normalize(&candidate.text), candidate.kind.clone());
        match slots.get(&key) {
            Some(&slot) => {
                if candidate.score > out[slot].score {
                    out[slot] = candidate;
                }
            }
            None => {
                slots.insert(key, out.len());
                out.push(candidate);
            }
        }
    }

    sort_suggestions(&mut out);
    out.truncate(max);
    out
}
