//! Per-search query preparation.
//!
//! Everything that depends only on the query is computed once here, before
//! any record is scanned: normalized text, a substring finder, phonetic
//! codes, compiled patterns and dictionary expansions.

use memchr::memmem;

use super::{Occurrence, classify_occurrence};
use crate::config::EngineConfig;
use crate::error::Diagnostic;
use crate::normalize::prepare;
use crate::options::SearchOptions;
use crate::pattern::{RegexPattern, WildcardPattern, is_wildcard_query, regex_body};
use crate::phonetic::{PhoneticRules, soundex};
use crate::semantic::significant_words;

/// A query with all strategy inputs precomputed.
pub(crate) struct PreparedQuery<'c> {
    /// Normalized query text.
    pub text: String,
    finder: memmem::Finder<'static>,
    rules: &'c PhoneticRules,
    pub soundex: String,
    pub metaphone: String,
    pub wildcard: Option<WildcardPattern>,
    pub regex: Option<RegexPattern>,
    /// Synonym variants, excluding the query itself.
    pub synonyms: Vec<String>,
    /// Location variants, excluding the query itself.
    pub locations: Vec<String>,
    pub words: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'c> PreparedQuery<'c> {
    /// Prepare `raw` for matching. Returns `None` when the query is empty
    /// after normalization.
    ///
    /// Only the inputs of strategies enabled in `options` are computed.
    pub fn new(raw: &str, options: &SearchOptions, config: &'c EngineConfig) -> Option<Self> {
        let mut text = String::new();
        prepare(raw, config.fold_diacritics, &mut text);
        if text.is_empty() {
            return None;
        }

        let finder = memmem::Finder::new(text.as_bytes()).into_owned();
        let rules = &config.phonetic_rules;
        let mut diagnostics = Vec::new();

        let (soundex_code, metaphone_code) = if options.use_phonetic {
            (soundex(&text), rules.metaphone(&text))
        } else {
            (String::new(), String::new())
        };

        // A `/.../` query is a regex even when its body holds `*` or `?`.
        // The body keeps its original case so escapes like `\D` survive.
        let body = regex_body(raw.trim());
        let regex = match body {
            Some(body) if options.use_regex => RegexPattern::new(body)
                .map_err(|err| diagnostics.push(Diagnostic::from(err)))
                .ok(),
            _ => None,
        };
        let wildcard = if options.use_wildcard && body.is_none() && is_wildcard_query(&text) {
            WildcardPattern::new(&text)
                .map_err(|err| diagnostics.push(Diagnostic::from(err)))
                .ok()
        } else {
            None
        };
        for diagnostic in &diagnostics {
            tracing::warn!(%diagnostic, "pattern strategy skipped");
        }

        let dictionaries = &config.dictionaries;
        let synonyms = if options.use_synonyms {
            variants(dictionaries.expand_synonyms(&text), &text)
        } else {
            Vec::new()
        };
        let locations = if options.use_location {
            variants(dictionaries.expand_location(&text), &text)
        } else {
            Vec::new()
        };

        let words = if options.use_semantic {
            significant_words(&text).into_iter().map(str::to_owned).collect()
        } else {
            Vec::new()
        };

        Some(Self {
            finder,
            rules,
            soundex: soundex_code,
            metaphone: metaphone_code,
            wildcard,
            regex,
            synonyms,
            locations,
            words,
            diagnostics,
            text,
        })
    }

    /// Where the query occurs in `field`.
    pub fn occurrence(&self, field: &str) -> Occurrence {
        classify_occurrence(&self.finder, field)
    }

    /// Rules used for Metaphone encoding of fields.
    pub fn phonetic_rules(&self) -> &PhoneticRules {
        self.rules
    }
}

fn variants(expanded: impl IntoIterator<Item = String>, text: &str) -> Vec<String> {
    expanded
        .into_iter()
        .filter(|v| !v.is_empty() && v != text)
        .collect()
}
