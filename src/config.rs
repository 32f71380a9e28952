//! Engine configuration: searchable fields, suggestion fields, strategy
//! order, expansion dictionaries and batching limits.
//!
//! Configuration is loaded once and is read-only afterwards. Every field has
//! a default, so a JSON document only needs the keys it wants to change:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "name", "weight": 3.0, "category": "college" },
//!     { "name": "city", "weight": 2.0, "location": true }
//!   ],
//!   "strategy_order": ["exact", "contains", "word_start", "fuzzy"],
//!   "fold_diacritics": true
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dictionary::Dictionaries;
use crate::field::FieldSpec;
use crate::phonetic::PhoneticRules;
use crate::ranking::Strategy;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON for the expected shape.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but describes an unusable configuration.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Records per cancellation check and per parallel work unit.
pub const DEFAULT_BATCH_SIZE: usize = 256;
/// Record count from which batches are scored on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;
/// Queries shorter than this (in characters) get no suggestions.
pub const DEFAULT_MIN_SUGGEST_CHARS: usize = 2;
/// Edit-distance limit for fuzzy suggestions.
pub const DEFAULT_SUGGESTION_FUZZY_THRESHOLD: usize = 2;

fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("name", 3.0).category("college"),
        FieldSpec::new("city", 2.0).location(true),
        FieldSpec::new("state", 2.0).location(true),
        FieldSpec::new("district", 1.5).location(true),
        FieldSpec::new("type", 1.0),
        FieldSpec::new("management_type", 1.0).category("management"),
    ]
}

fn default_suggestion_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("name", 3.0).category("college"),
        FieldSpec::new("city", 2.0),
        FieldSpec::new("state", 2.0),
        FieldSpec::new("type", 1.0),
    ]
}

fn default_strategy_order() -> Vec<Strategy> {
    Strategy::DEFAULT_ORDER.to_vec()
}

fn default_dictionaries() -> Dictionaries {
    Dictionaries::builtin().clone()
}

fn default_min_suggest_chars() -> usize {
    DEFAULT_MIN_SUGGEST_CHARS
}

fn default_suggestion_fuzzy_threshold() -> usize {
    DEFAULT_SUGGESTION_FUZZY_THRESHOLD
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

/// Everything the engine needs besides the query and the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fields scored by `search`, in tie-break order.
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldSpec>,

    /// Fields whose values are offered as suggestions.
    #[serde(default = "default_suggestion_fields")]
    pub suggestion_fields: Vec<FieldSpec>,

    /// Strategy cascade for `search`, highest priority first.
    #[serde(default = "default_strategy_order")]
    pub strategy_order: Vec<Strategy>,

    /// Strip diacritics from queries and field values before matching.
    #[serde(default)]
    pub fold_diacritics: bool,

    /// Minimum normalized query length for suggestions.
    #[serde(default = "default_min_suggest_chars")]
    pub min_suggest_chars: usize,

    /// Edit-distance limit for fuzzy suggestions.
    #[serde(default = "default_suggestion_fuzzy_threshold")]
    pub suggestion_fuzzy_threshold: usize,

    /// Records per batch. Cancellation is checked between batches.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Minimum record count for parallel scoring.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Synonym and location tables. Defaults to the bundled set.
    #[serde(default = "default_dictionaries")]
    pub dictionaries: Dictionaries,

    /// Metaphone rewrite rules.
    #[serde(default)]
    pub phonetic_rules: PhoneticRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            suggestion_fields: default_suggestion_fields(),
            strategy_order: default_strategy_order(),
            fold_diacritics: false,
            min_suggest_chars: DEFAULT_MIN_SUGGEST_CHARS,
            suggestion_fuzzy_threshold: DEFAULT_SUGGESTION_FUZZY_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            dictionaries: default_dictionaries(),
            phonetic_rules: PhoneticRules::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// ```
    /// use collegematch::EngineConfig;
    ///
    /// let config = EngineConfig::from_json_str(r#"{"fold_diacritics": true}"#).unwrap();
    /// assert!(config.fold_diacritics);
    /// assert_eq!(config.fields.len(), 6);
    ///
    /// assert!(EngineConfig::from_json_str(r#"{"batch_size": 0}"#).is_err());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_fields("fields", &self.fields)?;
        validate_fields("suggestion_fields", &self.suggestion_fields)?;

        let mut seen = HashSet::new();
        for strategy in &self.strategy_order {
            if !seen.insert(strategy) {
                return Err(ConfigError::Validation(format!(
                    "strategy_order lists {strategy:?} more than once"
                )));
            }
        }

        if self.batch_size == 0 {
            return Err(ConfigError::Validation(
                "batch_size must be greater than zero".into(),
            ));
        }

        for rule in self.phonetic_rules.rules() {
            if rule.from.is_empty() || !rule.from.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "phonetic rule pattern {:?} must be non-empty lower-case ASCII letters",
                    rule.from
                )));
            }
        }

        Ok(())
    }
}

fn validate_fields(what: &str, fields: &[FieldSpec]) -> Result<(), ConfigError> {
    for spec in fields {
        if spec.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{what}: field name is empty")));
        }
        if !(spec.weight.is_finite() && spec.weight > 0.0) {
            return Err(ConfigError::Validation(format!(
                "{what}: field {:?} has weight {}, expected a positive finite number",
                spec.name, spec.weight
            )));
        }
    }
    Ok(())
}
