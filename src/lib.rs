#![warn(missing_docs)]

//! A multi-strategy search and ranking engine for college records.
//!
//! `collegematch` scores every record field against a query with an ordered
//! cascade of strategies (exact, substring, word start, fuzzy, phonetic,
//! wildcard, regex, synonym, location alias and semantic similarity). The
//! first strategy that matches a field decides its base score; the field's
//! weight scales it, and the best field decides the record's score.
//!
//! ```
//! use collegematch::{College, SearchEngine, SearchOptions};
//!
//! let colleges = vec![
//!     College { name: Some("Delhi Technological University".into()), state: Some("Haryana".into()), ..Default::default() },
//!     College { name: Some("Lady Hardinge Medical College".into()), state: Some("Delhi".into()), ..Default::default() },
//! ];
//!
//! let engine = SearchEngine::default();
//! let results = engine.search("delhi", &colleges, &SearchOptions::default());
//! // Name word start (70 x 3.0) beats state exact (100 x 2.0).
//! assert_eq!(results[0].score, 210.0);
//! assert_eq!(results[1].score, 200.0);
//! ```

/// Engine configuration and its JSON loader.
pub mod config;

/// Synonym and location dictionaries.
pub mod dictionary;

/// Edit distance and word similarity.
pub mod distance;

/// The search engine and cancellation.
pub mod engine;

/// Search errors and diagnostics.
pub mod error;

/// Records, field specifications and per-record scoring.
pub mod field;

/// Text normalization.
pub mod normalize;

/// Per-search options.
pub mod options;

/// Wildcard and regex patterns.
pub mod pattern;

/// Soundex and Metaphone encoders.
pub mod phonetic;

/// Match types, base scores and strategies.
pub mod ranking;

/// Word-overlap similarity.
pub mod semantic;

/// Result and suggestion ordering.
pub mod sort;

/// Type-ahead suggestions.
pub mod suggest;

// Re-export primary public API types at the crate root.
pub use config::{ConfigError, EngineConfig};
pub use dictionary::{Dictionaries, Dictionary};
pub use engine::{CancelToken, SearchEngine, SearchReport, SearchResult};
pub use error::{Diagnostic, SearchError};
pub use field::{College, FieldSpec, Record, RecordMatch};
pub use options::SearchOptions;
pub use ranking::{FieldMatch, MatchType, Strategy};
pub use suggest::Suggestion;
