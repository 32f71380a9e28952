//! Integration tests for the `SearchEngine` public API.
//!
//! Each test goes through the crate root re-exports only: build records,
//! run `search` / `search_report`, and check scores, match types and order.

use std::collections::HashMap;

use collegematch::{
    CancelToken, College, Diagnostic, EngineConfig, FieldSpec, MatchType, SearchEngine,
    SearchError, SearchOptions, Strategy,
};

// ---------------------------------------------------------------------------
// Shared fixtures
// ---------------------------------------------------------------------------

fn college(name: &str, city: &str, state: &str) -> College {
    College {
        name: Some(name.to_owned()),
        city: Some(city.to_owned()),
        state: Some(state.to_owned()),
        ..College::default()
    }
}

fn dataset() -> Vec<College> {
    vec![
        College {
            kind: Some("Medical".to_owned()),
            management_type: Some("Central".to_owned()),
            ..college("AIIMS Delhi", "New Delhi", "Delhi")
        },
        College {
            kind: Some("Medical".to_owned()),
            management_type: Some("Central".to_owned()),
            ..college("JIPMER Puducherry", "Puducherry", "Puducherry")
        },
        College {
            kind: Some("Engineering".to_owned()),
            management_type: Some("Central".to_owned()),
            ..college("Indian Institute of Technology Bombay", "Mumbai", "Maharashtra")
        },
        College {
            kind: Some("Medical".to_owned()),
            management_type: Some("Government".to_owned()),
            ..college("Madras Medical College", "Chennai", "Tamil Nadu")
        },
        College {
            kind: Some("Dental".to_owned()),
            management_type: Some("Private".to_owned()),
            ..college("Manipal College of Dental Sciences", "Manipal", "Karnataka")
        },
    ]
}

fn search<'a>(query: &str, records: &'a [College]) -> Vec<collegematch::SearchResult<'a, College>> {
    SearchEngine::default().search(query, records, &SearchOptions::default())
}

fn names<'a>(results: &[collegematch::SearchResult<'a, College>]) -> Vec<&'a str> {
    results
        .iter()
        .map(|r| r.record.name.as_deref().unwrap_or_default())
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Core scenarios
// ---------------------------------------------------------------------------

#[test]
fn delhi_scenario_picks_weighted_field() {
    let records = vec![
        college("AIIMS Delhi", "", "Delhi"),
        college("JIPMER Puducherry", "", "Puducherry"),
    ];
    let results = search("delhi", &records);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].index, 0);
    // Name word start (70 x 3) outranks state exact (100 x 2).
    assert_eq!(results[0].match_type, MatchType::WordStart);
    assert_eq!(results[0].score, 210.0);
    assert_eq!(results[0].field, "name");
}

#[test]
fn aiims_is_word_start_on_name() {
    let records = vec![college("AIIMS Delhi", "", "")];
    let results = search("aiims", &records);
    assert_eq!(results[0].match_type, MatchType::WordStart);
    assert_eq!(results[0].score, 70.0 * 3.0);
}

#[test]
fn empty_query_returns_empty() {
    let records = dataset();
    assert!(search("", &records).is_empty());
    assert!(search("   ", &records).is_empty());
}

#[test]
fn empty_records_return_empty() {
    let records: Vec<College> = Vec::new();
    assert!(search("aiims", &records).is_empty());
}

#[test]
fn malformed_regex_is_non_fatal() {
    let records = vec![college("Odd/[/ Name Institute", "Pune", "Maharashtra")];
    let options = SearchOptions { use_regex: true, ..Default::default() };
    let report = SearchEngine::default()
        .search_report("/[/", &records, &options, None)
        .unwrap();
    assert!(matches!(report.diagnostics.as_slice(), [Diagnostic::InvalidPattern(_)]));
    // Other strategies still run: the literal text occurs in the name.
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].match_type, MatchType::Contains);
}

#[test]
fn malformed_regex_through_plain_search() {
    let records = dataset();
    let results = search("/[/", &records);
    assert!(results.iter().all(|r| r.match_type != MatchType::Regex));
}

// ---------------------------------------------------------------------------
// 2. Ordering
// ---------------------------------------------------------------------------

#[test]
fn results_descend_by_score() {
    let records = dataset();
    let results = search("medical", &records);
    assert!(results.len() >= 3);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    // Name word start beats a type exact match.
    assert_eq!(results[0].record.name.as_deref(), Some("Madras Medical College"));
}

#[test]
fn ties_keep_input_order() {
    let records = vec![
        college("Alpha", "Pune", "X"),
        college("Beta", "Pune", "Y"),
        college("Gamma", "Pune", "Z"),
    ];
    let results = search("pune", &records);
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn non_matching_records_are_excluded() {
    let records = dataset();
    let results = SearchEngine::default().search("jipmer", &records, &SearchOptions::literal_only());
    assert_eq!(names(&results), vec!["JIPMER Puducherry"]);
}

// ---------------------------------------------------------------------------
// 3. Strategy coverage through the engine
// ---------------------------------------------------------------------------

#[test]
fn fuzzy_typo_finds_record() {
    let records = dataset();
    let options = SearchOptions { use_phonetic: false, ..Default::default() };
    let results = SearchEngine::default().search("manipl", &records, &options);
    assert_eq!(results[0].record.city.as_deref(), Some("Manipal"));
    assert_eq!(results[0].match_type, MatchType::Fuzzy);
    assert_eq!(results[0].field, "city");
    assert_eq!(results[0].score, 50.0 * 2.0);
}

#[test]
fn phonetic_beats_fuzzy_on_heavier_field() {
    // The name shares the Soundex code M514 with "manipl", and the name
    // weight (3.0) outweighs the fuzzy city match.
    let records = dataset();
    let results = search("manipl", &records);
    assert_eq!(results[0].match_type, MatchType::Soundex);
    assert_eq!(results[0].score, 150.0);
}

#[test]
fn wildcard_query() {
    let records = dataset();
    let options = SearchOptions { use_phonetic: false, ..Default::default() };
    let results = SearchEngine::default().search("manipal*dental", &records, &options);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_type, MatchType::Wildcard);
    assert_eq!(results[0].field, "name");
    assert_eq!(results[0].score, 40.0 * 3.0);
}

#[test]
fn phonetic_runs_before_wildcard() {
    // Stripped of `*`, the query shares the Soundex code M514 with the name.
    let records = dataset();
    let results = search("manipal*dental", &records);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_type, MatchType::Soundex);
    assert_eq!(results[0].score, 50.0 * 3.0);
}

#[test]
fn regex_query() {
    let records = dataset();
    let results = search("/^jip.*cherry$/", &records);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_type, MatchType::Regex);
    assert_eq!(results[0].score, 35.0 * 3.0);
}

#[test]
fn synonym_query() {
    let records = dataset();
    let options = SearchOptions { use_semantic: false, ..Default::default() };
    let results = SearchEngine::default().search("iit", &records, &options);
    let hit = results
        .iter()
        .find(|r| r.match_type == MatchType::Synonym)
        .expect("synonym hit");
    assert_eq!(hit.record.name.as_deref(), Some("Indian Institute of Technology Bombay"));
}

#[test]
fn location_alias_query() {
    let records = vec![college("Grant Medical College", "Mumbai", "Maharashtra")];
    let options = SearchOptions {
        use_fuzzy: false,
        use_phonetic: false,
        use_semantic: false,
        ..Default::default()
    };
    let results = SearchEngine::default().search("Bombay", &records, &options);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_type, MatchType::LocationVariant);
    assert_eq!(results[0].field, "city");
}

#[test]
fn alias_terms_do_not_reach_their_key() {
    // "state" is an alias of "government", not a key of its own.
    let records = vec![college("Government Medical College", "Kozhikode", "")];
    let options = SearchOptions {
        use_fuzzy: false,
        use_phonetic: false,
        use_semantic: false,
        ..Default::default()
    };
    assert!(SearchEngine::default().search("state", &records, &options).is_empty());
}

#[test]
fn location_alias_only_on_location_fields() {
    let records = vec![college("Chennai Dental College", "Chennai", "Tamil Nadu")];
    let options = SearchOptions { use_semantic: false, use_fuzzy: false, use_phonetic: false, ..Default::default() };
    let results = SearchEngine::default().search("madras", &records, &options);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].match_type, MatchType::LocationVariant);
    assert_eq!(results[0].field, "city");
    assert_eq!(results[0].score, 25.0 * 2.0);
}

#[test]
fn literal_only_returns_literal_match_types() {
    let records = dataset();
    let options = SearchOptions::literal_only();
    for query in ["delhi", "aiims", "medical", "tech", "mbbs", "bombay", "madras", "x*"] {
        for r in SearchEngine::default().search(query, &records, &options) {
            assert!(
                matches!(r.match_type, MatchType::Exact | MatchType::Contains | MatchType::WordStart),
                "{query}: {:?}",
                r.match_type
            );
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Configuration
// ---------------------------------------------------------------------------

#[test]
fn custom_fields_and_weights() {
    let config = EngineConfig {
        fields: vec![FieldSpec::new("title", 1.0), FieldSpec::new("town", 5.0).location(true)],
        ..EngineConfig::default()
    };
    let engine = SearchEngine::new(config).unwrap();

    let mut a = HashMap::new();
    a.insert("title".to_owned(), "Pune Institute".to_owned());
    let mut b = HashMap::new();
    b.insert("town".to_owned(), "Pune".to_owned());
    let records = vec![a, b];

    let results = engine.search("pune", &records, &SearchOptions::literal_only());
    assert_eq!(results[0].index, 1);
    assert_eq!(results[0].score, 500.0);
    assert_eq!(results[1].score, 70.0);
}

#[test]
fn custom_strategy_order() {
    let config = EngineConfig {
        strategy_order: vec![Strategy::Phonetic, Strategy::Exact],
        ..EngineConfig::default()
    };
    let engine = SearchEngine::new(config).unwrap();
    let records = vec![college("", "Pune", "")];
    let results = engine.search("pune", &records, &SearchOptions::default());
    assert_eq!(results[0].match_type, MatchType::Soundex);
}

#[test]
fn config_from_json() {
    let config = EngineConfig::from_json_str(
        r#"{
            "fields": [{"name": "name", "weight": 2.0, "category": "college"}],
            "strategy_order": ["exact", "contains", "word_start"]
        }"#,
    )
    .unwrap();
    let engine = SearchEngine::new(config).unwrap();
    let records = dataset();
    let results = engine.search("aiims", &records, &SearchOptions::default());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 140.0);
}

#[test]
fn diacritic_folding_is_opt_in() {
    let records = vec![college("Université de Pondichéry", "", "")];
    let plain = search("pondichery", &records);
    assert!(plain.iter().all(|r| r.match_type != MatchType::WordStart));

    let engine = SearchEngine::new(EngineConfig { fold_diacritics: true, ..EngineConfig::default() }).unwrap();
    let folded = engine.search("pondichery", &records, &SearchOptions::literal_only());
    assert_eq!(folded[0].match_type, MatchType::WordStart);
}

#[test]
fn json_object_records() {
    let records: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(
        r#"[{"name": "Government Dental College", "city": "Nagpur", "seats": 100},
            {"name": "Nagpur Veterinary College", "city": null}]"#,
    )
    .unwrap();
    let results = SearchEngine::default().search("nagpur", &records, &SearchOptions::literal_only());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].index, 1);
    assert_eq!(results[1].field, "city");
}

// ---------------------------------------------------------------------------
// 5. Cancellation
// ---------------------------------------------------------------------------

#[test]
fn cancel_before_scan() {
    let records = dataset();
    let token = CancelToken::new();
    token.cancel();
    let err = SearchEngine::default()
        .search_report("delhi", &records, &SearchOptions::default(), Some(&token))
        .unwrap_err();
    assert_eq!(err, SearchError::Cancelled { scanned: 0 });
}

#[test]
fn uncancelled_token_completes() {
    let records = dataset();
    let token = CancelToken::new();
    let report = SearchEngine::default()
        .search_report("delhi", &records, &SearchOptions::default(), Some(&token))
        .unwrap();
    assert_eq!(report.scanned, records.len());
    assert!(!report.results.is_empty());
}
