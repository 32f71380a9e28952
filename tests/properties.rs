//! Property tests for distance, expansion, search and suggestion invariants.

use std::collections::HashSet;

use collegematch::dictionary::expand_synonyms;
use collegematch::distance::{levenshtein, levenshtein_bounded};
use collegematch::normalize::normalize;
use collegematch::{College, MatchType, SearchEngine, SearchOptions};
use proptest::prelude::*;

fn college_strategy() -> impl Strategy<Value = College> {
    let word = prop::sample::select(vec![
        "Delhi", "Pune", "Medical", "College", "Institute", "Government", "Dental", "Nagpur", "Chennai",
        "Madras", "AIIMS", "Technology",
    ]);
    let text = prop::collection::vec(word, 0..4).prop_map(|words| words.join(" "));
    (text.clone(), text.clone(), text.clone(), text).prop_map(|(name, city, state, kind)| College {
        name: Some(name),
        city: Some(city),
        state: Some(state),
        kind: Some(kind),
        ..College::default()
    })
}

proptest! {
    #[test]
    fn levenshtein_identity(a in "\\PC{0,16}") {
        prop_assert_eq!(levenshtein(&a, &a), 0);
    }

    #[test]
    fn levenshtein_symmetric(a in "\\PC{0,12}", b in "\\PC{0,12}") {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
    }

    #[test]
    fn bounded_agrees_with_full(a in "[a-e]{0,10}", b in "[a-e]{0,10}", max in 0usize..6) {
        let full = levenshtein(&a, &b);
        let bounded = levenshtein_bounded(&a, &b, max);
        if full <= max {
            prop_assert_eq!(bounded, Some(full));
        } else {
            prop_assert_eq!(bounded, None);
        }
    }

    #[test]
    fn synonyms_contain_normalized_input(term in "[ a-zA-Z]{0,20}") {
        prop_assert!(expand_synonyms(&term).contains(&normalize(&term)));
    }

    #[test]
    fn search_scores_positive_and_sorted(
        records in prop::collection::vec(college_strategy(), 0..12),
        query in "[a-z ]{0,10}",
    ) {
        let results = SearchEngine::default().search(&query, &records, &SearchOptions::default());
        for r in &results {
            prop_assert!(r.score > 0.0);
            prop_assert!(r.index < records.len());
        }
        for w in results.windows(2) {
            prop_assert!(w[0].score > w[1].score || (w[0].score == w[1].score && w[0].index < w[1].index));
        }
    }

    #[test]
    fn literal_only_search_yields_literal_types(
        records in prop::collection::vec(college_strategy(), 0..12),
        query in "[a-z*?/ ]{0,10}",
    ) {
        let results = SearchEngine::default().search(&query, &records, &SearchOptions::literal_only());
        for r in &results {
            prop_assert!(matches!(
                r.match_type,
                MatchType::Exact | MatchType::Contains | MatchType::WordStart
            ));
        }
    }

    #[test]
    fn suggestions_never_repeat_text_and_kind(
        records in prop::collection::vec(college_strategy(), 0..12),
        query in "[a-z ]{0,8}",
        max in 0usize..20,
    ) {
        let suggestions = SearchEngine::default().suggest(&query, &records, max);
        prop_assert!(suggestions.len() <= max);
        let mut seen = HashSet::new();
        for s in &suggestions {
            prop_assert!(seen.insert((s.text.clone(), s.kind.clone())));
        }
    }
}
