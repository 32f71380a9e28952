//! Ordering of search results and suggestions.
//!
//! Results sort by score (descending), then by original record index
//! (ascending), so equal scores keep the input order. Suggestions sort by
//! score (descending) with a stable sort, keeping first-seen order on ties.

use std::cmp::Ordering;

use crate::engine::SearchResult;
use crate::suggest::Suggestion;

/// Compare two search results: higher score first, then lower index.
///
/// # Examples
///
/// ```
/// use collegematch::{MatchType, SearchResult};
/// use collegematch::sort::compare_results;
/// use std::cmp::Ordering;
///
/// let rec = ();
/// let make = |index, score| SearchResult {
///     record: &rec,
///     index,
///     score,
///     match_type: MatchType::Exact,
///     field: "name".to_owned(),
/// };
/// assert_eq!(compare_results(&make(5, 200.0), &make(0, 100.0)), Ordering::Less);
/// assert_eq!(compare_results(&make(0, 100.0), &make(5, 100.0)), Ordering::Less);
/// ```
pub fn compare_results<R>(a: &SearchResult<'_, R>, b: &SearchResult<'_, R>) -> Ordering {
    // Scores are never NaN, but treat an indeterminate comparison as equal.
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.index.cmp(&b.index))
}

/// Compare two suggestions: higher score first.
pub fn compare_suggestions(a: &Suggestion, b: &Suggestion) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

pub(crate) fn sort_results<R>(results: &mut [SearchResult<'_, R>]) {
    results.sort_by(compare_results);
}

pub(crate) fn sort_suggestions(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(compare_suggestions);
}
