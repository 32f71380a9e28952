//! Lightweight semantic similarity: word overlap blended with fuzzy word
//! similarity.
//!
//! This is a bounded, deterministic heuristic. It knows nothing about
//! meaning; it rewards texts that share words, or words that are spelled
//! almost alike.

use crate::distance::word_similarity;

/// Words of this many characters or fewer are ignored.
const MIN_WORD_CHARS: usize = 2;
const OVERLAP_WEIGHT: f64 = 0.6;
const SIMILARITY_WEIGHT: f64 = 0.4;

/// Split `text` into its distinct significant words, in first-seen order.
pub(crate) fn significant_words(text: &str) -> Vec<&str> {
    let mut words: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        if word.chars().count() > MIN_WORD_CHARS && !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

/// Similarity of `query` to `text` in `[0, 1]`.
///
/// Both inputs are expected to be normalized already. The score is
/// `0.6 × overlap + 0.4 × avg_similarity`, where `overlap` is the shared
/// word count over the larger word count and `avg_similarity` is the mean,
/// over query words, of the best [`word_similarity`] against any text word.
///
/// # Examples
///
/// ```
/// use collegematch::semantic::semantic_similarity;
///
/// assert_eq!(semantic_similarity("medical college", "medical college"), 1.0);
/// assert_eq!(semantic_similarity("of in", "medical college"), 0.0);
/// let s = semantic_similarity("medical institute", "government medical college");
/// assert!(s > 0.3 && s < 1.0);
/// ```
pub fn semantic_similarity(query: &str, text: &str) -> f64 {
    let query_words = significant_words(query);
    let text_words = significant_words(text);
    similarity_of_words(&query_words, &text_words)
}

/// [`semantic_similarity`] over pre-split word lists.
pub(crate) fn similarity_of_words<Q, T>(query_words: &[Q], text_words: &[T]) -> f64
where
    Q: AsRef<str>,
    T: AsRef<str>,
{
    if query_words.is_empty() || text_words.is_empty() {
        return 0.0;
    }

    let shared = query_words
        .iter()
        .filter(|q| text_words.iter().any(|t| t.as_ref() == q.as_ref()))
        .count();
    let overlap = shared as f64 / query_words.len().max(text_words.len()) as f64;

    let total: f64 = query_words
        .iter()
        .map(|q| {
            text_words
                .iter()
                .map(|t| word_similarity(q.as_ref(), t.as_ref()))
                .fold(0.0, f64::max)
        })
        .sum();
    let avg_similarity = total / query_words.len() as f64;

    OVERLAP_WEIGHT * overlap + SIMILARITY_WEIGHT * avg_similarity
}
