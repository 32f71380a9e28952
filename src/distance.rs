//! Levenshtein edit distance.
//!
//! Distances are measured in Unicode scalar values, not bytes, so `"é"` and
//! `"e"` are one substitution apart.

/// Minimum number of single-character insertions, deletions and
/// substitutions turning `a` into `b`.
///
/// # Examples
///
/// ```
/// use collegematch::distance::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// assert_eq!(levenshtein("same", "same"), 0);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    dp_distance(&a, &b)
}

/// Like [`levenshtein`], but gives up with `None` as soon as the distance is
/// known to exceed `max`.
///
/// ```
/// use collegematch::distance::levenshtein_bounded;
///
/// assert_eq!(levenshtein_bounded("aiims", "aims", 3), Some(1));
/// assert_eq!(levenshtein_bounded("aiims", "aiims delhi", 3), None);
/// ```
pub fn levenshtein_bounded(a: &str, b: &str, max: usize) -> Option<usize> {
    if a == b {
        return Some(0);
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // The length difference is a lower bound on the distance.
    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let d = dp_distance_bounded(&a, &b, max)?;
    (d <= max).then_some(d)
}

/// Normalized similarity of two words: `1 - distance / max_len`, floored at 0.
///
/// Two empty words are identical and score 1.
///
/// ```
/// use collegematch::distance::word_similarity;
///
/// assert_eq!(word_similarity("delhi", "delhi"), 1.0);
/// assert!((word_similarity("medical", "medicel") - (1.0 - 1.0 / 7.0)).abs() < 1e-12);
/// ```
pub fn word_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    (1.0 - levenshtein(a, b) as f64 / longest as f64).max(0.0)
}

/// Single-row dynamic programming over the full table.
fn dp_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Keep the shorter string on the row axis.
    let (row_src, col_src) = if a.len() < b.len() { (a, b) } else { (b, a) };
    let mut row: Vec<usize> = (0..=row_src.len()).collect();

    for (i, &cc) in col_src.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &rc) in row_src.iter().enumerate() {
            let cost = usize::from(cc != rc);
            let next = (diag + cost).min(row[j] + 1).min(row[j + 1] + 1);
            diag = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[row_src.len()]
}

/// Row-wise DP that bails out once every cell of a row exceeds `max`.
fn dp_distance_bounded(a: &[char], b: &[char], max: usize) -> Option<usize> {
    if a.is_empty() {
        return (b.len() <= max).then_some(b.len());
    }
    if b.is_empty() {
        return (a.len() <= max).then_some(a.len());
    }

    let (row_src, col_src) = if a.len() < b.len() { (a, b) } else { (b, a) };
    let mut row: Vec<usize> = (0..=row_src.len()).collect();

    for (i, &cc) in col_src.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];
        for (j, &rc) in row_src.iter().enumerate() {
            let cost = usize::from(cc != rc);
            let next = (diag + cost).min(row[j] + 1).min(row[j + 1] + 1);
            diag = row[j + 1];
            row[j + 1] = next;
            row_min = row_min.min(next);
        }
        // Row minima never decrease, so the final distance is at least this.
        if row_min > max {
            return None;
        }
    }

    Some(row[row_src.len()])
}
