//! Text normalization shared by every matching strategy.
//!
//! All comparisons in the engine happen on normalized text: lower-cased and
//! trimmed. Diacritic folding is available as an opt-in extra step.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lower-case and trim `text`.
///
/// # Examples
///
/// ```
/// use collegematch::normalize::normalize;
///
/// assert_eq!(normalize("  AIIMS Delhi "), "aiims delhi");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let mut buf = String::new();
    normalize_into(text, &mut buf);
    buf
}

/// Normalize an optional value. Missing values normalize to the empty string.
///
/// ```
/// use collegematch::normalize::normalize_opt;
///
/// assert_eq!(normalize_opt(None), "");
/// assert_eq!(normalize_opt(Some(" Pune ")), "pune");
/// ```
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Lower-case and trim `text` into `buf`, reusing the buffer's allocation.
///
/// ASCII input takes a byte-level path that skips Unicode case tables.
pub(crate) fn normalize_into(text: &str, buf: &mut String) {
    buf.clear();
    let trimmed = text.trim();
    buf.reserve(trimmed.len());
    if trimmed.is_ascii() {
        buf.extend(trimmed.bytes().map(|b| b.to_ascii_lowercase() as char));
    } else {
        for c in trimmed.chars() {
            buf.extend(c.to_lowercase());
        }
    }
}

/// Strip diacritics by NFD-decomposing and dropping combining marks.
///
/// Returns [`Cow::Borrowed`] when nothing had to be removed.
///
/// ```
/// use collegematch::normalize::fold_diacritics;
///
/// assert_eq!(fold_diacritics("b\u{00e9}lgaum"), "belgaum");
/// assert!(matches!(fold_diacritics("pune"), std::borrow::Cow::Borrowed(_)));
/// ```
pub fn fold_diacritics(s: &str) -> Cow<'_, str> {
    if s.is_ascii() {
        return Cow::Borrowed(s);
    }

    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    if stripped == s {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(stripped)
    }
}

/// Normalize and, when `fold` is set, strip diacritics as well.
pub(crate) fn prepare(text: &str, fold: bool, buf: &mut String) {
    if fold {
        normalize_into(&fold_diacritics(text), buf);
    } else {
        normalize_into(text, buf);
    }
}

/// Count characters, with a byte-length fast path for ASCII.
pub(crate) fn char_len(s: &str) -> usize {
    if s.is_ascii() { s.len() } else { s.chars().count() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize("  Government Medical College\t"), "government medical college");
    }

    #[test]
    fn keeps_inner_whitespace() {
        assert_eq!(normalize("St.  Xavier's"), "st.  xavier's");
    }

    #[test]
    fn non_ascii_lowercase() {
        assert_eq!(normalize("ÉCOLE"), "école");
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn missing_value_is_empty() {
        assert_eq!(normalize_opt(None), "");
    }

    #[test]
    fn normalize_into_reuses_buffer() {
        let mut buf = String::from("stale contents");
        normalize_into("Kochi", &mut buf);
        assert_eq!(buf, "kochi");
    }

    #[test]
    fn folds_precomposed_accent() {
        let folded = fold_diacritics("caf\u{00E9}");
        assert_eq!(folded, "cafe");
        assert!(matches!(folded, Cow::Owned(_)));
    }

    #[test]
    fn folds_combining_marks() {
        assert_eq!(fold_diacritics("a\u{0300}\u{0301}"), "a");
    }

    #[test]
    fn fold_keeps_cjk_borrowed() {
        let folded = fold_diacritics("\u{4e16}\u{754c}");
        assert!(matches!(folded, Cow::Borrowed(_)));
    }

    #[test]
    fn prepare_with_and_without_folding() {
        let mut buf = String::new();
        prepare(" Caf\u{00E9} ", true, &mut buf);
        assert_eq!(buf, "cafe");
        prepare(" Caf\u{00E9} ", false, &mut buf);
        assert_eq!(buf, "caf\u{00E9}");
    }

    #[test]
    fn char_len_counts_scalars() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("\u{00E9}t\u{00E9}"), 3);
    }
}
