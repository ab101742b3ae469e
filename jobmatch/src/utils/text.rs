//! Text normalisation helpers shared by the extractors and classifier.

use std::collections::HashSet;

/// Length in characters, not bytes. CJK fragments are measured the same way
/// as Latin ones.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Collapses every run of whitespace into a single space and trims the ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns at most `max_chars` characters of `text`, for log previews.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Removes exact duplicates, keeps discovery order, and stops at `cap` items.
#[must_use]
pub fn dedup_preserving_order<I>(items: I, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if out.len() >= cap {
            break;
        }
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_cjk_as_single_chars() {
        assert_eq!(char_len("負責開發"), 4);
        assert_eq!(char_len("abc"), 3);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Backend \n\t Engineer "), "Backend Engineer");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("負責開發系統", 2), "負責");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_dedup_preserving_order_caps_after_dedup() {
        let items = vec!["a", "b", "a", "c", "b", "d"]
            .into_iter()
            .map(String::from);
        assert_eq!(dedup_preserving_order(items, 3), vec!["a", "b", "c"]);
    }
}
