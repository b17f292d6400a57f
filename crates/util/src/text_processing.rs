//! # Text Processing Utilities
//!
//! Case-insensitive substring matching used by the sidebar filter and its
//! match highlighting, plus display-width aware truncation for excerpts.

use std::ops::Range;

use unicode_width::UnicodeWidthChar;

/// Ellipsis appended by [`truncate_to_width`] when text is cut.
pub const ELLIPSIS: char = '…';

/// Returns `true` when `needle` occurs in `hay`, ignoring case.
///
/// An empty needle matches everything. Case folding is the per-`char` one of
/// [`match_ranges_ignore_case`], so every non-empty match has a range to
/// highlight.
///
/// # Example
/// ```rust
/// use docent_util::contains_ignore_case;
///
/// assert!(contains_ignore_case("Overview", "over"));
/// assert!(!contains_ignore_case("Overview", "under"));
/// ```
pub fn contains_ignore_case(hay: &str, needle: &str) -> bool {
    needle.is_empty() || !match_ranges_ignore_case(hay, needle).is_empty()
}

/// Byte ranges in `hay` where `needle` occurs, ignoring case.
///
/// Matching is done per `char`, so the returned ranges always fall on UTF-8
/// boundaries of the original string even when lowercasing would change
/// byte lengths. Matches do not overlap.
pub fn match_ranges_ignore_case(hay: &str, needle: &str) -> Vec<Range<usize>> {
    let needle_chars: Vec<char> = needle.chars().collect();
    if needle_chars.is_empty() {
        return Vec::new();
    }

    let hay_chars: Vec<(usize, char)> = hay.char_indices().collect();
    let mut ranges = Vec::new();
    let mut start = 0;
    while start + needle_chars.len() <= hay_chars.len() {
        let window = &hay_chars[start..start + needle_chars.len()];
        let is_match = window
            .iter()
            .zip(needle_chars.iter())
            .all(|((_, h), n)| chars_eq_ignore_case(*h, *n));
        if is_match {
            let begin = window[0].0;
            let last = window[window.len() - 1];
            ranges.push(begin..last.0 + last.1.len_utf8());
            start += needle_chars.len();
        } else {
            start += 1;
        }
    }
    ranges
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Truncates `text` to at most `max_columns` display columns.
///
/// Whitespace runs are collapsed to single spaces first. When the text does
/// not fit, the last column is replaced by [`ELLIPSIS`].
pub fn truncate_to_width(text: &str, max_columns: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let total: usize = collapsed.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_columns {
        return collapsed;
    }
    if max_columns == 0 {
        return String::new();
    }

    let budget = max_columns - 1;
    let mut used = 0;
    let mut out = String::with_capacity(collapsed.len());
    for ch in collapsed.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(ch);
    }
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_ignore_case_matches_substrings() {
        assert!(contains_ignore_case("Overview", "over"));
        assert!(contains_ignore_case("Overview", "VIEW"));
        assert!(contains_ignore_case("Overview", ""));
        assert!(!contains_ignore_case("Overview", "review "));
    }

    #[test]
    fn contains_agrees_with_highlight_ranges() {
        // 'İ' lowercases to two chars, so whole-string folding would find an
        // "i" that no per-char range covers.
        assert!(!contains_ignore_case("İstanbul", "i"));
        assert!(contains_ignore_case("İstanbul", "İST"));
        for (hay, needle) in [("İstanbul", "i"), ("İstanbul", "ist"), ("Straße", "SS"), ("Team Chat", "CHAT")] {
            assert_eq!(
                contains_ignore_case(hay, needle),
                !match_ranges_ignore_case(hay, needle).is_empty(),
                "{hay:?} / {needle:?}"
            );
        }
    }

    #[test]
    fn match_ranges_report_every_occurrence() {
        let ranges = match_ranges_ignore_case("Team Chat and team goals", "team");
        assert_eq!(ranges, vec![0..4, 14..18]);
    }

    #[test]
    fn match_ranges_stay_on_char_boundaries() {
        let hay = "Équipe équipe";
        let ranges = match_ranges_ignore_case(hay, "ÉQUIPE");
        assert_eq!(ranges.len(), 2);
        for range in ranges {
            assert!(hay.is_char_boundary(range.start));
            assert!(hay.is_char_boundary(range.end));
            assert!(hay[range].to_lowercase() == "équipe");
        }
    }

    #[test]
    fn match_ranges_empty_needle_yields_nothing() {
        assert!(match_ranges_ignore_case("anything", "").is_empty());
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("short  text", 20), "short text");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        let out = truncate_to_width("Create and manage subaccounts", 12);
        assert_eq!(out, "Create and…");
        assert!(out.chars().count() <= 12);
    }

    #[test]
    fn truncate_zero_width_is_empty() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
