//! # Text Processing Utilities
//!
//! Case-insensitive substring search that reports byte ranges on the original
//! text, so callers can highlight the match without re-encoding anything.

use std::ops::Range;

/// Lower-cases one char for matching. Final sigma folds to `σ` so a word
/// matches itself whichever form it was typed in.
fn fold_char(ch: char) -> impl Iterator<Item = char> {
    ch.to_lowercase().map(|lower| if lower == 'ς' { 'σ' } else { lower })
}

/// Case-folds `text` the same way `find_case_insensitive` compares it.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

/// Finds the first case-insensitive occurrence of `needle` in `haystack`.
///
/// The returned range indexes `haystack` and always falls on char
/// boundaries. Both sides are folded per char with `fold_case` rules. An empty needle never
/// produces a range.
///
/// # Example
/// ```rust
/// use guidekit_util::find_case_insensitive;
///
/// assert_eq!(find_case_insensitive("Date Picker", "pick"), Some(5..9));
/// assert_eq!(find_case_insensitive("Date Picker", "grid"), None);
/// ```
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    let needle: Vec<char> = needle.chars().flat_map(fold_char).collect();

    for (start, _) in haystack.char_indices() {
        let mut matched = 0;
        for (offset, ch) in haystack[start..].char_indices() {
            let mut complete = true;
            for lower in fold_char(ch) {
                if matched < needle.len() && needle[matched] == lower {
                    matched += 1;
                } else {
                    complete = false;
                    break;
                }
            }
            if !complete {
                break;
            }
            if matched == needle.len() {
                return Some(start..start + offset + ch.len_utf8());
            }
        }
    }
    None
}

/// True when `needle` is empty or occurs in `haystack` ignoring case.
pub fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || find_case_insensitive(haystack, needle).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_mixed_case_matches() {
        assert_eq!(find_case_insensitive("Colors", "colors"), Some(0..6));
        assert_eq!(find_case_insensitive("Badge COLORS", "Colors"), Some(6..12));
        assert_eq!(find_case_insensitive("Badge", "badges"), None);
    }

    #[test]
    fn ranges_fall_on_char_boundaries() {
        let text = "Überblick Ämter";
        let range = find_case_insensitive(text, "ämt").unwrap();
        assert_eq!(&text[range], "Ämt");
    }

    #[test]
    fn final_sigma_matches_either_form() {
        assert_eq!(find_case_insensitive("ΟΔΟΣ", "ΟΔΟΣ"), Some(0.."ΟΔΟΣ".len()));
        assert!(contains_case_insensitive("οδος", "ΟΔΟΣ"));
        assert!(contains_case_insensitive("ΟΔΟΣ", &"ΟΔΟΣ".to_lowercase()));
        assert_eq!(fold_case("ΟΔΟΣ"), "οδοσ");
    }

    #[test]
    fn empty_needle_semantics() {
        assert_eq!(find_case_insensitive("anything", ""), None);
        assert!(contains_case_insensitive("anything", ""));
        assert!(!contains_case_insensitive("", "a"));
    }
}
