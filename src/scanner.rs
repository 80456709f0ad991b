//! Backward scan that isolates the trailing trigger token.
//!
//! Given the text immediately preceding the caret, [`scan`] walks from the
//! last character toward the first and returns the maximal trailing token
//! that starts with a trigger prefix (`/` or `#`). The walk stops at the
//! rightmost prefix character, inclusive; everything left of it is ignored.
//! If no prefix character is found the result is the empty string, the
//! defined "no trigger present" outcome.
//!
//! Pure and deterministic; the returned token borrows from the input.

/// The two characters a trigger token may start with.
pub const TRIGGER_PREFIXES: [char; 2] = ['/', '#'];

/// Returns true for `/` and `#`.
pub fn is_trigger_prefix(c: char) -> bool {
    TRIGGER_PREFIXES.contains(&c)
}

/// Extracts the trailing trigger token from the text before the caret.
///
/// Returns the suffix starting at the rightmost `/` or `#`, or `""` when the
/// input contains neither.
///
/// # Examples
///
/// ```
/// use snipkit::scanner::scan;
///
/// assert_eq!(scan("hello /sig"), "/sig");
/// assert_eq!(scan("a#b/c"), "/c");
/// assert_eq!(scan("no trigger here"), "");
/// ```
pub fn scan(text_before_cursor: &str) -> &str {
    scan_within(text_before_cursor, usize::MAX)
}

/// Like [`scan`] but inspects at most `max_chars` trailing characters.
///
/// A prefix character sitting further back than the window is not found;
/// dispatch uses this to bound per-keystroke work on large documents.
pub fn scan_within(text_before_cursor: &str, max_chars: usize) -> &str {
    for (scanned, (idx, c)) in text_before_cursor.char_indices().rev().enumerate() {
        if scanned >= max_chars {
            break;
        }
        if is_trigger_prefix(c) {
            return &text_before_cursor[idx..];
        }
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_token() {
        assert_eq!(scan(""), "");
    }

    #[test]
    fn test_no_prefix_yields_empty_token() {
        assert_eq!(scan("plain words only"), "");
        assert_eq!(scan("punctuation!? ;:"), "");
    }

    #[test]
    fn test_bare_prefix_is_returned() {
        assert_eq!(scan("/"), "/");
        assert_eq!(scan("#"), "#");
    }

    #[test]
    fn test_trailing_token_after_text() {
        assert_eq!(scan("hello /sig"), "/sig");
        assert_eq!(scan("note #todo"), "#todo");
    }

    #[test]
    fn test_rightmost_prefix_bounds_the_token() {
        assert_eq!(scan("/a /b"), "/b");
        assert_eq!(scan("#x/y"), "/y");
        assert_eq!(scan("a/b#c"), "#c");
    }

    #[test]
    fn test_token_includes_trailing_whitespace() {
        // The scan has no word-boundary notion beyond the prefixes; a space
        // typed after the token becomes part of the candidate and simply
        // never matches a stored trigger.
        assert_eq!(scan("hi /sig "), "/sig ");
    }

    #[test]
    fn test_token_is_suffix_of_input() {
        let input = "A/mid and then #tail";
        let token = scan(input);
        assert!(input.ends_with(token));
        assert_eq!(token, "#tail");
    }

    #[test]
    fn test_multibyte_text_before_prefix() {
        assert_eq!(scan("héllo wörld /café"), "/café");
        assert_eq!(scan("日本語 #メモ"), "#メモ");
    }

    #[test]
    fn test_scan_within_caps_the_window() {
        // "/sig" is 4 chars from the end; a 3-char window misses the prefix.
        assert_eq!(scan_within("hello /sig", 3), "");
        assert_eq!(scan_within("hello /sig", 4), "/sig");
        assert_eq!(scan_within("hello /sig", 100), "/sig");
    }

    #[test]
    fn test_scan_within_zero_window() {
        assert_eq!(scan_within("/sig", 0), "");
    }
}
