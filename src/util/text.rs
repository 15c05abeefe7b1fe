//! Character classification helpers shared by the parser, scanner and surface

use std::borrow::Cow;
use std::ops::Range;

/// Filler inserted after a mention token so the caret has a text position to land in.
/// Never part of the visible plain text.
pub const FILLER: char = '\u{200B}';

/// Zero-width characters stripped from visible text (space and joiner)
pub fn is_filler(ch: char) -> bool {
    matches!(ch, '\u{200B}' | '\u{200D}')
}

/// Remove zero-width fillers, borrowing when there are none
pub fn strip_fillers(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_filler) {
        Cow::Owned(text.chars().filter(|c| !is_filler(*c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Only whitespace ends a trigger query; punctuation and CJK text may follow a trigger directly
pub fn is_boundary(ch: char) -> bool {
    ch.is_whitespace()
}

/// Characters that can precede `@` in an email address
fn is_email_local_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')
}

/// Email heuristic for an `@` whose neighbours are `prev` and `next`.
///
/// `foo@bar` is treated as an address: the character before the `@` is
/// alphanumeric or one of `._-`, and the character right after it is alphanumeric.
pub fn looks_like_email(prev: Option<char>, next: Option<char>) -> bool {
    matches!(prev, Some(p) if is_email_local_char(p))
        && matches!(next, Some(n) if n.is_ascii_alphanumeric())
}

/// Number of chars in a string (all offsets in this crate are char offsets)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a char offset to a byte offset, clamping to the end of the string
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Slice by char range, clamping both ends
pub fn char_slice(text: &str, range: Range<usize>) -> &str {
    let start = char_to_byte(text, range.start);
    let end = char_to_byte(text, range.end.max(range.start));
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fillers() {
        assert_eq!(strip_fillers("a\u{200B}b"), "ab");
        assert!(matches!(strip_fillers("plain"), Cow::Borrowed(_)));
        assert_eq!(strip_fillers("\u{200D}\u{200B}"), "");
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email(Some('a'), Some('b')));
        assert!(looks_like_email(Some('.'), Some('9')));
        assert!(!looks_like_email(Some(' '), Some('b')));
        assert!(!looks_like_email(None, Some('b')));
        assert!(!looks_like_email(Some('a'), None));
        assert!(!looks_like_email(Some('a'), Some('.')));
    }

    #[test]
    fn test_boundary_is_whitespace_only() {
        assert!(is_boundary(' '));
        assert!(is_boundary('\n'));
        assert!(is_boundary('\u{3000}'));
        assert!(!is_boundary(','));
        assert!(!is_boundary('中'));
        assert!(!is_boundary(FILLER));
    }

    #[test]
    fn test_char_slice_utf8() {
        assert_eq!(char_slice("héllo", 1..3), "él");
        assert_eq!(char_slice("abc", 2..10), "c");
        assert_eq!(char_slice("abc", 5..10), "");
        assert_eq!(char_to_byte("héllo", 2), 3);
    }
}
