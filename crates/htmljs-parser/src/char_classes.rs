//! Predicates over byte codes.
//!
//! The tokenizer only ever classifies single bytes. Multi-byte UTF-8
//! sequences fall through every predicate here and are carried as opaque
//! content, which keeps offsets byte-exact without decoding.

/// Horizontal whitespace. Line terminators are handled separately by the
/// driver loop so that states with end-of-line behavior see them as such.
pub fn is_whitespace(code: u8) -> bool {
    matches!(code, b' ' | b'\t' | 0x0c)
}

pub fn is_digit(code: u8) -> bool {
    code.is_ascii_digit()
}

/// Bytes that may appear in an identifier-like word, `$` and `_` included.
pub fn is_word(code: u8) -> bool {
    code.is_ascii_alphanumeric() || matches!(code, b'_' | b'$')
}

/// Bytes that may open a tag name after `<`. Anything else makes the `<`
/// plain text, the way `<3` is rendered rather than parsed.
pub fn can_start_tag_name(code: u8) -> bool {
    code.is_ascii_alphabetic() || matches!(code, b'$' | b'_' | b'@')
}

/// Whether a `/` immediately after a fragment ending in `code` is the
/// division operator rather than the start of a regular expression literal.
pub fn can_be_followed_by_division(code: u8) -> bool {
    is_word(code) || matches!(code, b'%' | b')' | b'.' | b'<' | b']' | b'}')
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn division_follows_operands_not_operators() {
        for code in [b'1', b'x', b')', b']', b'}', b'.'] {
            assert!(can_be_followed_by_division(code), "{:?}", code as char);
        }
        for code in [b'=', b'+', b'(', b',', b'&'] {
            assert!(!can_be_followed_by_division(code), "{:?}", code as char);
        }
    }

    #[test]
    fn whitespace_excludes_line_terminators() {
        assert!(is_whitespace(b' '));
        assert!(is_whitespace(b'\t'));
        assert!(!is_whitespace(b'\n'));
        assert!(!is_whitespace(b'\r'));
    }
}
