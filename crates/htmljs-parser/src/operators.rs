//! Operator continuation rules for embedded expressions.
//!
//! When an expression that may be terminated by whitespace reaches a
//! whitespace byte at bracket depth zero, the decision whether the
//! expression continues is made here. Two checks run in order, anchored at
//! the current position:
//!
//!  - lookahead: whitespace, then a continuation operator, then optional
//!    trailing whitespace. A match means the parser jumps past the matched
//!    text and keeps scanning.
//!  - lookbehind: the bytes immediately before the whitespace end in a
//!    binary or unary-prefix operator. A match consumes only the whitespace
//!    run, leaving the next operand to be scanned normally.
//!
//! The rules differ slightly between the verbose and concise surface
//! syntaxes, mostly because `>` closes tags in verbose mode and because
//! concise expressions must not run across line endings.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::char_classes::{is_whitespace, is_word};

/// Outcome of consulting the continuation rules at a whitespace byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Continuation {
    /// Lookahead matched; resume scanning at this absolute offset.
    Operator { resume: usize },
    /// Lookbehind matched; the whitespace run ends at this absolute offset
    /// and the byte there starts the next operand.
    Trailing { after_ws: usize },
    /// Neither matched; the expression ends at the whitespace.
    End,
}

/// Words that continue an expression when they appear after whitespace.
fn lookahead_words() -> &'static FxHashSet<&'static [u8]> {
    static WORDS: OnceLock<FxHashSet<&'static [u8]>> = OnceLock::new();
    WORDS.get_or_init(|| [b"in".as_slice(), b"instanceof"].into_iter().collect())
}

/// Words that continue an expression when the text before the whitespace
/// ends in them: unary prefixes plus the binary word operators.
fn lookbehind_words() -> &'static FxHashSet<&'static [u8]> {
    static WORDS: OnceLock<FxHashSet<&'static [u8]>> = OnceLock::new();
    WORDS.get_or_init(|| {
        [
            b"async".as_slice(),
            b"await",
            b"class",
            b"function",
            b"in",
            b"instanceof",
            b"new",
            b"typeof",
            b"void",
        ]
        .into_iter()
        .collect()
    })
}

/// Bytes that end a word operator's usefulness: if one of these directly
/// follows `in`/`instanceof`, the word is a fragment of the surrounding
/// syntax rather than an operator.
fn is_terminator_like(code: u8) -> bool {
    matches!(code, b',' | b';' | b']' | b')' | b'}' | b'>' | b'=')
}

/// Whitespace for continuation purposes. Verbose expressions may continue
/// across line endings; concise expressions never do.
fn is_continuation_ws(code: u8, concise: bool) -> bool {
    is_whitespace(code) || (!concise && matches!(code, b'\n' | b'\r'))
}

fn span_ws(data: &[u8], mut at: usize, concise: bool) -> usize {
    let from = at;
    while at < data.len() && is_continuation_ws(data[at], concise) {
        at += 1;
    }
    at - from
}

/// Consult the continuation rules. `pos` is a whitespace byte at depth zero
/// inside an expression that began at `expr_start`.
pub(crate) fn continuation(data: &[u8], pos: usize, expr_start: usize, concise: bool) -> Continuation {
    let ws = span_ws(data, pos, concise);
    let at = pos + ws;

    if let Some(op_end) = match_operator(data, at, concise) {
        if op_end == at {
            // Whitespace followed by an opening bracket: the bracket itself
            // must still be scanned so that it opens a group.
            return Continuation::Operator { resume: at };
        }
        let trailing = span_ws(data, op_end, concise);
        return Continuation::Operator {
            resume: op_end + trailing,
        };
    }

    if pos > expr_start && lookbehind_matches(data, pos, expr_start) {
        return Continuation::Trailing { after_ws: at };
    }

    Continuation::End
}

/// Try to match a continuation operator at `at`. Returns the offset just
/// past the operator, or `at` itself for the zero-width bracket rule.
fn match_operator(data: &[u8], at: usize, concise: bool) -> Option<usize> {
    let &first = data.get(at)?;
    let next = data.get(at + 1).copied();

    match first {
        b'*' | b'%' | b'<' | b'&' | b'^' | b'|' | b'?' | b':' => Some(at + 1),

        b'>' if concise => Some(at + 1),
        b'>' => match next {
            Some(b'=') | Some(b'>') => Some(at + 2),
            _ => None,
        },

        b'=' => match next {
            Some(b'=') | Some(b'>') => Some(at + 2),
            _ => None,
        },

        // Division, never the start of `//`, `/*`, or `/>`.
        b'/' => match next {
            Some(n) if is_word(n) || is_continuation_ws(n, concise) => Some(at + 1),
            _ => None,
        },

        // Member access only counts across whitespace.
        b'.' => match next {
            Some(n) if is_continuation_ws(n, concise) => Some(at + 1),
            _ => None,
        },

        b'+' => {
            let run = strspn!(data, b'+', at);
            Some(at + run)
        }

        b'-' if concise => match next {
            Some(b'-') => None,
            _ => Some(at + 1),
        },
        b'-' => {
            let run = strspn!(data, b'-', at);
            Some(at + run)
        }

        b'{' | b'(' => Some(at),
        b'[' if concise => Some(at),

        _ if first.is_ascii_lowercase() => {
            let len = strspn!(data, b if is_word(b), at);
            let word = &data[at..at + len];
            if !lookahead_words().contains(word) {
                return None;
            }
            match data.get(at + len) {
                Some(&n) if is_word(n) || is_terminator_like(n) => None,
                Some(_) => Some(at + len),
                None => None,
            }
        }

        _ => None,
    }
}

/// Whether the bytes immediately before `pos` end in an operator that keeps
/// the expression open across the whitespace.
fn lookbehind_matches(data: &[u8], pos: usize, expr_start: usize) -> bool {
    let last = data[pos - 1];

    match last {
        b'*' | b'%' | b'<' | b'>' | b'&' | b'^' | b'|' | b'?' | b':' | b'=' | b'/' | b'.'
        | b'!' => true,

        // `a +` continues; `a++` is a complete operand.
        b'+' | b'-' => pos - 1 == expr_start || data[pos - 2] != last,

        _ if is_word(last) => {
            let mut from = pos;
            while from > expr_start && is_word(data[from - 1]) {
                from -= 1;
            }
            lookbehind_words().contains(&data[from..pos])
        }

        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn check(src: &[u8], pos: usize, concise: bool) -> Continuation {
        continuation(src, pos, 0, concise)
    }

    #[test]
    fn binary_operator_across_whitespace() {
        // `1 + 2`: the run from the first space through the space after `+`
        // is consumed and scanning resumes at `2`.
        assert_eq!(check(b"1 + 2", 1, false), Continuation::Operator { resume: 4 });
        assert_eq!(check(b"1 + 2", 1, true), Continuation::Operator { resume: 4 });
    }

    #[test]
    fn operand_after_operand_ends_expression() {
        assert_eq!(check(b"1 2", 1, false), Continuation::End);
        assert_eq!(check(b"foo bar", 3, true), Continuation::End);
    }

    #[test]
    fn trailing_operator_lookbehind() {
        // `x+ 2`: nothing ahead, but the text ends in `+`.
        assert_eq!(check(b"x+ 2", 2, false), Continuation::Trailing { after_ws: 3 });
        // `x++ 2`: post-increment is a complete operand.
        assert_eq!(check(b"x++ 2", 3, false), Continuation::End);
    }

    #[test]
    fn word_operators() {
        assert_eq!(check(b"x in y", 1, false), Continuation::Operator { resume: 5 });
        assert_eq!(check(b"x index", 1, false), Continuation::End);
        assert_eq!(check(b"typeof x", 6, false), Continuation::Trailing { after_ws: 7 });
    }

    #[test]
    fn division_never_opens_a_comment() {
        assert_eq!(check(b"a / b", 1, false), Continuation::Operator { resume: 4 });
        assert_eq!(check(b"a //b", 1, false), Continuation::End);
        assert_eq!(check(b"a />", 1, false), Continuation::End);
    }

    #[test]
    fn angle_bracket_rules_differ_by_mode() {
        assert_eq!(check(b"a > b", 1, true), Continuation::Operator { resume: 4 });
        assert_eq!(check(b"a > b", 1, false), Continuation::End);
        assert_eq!(check(b"a >= b", 1, false), Continuation::Operator { resume: 5 });
    }

    #[test]
    fn bracket_peek_is_zero_width() {
        // The `(` itself is left for the expression to scan as a group.
        assert_eq!(check(b"a (b)", 1, false), Continuation::Operator { resume: 2 });
        assert_eq!(check(b"a [b]", 1, true), Continuation::Operator { resume: 2 });
        assert_eq!(check(b"a [b]", 1, false), Continuation::End);
    }

    #[test]
    fn concise_minus_requires_single_dash() {
        assert_eq!(check(b"a - b", 1, true), Continuation::Operator { resume: 4 });
        assert_eq!(check(b"a -- b", 1, true), Continuation::End);
    }

    #[test]
    fn newlines_count_as_whitespace_only_in_verbose_mode() {
        assert_eq!(check(b"a\n+ b", 1, false), Continuation::Operator { resume: 4 });
        assert_eq!(check(b"a \n+ b", 1, true), Continuation::End);
    }
}
