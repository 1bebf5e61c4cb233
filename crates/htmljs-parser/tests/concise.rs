//! Concise (indentation-delimited) syntax: nesting, dedent closing,
//! indentation errors, inline text, comments, scriptlets, and mixed mode.

mod common;

use common::{record, record_with};
use pretty_assertions::assert_eq;

#[test]
fn nested_tags_with_inline_text() {
    assert_eq!(
        record(b"div\n  span hello"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "tag_name \"span\"",
            "open_tag \"span\" concise",
            "text \"hello\"",
            "close_tag \"span\"",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn siblings_close_at_equal_indent() {
    assert_eq!(
        record(b"div\n  a\n  b"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "tag_name \"a\"",
            "open_tag \"a\" concise",
            "close_tag \"a\"",
            "tag_name \"b\"",
            "open_tag \"b\" concise",
            "close_tag \"b\"",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn sibling_indent_mismatch_is_bad_indentation() {
    assert_eq!(
        record(b"div\n  a\n b"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "tag_name \"a\"",
            "open_tag \"a\" concise",
            "close_tag \"a\"",
            "error BAD_INDENTATION",
        ]
    );
}

#[test]
fn tabs_and_spaces_must_match_byte_for_byte() {
    assert_eq!(
        record(b"div\n\ta\n b"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "tag_name \"a\"",
            "open_tag \"a\" concise",
            "close_tag \"a\"",
            "error BAD_INDENTATION",
        ]
    );
}

#[test]
fn indent_without_parent_is_bad_indentation() {
    assert_eq!(record(b" div"), vec!["error BAD_INDENTATION"]);
}

#[test]
fn blank_lines_are_ignored() {
    assert_eq!(
        record(b"div\n\n  \n  span hello"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "tag_name \"span\"",
            "open_tag \"span\" concise",
            "text \"hello\"",
            "close_tag \"span\"",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn crlf_line_endings() {
    assert_eq!(
        record(b"div\r\n  span hello"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "tag_name \"span\"",
            "open_tag \"span\" concise",
            "text \"hello\"",
            "close_tag \"span\"",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn concise_attributes() {
    assert_eq!(
        record(b"input type=checkbox checked=true"),
        vec![
            "tag_name \"input\"",
            "attr_name \"type\"",
            "attr_value \"checkbox\"",
            "attr_name \"checked\"",
            "attr_value \"true\"",
            "open_tag \"input\" concise",
            "close_tag \"input\"",
        ]
    );
}

#[test]
fn concise_value_ends_at_line_ending() {
    assert_eq!(
        record(b"div class=a + b\nspan"),
        vec![
            "tag_name \"div\"",
            "attr_name \"class\"",
            "attr_value \"a + b\"",
            "open_tag \"div\" concise",
            "close_tag \"div\"",
            "tag_name \"span\"",
            "open_tag \"span\" concise",
            "close_tag \"span\"",
        ]
    );
}

#[test]
fn semicolon_ends_tag_and_allows_comment() {
    assert_eq!(
        record(b"div; // done"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "comment \" done\"",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn content_after_semicolon_is_an_error() {
    assert_eq!(
        record(b"div; x"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "error INVALID_CHARACTER",
        ]
    );
}

#[test]
fn bracketed_attribute_segment() {
    assert_eq!(
        record(b"div [ class=a disabled ]"),
        vec![
            "tag_name \"div\"",
            "attr_name \"class\"",
            "attr_value \"a\"",
            "attr_name \"disabled\"",
            "open_tag \"div\" concise",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn bracketed_attribute_segment_spans_lines() {
    assert_eq!(
        record(b"div [\n  class=a\n  id=b\n]"),
        vec![
            "tag_name \"div\"",
            "attr_name \"class\"",
            "attr_value \"a\"",
            "attr_name \"id\"",
            "attr_value \"b\"",
            "open_tag \"div\" concise",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn inline_script_statement() {
    assert_eq!(
        record(b"$ const x = 1;"),
        vec!["scriptlet \"const x = 1;\""]
    );
}

#[test]
fn inline_script_block() {
    assert_eq!(record(b"$ { foo(); }"), vec!["scriptlet \"foo();\" block"]);
}

#[test]
fn line_comment() {
    assert_eq!(record(b"// hello"), vec!["comment \" hello\""]);
}

#[test]
fn block_comment() {
    assert_eq!(record(b"/* hi */"), vec!["comment \" hi \""]);
}

#[test]
fn block_comment_must_end_its_line() {
    assert_eq!(
        record(b"/* hi */ div"),
        vec!["comment \" hi \"", "error INVALID_CHARACTER"]
    );
}

#[test]
fn delimited_html_block() {
    assert_eq!(
        record(b"div\n  --\n  <b>x</b>\n  --\nspan"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "text \"\\n  \"",
            "tag_name \"b\"",
            "open_tag \"b\"",
            "text \"x\"",
            "close_tag \"b\"",
            "close_tag \"div\"",
            "tag_name \"span\"",
            "open_tag \"span\" concise",
            "close_tag \"span\"",
        ]
    );
}

#[test]
fn inline_text_after_dashes() {
    assert_eq!(
        record(b"h1 -- Hello ${name}"),
        vec![
            "tag_name \"h1\"",
            "open_tag \"h1\" concise",
            "text \"Hello \"",
            "placeholder \"name\"",
            "close_tag \"h1\"",
        ]
    );
}

#[test]
fn single_dash_line_is_illegal_outside_text_bodies() {
    assert_eq!(
        record(b"div\n  - x"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "error ILLEGAL_LINE_START",
        ]
    );
}

#[test]
fn parsed_text_body_lines() {
    assert_eq!(
        record_with(b"script\n  - let x = 1;\n  - go()", &["script"], &[], &[]),
        vec![
            "tag_name \"script\"",
            "open_tag \"script\" concise",
            "text \"let x = 1;\"",
            "text \"go()\"",
            "close_tag \"script\"",
        ]
    );
}

#[test]
fn parsed_text_line_without_dash_is_illegal() {
    assert_eq!(
        record_with(b"script\n  let x = 1;", &["script"], &[], &[]),
        vec![
            "tag_name \"script\"",
            "open_tag \"script\" concise",
            "error ILLEGAL_LINE_START",
        ]
    );
}

#[test]
fn void_tag_rejects_children() {
    assert_eq!(
        record_with(b"br\n  x", &[], &[], &["br"]),
        vec![
            "tag_name \"br\"",
            "open_tag \"br\" concise open_only",
            "error INVALID_BODY",
        ]
    );
}

#[test]
fn self_closed_concise_tag_gets_no_close_event() {
    assert_eq!(
        record(b"img/\ndiv"),
        vec![
            "tag_name \"img\"",
            "open_tag \"img\" concise self_closed",
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn mixed_mode_line_returns_to_concise() {
    assert_eq!(
        record(b"div\n  <span>x</span>\n  b"),
        vec![
            "tag_name \"div\"",
            "open_tag \"div\" concise",
            "tag_name \"span\"",
            "open_tag \"span\"",
            "text \"x\"",
            "close_tag \"span\"",
            "tag_name \"b\"",
            "open_tag \"b\" concise",
            "close_tag \"b\"",
            "close_tag \"div\"",
        ]
    );
}

#[test]
fn sibling_tags_with_inline_text() {
    assert_eq!(
        record(b"ul\n  li a\n  li b"),
        vec![
            "tag_name \"ul\"",
            "open_tag \"ul\" concise",
            "tag_name \"li\"",
            "open_tag \"li\" concise",
            "text \"a\"",
            "close_tag \"li\"",
            "tag_name \"li\"",
            "open_tag \"li\" concise",
            "text \"b\"",
            "close_tag \"li\"",
            "close_tag \"ul\"",
        ]
    );
}
