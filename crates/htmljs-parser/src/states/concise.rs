//! The concise, indentation-delimited surface syntax. This is the root
//! state: every line's leading whitespace decides which open tags close,
//! which tag becomes the parent, and what kind of construct the line is.

use crate::char_classes::is_whitespace;
use crate::errors::ErrorCode;
use crate::handler::{BodyMode, TokenHandler};
use crate::parser::Parser;
use crate::range::Range;
use crate::states::{
    BlockCommentFrame, ContentFrame, ContentKind, ExprFrame, ExprPurpose, Frame,
    LineCommentFrame, OpenTagFrame, NO_TERMS,
};

impl<'a, H: TokenHandler> Parser<'a, H> {
    pub(crate) fn concise_char(&mut self, code: u8) {
        if self.top_concise().statement_done {
            self.concise_statement_tail(code);
        } else {
            self.concise_line_start();
        }
    }

    pub(crate) fn concise_eol(&mut self) -> Option<bool> {
        self.top_concise().statement_done = false;
        Some(true)
    }

    /// After a tag ended mid-line with `;` or `]`, only whitespace and a
    /// trailing comment may follow.
    fn concise_statement_tail(&mut self, code: u8) {
        if is_whitespace(code) {
            return;
        }
        match code {
            b'/' if self.peek(1) == Some(b'/') => {
                self.enter(Frame::LineComment(LineCommentFrame {
                    start: self.pos,
                    emit: true,
                }));
                self.skip(1);
            }
            b'/' if self.peek(1) == Some(b'*') => {
                self.enter(Frame::BlockComment(BlockCommentFrame {
                    start: self.pos,
                    emit: true,
                    concise_line: true,
                    star: false,
                }));
                self.skip(1);
            }
            _ => self.error(
                self.pos,
                ErrorCode::InvalidCharacter,
                "A concise tag ended with \";\" can only be followed by a comment on the same line.",
            ),
        }
    }

    /// The first dispatched byte of a concise line. Measures the indent,
    /// applies the dedent-closing and indentation rules, and routes the
    /// line to the construct its first byte announces.
    fn concise_line_start(&mut self) {
        let line_start = self.pos;
        let indent_len = strspn!(self.data, b' ' | b'\t', line_start);
        let first = line_start + indent_len;

        if first >= self.max_pos {
            self.pos = self.max_pos;
            return;
        }
        if matches!(self.data[first], b'\n' | b'\r') {
            // Blank lines carry no structure. A lone carriage return (not
            // part of a CRLF pair) reaches this state as an ordinary byte
            // and is dropped here rather than replayed forever.
            if first != self.pos {
                self.resume_at(first);
            }
            return;
        }
        let first_byte = self.data[first];
        // The indent is measured; stand on the first content byte so any
        // diagnostic below points at it.
        self.pos = first;

        // Rule 1: dedent closes every tag at or beyond this indent.
        self.close_concise_tags_to_indent(indent_len, first);

        // Rules 2 through 5 against the remaining parent.
        let parent_body = match self.open_tags.last() {
            Some(parent) => {
                if !parent.allows_body {
                    let name = self.slice_lossy(parent.name);
                    self.error(
                        first,
                        ErrorCode::InvalidBody,
                        format!("The \"{}\" tag does not allow nested content.", name),
                    );
                    return;
                }
                let body = parent.body;
                if matches!(body, BodyMode::ParsedText | BodyMode::StaticText)
                    && first_byte != b'-'
                {
                    self.error(
                        first,
                        ErrorCode::IllegalLineStart,
                        "Lines within a text block must start with \"-\".",
                    );
                    return;
                }
                match parent.nested_indent {
                    None => {
                        self.open_tags
                            .last_mut()
                            .expect("parent tag present")
                            .nested_indent = Some(Range::new(line_start, first));
                    }
                    Some(canonical) => {
                        if canonical.of(self.data) != &self.data[line_start..first] {
                            self.error(
                                first,
                                ErrorCode::BadIndentation,
                                "Line indentation does not match its siblings.",
                            );
                            return;
                        }
                    }
                }
                body
            }
            None => {
                if indent_len > 0 {
                    self.error(
                        first,
                        ErrorCode::BadIndentation,
                        "Line is indented but has no parent tag.",
                    );
                    return;
                }
                BodyMode::Html
            }
        };

        // Rule 6: dispatch on the first byte.
        if matches!(parent_body, BodyMode::ParsedText | BodyMode::StaticText) {
            self.begin_text_block_line(first, parent_body);
            return;
        }
        match first_byte {
            b'<' => {
                self.enter(Frame::Content(ContentFrame::new(ContentKind::Mixed)));
                self.resume_at(first);
            }
            b'$' if self.byte_at(first + 1).is_some_and(is_whitespace) => {
                self.begin_inline_script(first);
            }
            b'-' => self.begin_block_delimiter_line(first),
            b'/' if self.byte_at(first + 1) == Some(b'/') => {
                self.enter(Frame::LineComment(LineCommentFrame {
                    start: first,
                    emit: true,
                }));
                self.resume_at(first + 2);
            }
            b'/' if self.byte_at(first + 1) == Some(b'*') => {
                self.enter(Frame::BlockComment(BlockCommentFrame {
                    start: first,
                    emit: true,
                    concise_line: true,
                    star: false,
                }));
                self.resume_at(first + 2);
            }
            b';' | b']' | b')' | b'}' => {
                self.error(
                    first,
                    ErrorCode::InvalidCharacter,
                    format!("A line cannot start with \"{}\".", first_byte as char),
                );
            }
            _ => {
                self.enter(Frame::OpenTag(Box::new(OpenTagFrame::new(
                    first,
                    true,
                    Range::new(line_start, first),
                ))));
                self.resume_at(first);
            }
        }
    }

    /// A `- text` line inside a parsed-text or static-text body. The dash
    /// and one following space are the marker, not content.
    fn begin_text_block_line(&mut self, first: usize, body: BodyMode) {
        let mut text_start = first + 1;
        if self.byte_at(text_start) == Some(b' ') {
            text_start += 1;
        }
        self.enter(Frame::Content(ContentFrame::new(ContentKind::Line {
            placeholders: body == BodyMode::ParsedText,
        })));
        self.resume_at(text_start);
    }

    /// `$ statement` or `$ { block }`.
    fn begin_inline_script(&mut self, dollar: usize) {
        let script_start = self.past_whitespace(dollar + 1);
        self.enter(Frame::Expression(Box::new(
            ExprFrame::new(
                script_start,
                ExprPurpose::InlineScript { dollar },
                NO_TERMS,
            )
            .eol_terminated(true)
            .concise_mode(true),
        )));
        self.resume_at(script_start);
    }

    /// A line starting with `-`: a `--` block or line of body text, or an
    /// illegal single dash.
    fn begin_block_delimiter_line(&mut self, first: usize) {
        let run = strspn!(self.data, b'-', first);
        let after = first + run;
        let delimiter = run >= 2
            && (after >= self.max_pos
                || is_whitespace(self.data[after])
                || matches!(self.data[after], b'\n' | b'\r'));
        if !delimiter {
            self.error(
                first,
                ErrorCode::IllegalLineStart,
                "A line cannot start with \"-\" unless it is part of a \"--\" text block.",
            );
            return;
        }
        let text_start = self.past_whitespace(after);
        if text_start >= self.max_pos || matches!(self.data[text_start], b'\n' | b'\r') {
            // Bare delimiter: everything until a line holding the same
            // delimiter is HTML content.
            self.enter(Frame::Content(ContentFrame::new(ContentKind::Delimited {
                delim_len: run,
            })));
        } else {
            self.enter(Frame::Content(ContentFrame::new(ContentKind::Line {
                placeholders: true,
            })));
        }
        self.resume_at(text_start);
    }

    /// Close every open concise tag whose indent is at or beyond the
    /// current line's, emitting zero-width close events just before the
    /// line's first content byte.
    pub(crate) fn close_concise_tags_to_indent(&mut self, indent_len: usize, at: usize) {
        while let Some(tag) = self.open_tags.last() {
            if tag.indent_len < indent_len {
                break;
            }
            let tag = self.open_tags.pop().expect("checked non-empty");
            if tag.allows_body {
                self.emit_close_tag(at, at, tag.name);
            }
        }
    }

    pub(crate) fn byte_at(&self, at: usize) -> Option<u8> {
        self.data.get(at).copied()
    }
}
