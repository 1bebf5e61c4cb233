//! Verbose HTML content regions.
//!
//! Four flavors share this state: the mixed-mode region a concise line
//! opens with `<`, the `--` delimited block, single-line body text, and the
//! parsed/static-text body of a tag. Text accumulates lazily; anything that
//! interrupts it flushes the pending range first.

use crate::char_classes::can_start_tag_name;
use crate::errors::ErrorCode;
use crate::handler::TokenHandler;
use crate::parser::Parser;
use crate::range::Range;
use crate::states::{ContentKind, ExprFrame, ExprPurpose, Frame, OpenTagFrame, RBRACE_TERM};

impl<'a, H: TokenHandler> Parser<'a, H> {
    pub(crate) fn content_char(&mut self, code: u8) {
        match code {
            b'<' if self.top_content_ref().allows_tags() => self.content_open_angle(),
            b'<' if matches!(self.top_content_ref().kind, ContentKind::Body { .. }) => {
                self.body_close_or_text()
            }
            b'$' if self.top_content_ref().allows_placeholders() => {
                if !self.try_placeholder() {
                    self.note_text();
                }
            }
            _ => self.note_text(),
        }
    }

    pub(crate) fn content_eol(&mut self, eol_len: usize) -> Option<bool> {
        match self.top_content_ref().kind {
            ContentKind::Line { .. } => {
                self.flush_content_text(self.pos);
                self.pop_frame();
                None
            }
            ContentKind::Mixed => {
                if self.top_content().open_depth == 0 {
                    self.flush_content_text(self.pos);
                    self.pop_frame();
                    None
                } else {
                    self.note_text();
                    Some(true)
                }
            }
            ContentKind::Delimited { delim_len } => {
                if let Some(after) = self.delimiter_line_end(self.pos + eol_len, delim_len) {
                    self.flush_content_text(self.pos);
                    self.pop_frame();
                    if after >= self.max_pos {
                        self.pos = self.max_pos;
                    } else {
                        self.pos = after;
                    }
                    Some(false)
                } else {
                    self.note_text();
                    Some(true)
                }
            }
            ContentKind::Body { .. } => {
                self.note_text();
                Some(true)
            }
        }
    }

    /// Whether the line starting at `from` holds exactly the closing
    /// delimiter. Returns the offset of that line's terminator.
    fn delimiter_line_end(&self, from: usize, delim_len: usize) -> Option<usize> {
        let at = self.past_whitespace(from);
        let run = strspn!(self.data, b'-', at);
        if run != delim_len {
            return None;
        }
        let rest = self.past_whitespace(at + run);
        if rest >= self.max_pos || matches!(self.data[rest], b'\n' | b'\r') {
            Some(rest)
        } else {
            None
        }
    }

    /// `<` in a region where tags are recognized.
    fn content_open_angle(&mut self) {
        match self.peek(1) {
            Some(b'/') => self.parse_close_tag(),
            Some(b'!') => self.parse_markup_declaration(),
            Some(b'?') => self.parse_scriptlet_tag(),
            Some(code) if can_start_tag_name(code) => {
                self.flush_content_text(self.pos);
                if self.halted {
                    return;
                }
                self.enter(Frame::OpenTag(Box::new(OpenTagFrame::new(
                    self.pos,
                    false,
                    Range::new(self.pos, self.pos),
                ))));
            }
            // `<3` and friends render as text.
            _ => self.note_text(),
        }
    }

    /// `</name>` in a tag-recognizing region.
    fn parse_close_tag(&mut self) {
        let start = self.pos;
        let gt = start + 2 + strcspn!(self.data, b'>', start + 2);
        if gt >= self.max_pos {
            self.pos = self.max_pos;
            self.error(
                start,
                ErrorCode::MalformedOpenTag,
                "Missing \">\" to end the closing tag.",
            );
            return;
        }
        self.flush_content_text(start);
        let name = self.trim_range(Range::new(start + 2, gt));
        self.emit_close_tag(start, gt + 1, name);
        let content = self.top_content();
        content.open_depth = content.open_depth.saturating_sub(1);
        self.resume_at(gt + 1);
    }

    /// `<` inside a parsed/static-text body: only the body's own closing
    /// tag (or `</>`) ends it, everything else is text.
    fn body_close_or_text(&mut self) {
        let ContentKind::Body { tag_name, .. } = self.top_content_ref().kind else {
            unreachable!("expected body content")
        };
        let Some((end, name)) = self.body_close_len(tag_name) else {
            self.note_text();
            return;
        };
        let start = self.pos;
        self.flush_content_text(start);
        self.emit_close_tag(start, end, name);
        self.pop_frame();
        self.resume_at(end);
    }

    /// `${…}` or `$!{…}`. Returns false when the `$` is plain text.
    pub(crate) fn try_placeholder(&mut self) -> bool {
        let (escape, inner) = match self.peek(1) {
            Some(b'{') => (true, self.pos + 2),
            Some(b'!') if self.peek(2) == Some(b'{') => (false, self.pos + 3),
            _ => return false,
        };
        self.flush_content_text(self.pos);
        if self.halted {
            return true;
        }
        self.enter(Frame::Expression(Box::new(
            ExprFrame::new(
                inner,
                ExprPurpose::Placeholder {
                    dollar: self.pos,
                    escape,
                },
                RBRACE_TERM,
            )
            .consuming(),
        )));
        self.resume_at(inner);
        true
    }

    pub(crate) fn note_text(&mut self) {
        let at = self.pos;
        let content = self.top_content();
        if content.text_start.is_none() {
            content.text_start = Some(at);
        }
    }

    /// Emit any pending text up to `end` and reset the accumulator.
    pub(crate) fn flush_content_text(&mut self, end: usize) {
        let started = self.top_content().text_start.take();
        if let Some(start) = started {
            self.emit_text(start, end);
        }
    }

    pub(crate) fn find_byte(&self, needle: u8, from: usize) -> Option<usize> {
        if from >= self.max_pos {
            return None;
        }
        memchr::memchr(needle, &self.data[from..]).map(|at| from + at)
    }
}
