//! JS-style line and block comments. Inside expressions they are part of
//! the expression's text; at the start of a concise line they are reported
//! through the comment event.

use crate::char_classes::is_whitespace;
use crate::handler::TokenHandler;
use crate::parser::Parser;
use crate::range::{Range, ValueRange};
use crate::states::{ContentKind, Frame};

impl<'a, H: TokenHandler> Parser<'a, H> {
    pub(crate) fn line_comment_char(&mut self, code: u8) {
        // Inside a parsed-text body even a comment cannot hide the closing
        // tag: the close wins and everything between it and the comment is
        // abandoned.
        if code == b'<' && self.parsed_text_close_ahead() {
            while !matches!(self.stack.last(), Some(Frame::Content(_))) {
                self.pop_frame();
            }
            self.replay();
        }
    }

    pub(crate) fn line_comment_eol(&mut self) -> Option<bool> {
        self.finish_line_comment(self.pos);
        None
    }

    pub(crate) fn finish_line_comment(&mut self, end: usize) {
        let Frame::LineComment(comment) = self.pop_frame() else {
            unreachable!("expected line comment frame")
        };
        if comment.emit {
            self.emit_comment(ValueRange::new(
                comment.start,
                end,
                Range::new(comment.start + 2, end),
            ));
        }
    }

    pub(crate) fn block_comment_char(&mut self, code: u8) {
        let (star, start, emit, concise_line) = match self.stack.last_mut() {
            Some(Frame::BlockComment(c)) => (c.star, c.start, c.emit, c.concise_line),
            _ => unreachable!("expected block comment frame"),
        };
        if star && code == b'/' {
            self.pop_frame();
            if emit {
                self.emit_comment(ValueRange::new(
                    start,
                    self.pos + 1,
                    Range::new(start + 2, self.pos - 1),
                ));
            }
            if concise_line && !self.halted {
                self.top_concise().statement_done = true;
            }
            return;
        }
        if let Some(Frame::BlockComment(c)) = self.stack.last_mut() {
            c.star = code == b'*';
        }
    }

    pub(crate) fn block_comment_eol(&mut self) -> Option<bool> {
        if let Some(Frame::BlockComment(c)) = self.stack.last_mut() {
            c.star = false;
        }
        Some(true)
    }

    /// Whether the bytes at the cursor close the innermost parsed-text or
    /// static-text body.
    fn parsed_text_close_ahead(&self) -> bool {
        for frame in self.stack.iter().rev() {
            if let Frame::Content(content) = frame {
                if let ContentKind::Body { tag_name, .. } = content.kind {
                    return self.body_close_len(tag_name).is_some();
                }
                return false;
            }
        }
        false
    }

    /// A `</name >`/`</>` closing sequence for `tag_name` at the cursor:
    /// the offset just past its `>` and the name range within it.
    pub(crate) fn body_close_len(&self, tag_name: Range) -> Option<(usize, Range)> {
        if self.peek(1) != Some(b'/') {
            return None;
        }
        let name_start = self.pos + 2;
        let name = tag_name.of(self.data);
        let name_end = if self.data.len() >= name_start + name.len()
            && self.data[name_start..name_start + name.len()].eq_ignore_ascii_case(name)
        {
            name_start + name.len()
        } else if self.data.get(name_start) == Some(&b'>') {
            name_start
        } else {
            return None;
        };
        let mut gt = name_end;
        while self.data.get(gt).copied().is_some_and(is_whitespace) {
            gt += 1;
        }
        if self.data.get(gt) == Some(&b'>') {
            Some((gt + 1, Range::new(name_start, name_end)))
        } else {
            None
        }
    }
}
