use crate::char_classes::is_whitespace;
use crate::errors::ErrorCode;
use crate::handler::{
    AttrValueEvent, CloseTagEvent, ErrorEvent, OpenTagNameEvent, PlaceholderEvent, TokenHandler,
};
use crate::range::{Range, ValueRange};
use crate::states::{
    AttrFrame, ConciseFrame, ConciseTag, ContentFrame, ExprFrame, ExprPurpose, Frame,
    OpenTagFrame,
};

/// The streaming tokenizer.
///
/// Owns the borrowed source buffer, the cursor, and the state stack; the
/// handler is invoked synchronously as constructs complete. One instance
/// parses one buffer, start to finish.
pub(crate) struct Parser<'a, H: TokenHandler> {
    pub(crate) data: &'a [u8],
    pub(crate) pos: usize,
    pub(crate) max_pos: usize,
    pub(crate) handler: &'a mut H,
    pub(crate) stack: Vec<Frame>,
    /// Tags opened in concise mode, innermost last, closed by dedent.
    pub(crate) open_tags: Vec<ConciseTag>,
    /// Set by the first error; afterwards nothing is emitted but the final
    /// finish notification.
    pub(crate) halted: bool,
    /// Re-dispatch the current byte instead of advancing: set when a state
    /// hands a byte it did not consume to a newly entered child or back to
    /// its parent.
    pub(crate) replay: bool,
}

/// Parse `source`, reporting events to `handler`.
///
/// The buffer is borrowed read-only; every event range indexes into it.
/// Parsing begins in concise mode, the way templates are written by
/// default; a line beginning with `<` switches to the verbose syntax for
/// that element.
pub fn parse<H: TokenHandler>(source: &[u8], handler: &mut H) {
    let mut parser = Parser {
        data: source,
        pos: 0,
        max_pos: source.len(),
        handler,
        stack: Vec::with_capacity(16),
        open_tags: Vec::new(),
        halted: false,
        replay: false,
    };
    parser.stack.push(Frame::Concise(ConciseFrame::default()));
    parser.run();
}

impl<'a, H: TokenHandler> Parser<'a, H> {
    pub(crate) fn run(&mut self) {
        while self.pos < self.max_pos && !self.halted {
            let code = self.data[self.pos];
            let eol_len = match code {
                b'\n' => 1,
                b'\r' if self.peek(1) == Some(b'\n') => 2,
                _ => 0,
            };
            if eol_len > 0 {
                // A replay aimed at this byte is satisfied by dispatching
                // the line ending itself.
                self.replay = false;
                if self.dispatch_eol(eol_len) {
                    self.pos += eol_len;
                }
            } else {
                self.dispatch_char(code);
                if self.replay {
                    self.replay = false;
                } else {
                    self.pos += 1;
                }
            }
        }
        self.finish();
    }

    fn dispatch_char(&mut self, code: u8) {
        match self.stack.last().expect("state stack is never empty while input remains") {
            Frame::Concise(_) => self.concise_char(code),
            Frame::Content(_) => self.content_char(code),
            Frame::OpenTag(_) => self.open_tag_char(code),
            Frame::Attribute(_) => self.attr_char(code),
            Frame::Expression(_) => self.expression_char(code),
            Frame::Str(_) => self.string_char(code),
            Frame::Template(_) => self.template_char(code),
            Frame::Regex(_) => self.regex_char(code),
            Frame::LineComment(_) => self.line_comment_char(code),
            Frame::BlockComment(_) => self.block_comment_char(code),
        }
    }

    /// Dispatch an end of line, cascading outward through frames that
    /// terminate on it. Returns whether the driver should step over the
    /// line terminator, which is the common case; a state that moved the
    /// cursor itself returns `false` through here.
    fn dispatch_eol(&mut self, eol_len: usize) -> bool {
        loop {
            if self.halted {
                return true;
            }
            let outcome = match self.stack.last() {
                Some(Frame::Concise(_)) => self.concise_eol(),
                Some(Frame::Content(_)) => self.content_eol(eol_len),
                Some(Frame::OpenTag(_)) => self.open_tag_eol(),
                Some(Frame::Attribute(_)) => self.attr_eol(),
                Some(Frame::Expression(_)) => self.expression_eol(),
                Some(Frame::Str(_)) => self.string_eol(),
                Some(Frame::Template(_)) => Some(true),
                Some(Frame::Regex(_)) => self.regex_eol(),
                Some(Frame::LineComment(_)) => self.line_comment_eol(),
                Some(Frame::BlockComment(_)) => self.block_comment_eol(),
                None => Some(true),
            };
            if let Some(advance) = outcome {
                return advance;
            }
        }
    }

    // ------------------------------------------------------------------
    // Cursor primitives.

    pub(crate) fn peek(&self, ahead: usize) -> Option<u8> {
        self.data.get(self.pos + ahead).copied()
    }

    /// Consume `extra` bytes beyond the one being dispatched.
    pub(crate) fn skip(&mut self, extra: usize) {
        self.pos += extra;
    }

    /// Re-dispatch the current byte: an entered child re-sees the
    /// triggering byte, or a parent re-sees a terminator its child refused
    /// to consume.
    pub(crate) fn replay(&mut self) {
        self.replay = true;
    }

    /// Arrange for `at` to be the next dispatched position.
    pub(crate) fn resume_at(&mut self, at: usize) {
        self.pos = at;
        self.replay = true;
    }

    pub(crate) fn lookahead_is(&self, ahead: usize, bytes: &[u8]) -> bool {
        let from = self.pos + ahead;
        self.data.len() >= from + bytes.len() && &self.data[from..from + bytes.len()] == bytes
    }

    // ------------------------------------------------------------------
    // Stack primitives.

    pub(crate) fn enter(&mut self, frame: Frame) {
        self.stack.push(frame);
    }

    pub(crate) fn pop_frame(&mut self) -> Frame {
        self.stack.pop().expect("state stack underflow")
    }

    pub(crate) fn top_concise(&mut self) -> &mut ConciseFrame {
        match self.stack.last_mut() {
            Some(Frame::Concise(f)) => f,
            _ => unreachable!("expected concise frame"),
        }
    }

    pub(crate) fn top_content(&mut self) -> &mut ContentFrame {
        match self.stack.last_mut() {
            Some(Frame::Content(f)) => f,
            _ => unreachable!("expected content frame"),
        }
    }

    pub(crate) fn top_content_ref(&self) -> &ContentFrame {
        match self.stack.last() {
            Some(Frame::Content(f)) => f,
            _ => unreachable!("expected content frame"),
        }
    }

    pub(crate) fn top_tag(&mut self) -> &mut OpenTagFrame {
        match self.stack.last_mut() {
            Some(Frame::OpenTag(f)) => f,
            _ => unreachable!("expected open tag frame"),
        }
    }

    pub(crate) fn top_tag_ref(&self) -> &OpenTagFrame {
        match self.stack.last() {
            Some(Frame::OpenTag(f)) => f,
            _ => unreachable!("expected open tag frame"),
        }
    }

    pub(crate) fn top_attr(&mut self) -> &mut AttrFrame {
        match self.stack.last_mut() {
            Some(Frame::Attribute(f)) => f,
            _ => unreachable!("expected attribute frame"),
        }
    }

    pub(crate) fn top_expr(&mut self) -> &mut ExprFrame {
        match self.stack.last_mut() {
            Some(Frame::Expression(f)) => f,
            _ => unreachable!("expected expression frame"),
        }
    }

    // ------------------------------------------------------------------
    // Emission. Every handler call funnels through one of these so that
    // the single-shot error latch silences everything uniformly.

    pub(crate) fn emit_text(&mut self, start: usize, end: usize) {
        if start < end && !self.halted {
            self.handler.on_text(Range::new(start, end));
        }
    }

    pub(crate) fn emit_close_tag(&mut self, start: usize, end: usize, tag_name: Range) {
        if !self.halted {
            self.handler.on_close_tag(CloseTagEvent {
                start,
                end,
                tag_name,
            });
        }
    }

    pub(crate) fn emit_placeholder(&mut self, event: PlaceholderEvent) {
        if !self.halted {
            self.handler.on_placeholder(event);
        }
    }

    pub(crate) fn emit_attr_name(&mut self, name: Range) {
        if !self.halted {
            self.handler.on_attr_name(name);
        }
    }

    pub(crate) fn emit_attr_value(&mut self, event: AttrValueEvent) {
        if !self.halted {
            self.handler.on_attr_value(event);
        }
    }

    pub(crate) fn emit_attr_args(&mut self, args: ValueRange) {
        if !self.halted {
            self.handler.on_attr_args(args);
        }
    }

    pub(crate) fn emit_attr_spread(&mut self, value: ValueRange) {
        if !self.halted {
            self.handler.on_attr_spread(value);
        }
    }

    pub(crate) fn emit_comment(&mut self, comment: ValueRange) {
        if !self.halted {
            self.handler.on_comment(comment);
        }
    }

    /// Report an error and latch. `end` follows the cursor per the error
    /// model; errors discovered at end of input set the cursor there first.
    pub(crate) fn error(&mut self, start: usize, code: ErrorCode, message: impl Into<String>) {
        if self.halted {
            return;
        }
        let end = (self.pos + 1).min(self.max_pos);
        self.handler.on_error(ErrorEvent {
            start: start.min(end),
            end,
            code,
            message: message.into(),
        });
        self.halted = true;
    }

    /// The bytes of a range, for error messages only. Events never carry
    /// text.
    pub(crate) fn slice_lossy(&self, range: Range) -> String {
        String::from_utf8_lossy(range.of(self.data)).into_owned()
    }

    // ------------------------------------------------------------------
    // End of input.

    fn finish(&mut self) {
        if !self.halted {
            if let Some((start, code, message)) = self.eof_error() {
                self.pos = self.max_pos;
                self.error(start, code, message);
            } else {
                self.eof_unwind();
            }
        }
        self.handler.on_finish();
    }

    /// Scan the stack innermost-first for a frame that cannot complete at
    /// end of input, producing the one context-specific error.
    fn eof_error(&self) -> Option<(usize, ErrorCode, String)> {
        for frame in self.stack.iter().rev() {
            let fatal_start = match frame {
                Frame::Str(s) => Some(s.start),
                Frame::Template(t) => Some(t.start),
                Frame::Regex(r) => Some(r.start),
                Frame::BlockComment(c) => Some(c.start),
                Frame::Expression(e) => {
                    let requires_terminator = !e.terminated_by_eol && !e.terminated_by_ws;
                    if !e.group_stack.is_empty() || requires_terminator {
                        Some(e.start)
                    } else {
                        None
                    }
                }
                Frame::OpenTag(t) if !t.concise => Some(t.start),
                _ => None,
            };
            if let Some(start) = fatal_start {
                return Some(self.eof_context(start));
            }
        }
        None
    }

    /// Name the enclosing construct for an end-of-input error.
    fn eof_context(&self, fatal_start: usize) -> (usize, ErrorCode, String) {
        let mut attr: Option<&AttrFrame> = None;
        for frame in self.stack.iter().rev() {
            match frame {
                Frame::Expression(e) => {
                    if let ExprPurpose::Placeholder { dollar, .. } = e.purpose {
                        return (
                            dollar,
                            ErrorCode::MalformedPlaceholder,
                            "EOF reached while parsing a placeholder.".to_string(),
                        );
                    }
                }
                Frame::Attribute(a) => {
                    if attr.is_none() {
                        attr = Some(a.as_ref());
                    }
                }
                Frame::OpenTag(t) => {
                    let message = match attr {
                        Some(a) => {
                            let name = match a.name {
                                Some(name) if !name.is_empty() => self.slice_lossy(name),
                                _ => "default".to_string(),
                            };
                            format!(
                                "EOF reached while parsing attribute \"{}\" for the \"{}\" tag.",
                                name,
                                self.slice_lossy(t.tag_name),
                            )
                        }
                        None if t.name_pending || t.tag_name.is_empty() => {
                            "EOF reached while parsing the tag name.".to_string()
                        }
                        None => format!(
                            "EOF reached while parsing open tag \"{}\".",
                            self.slice_lossy(t.tag_name),
                        ),
                    };
                    return (t.start, ErrorCode::MalformedOpenTag, message);
                }
                _ => {}
            }
        }
        (
            fatal_start,
            ErrorCode::InvalidExpression,
            "EOF reached while parsing an expression.".to_string(),
        )
    }

    /// Unwind remaining frames at end of input, completing each cleanly.
    /// Only runs when `eof_error` found nothing fatal, so every step here
    /// pops a frame and the loop terminates.
    fn eof_unwind(&mut self) {
        self.pos = self.max_pos;
        while !self.halted {
            match self.stack.last() {
                None => break,
                Some(Frame::Concise(_)) => {
                    self.close_all_concise_tags();
                    self.pop_frame();
                }
                Some(Frame::Content(_)) => {
                    self.flush_content_text(self.max_pos);
                    self.pop_frame();
                }
                Some(Frame::Expression(_)) => {
                    self.exit_expression(self.max_pos);
                }
                Some(Frame::Attribute(_)) => {
                    self.complete_attribute();
                }
                Some(Frame::OpenTag(_)) => {
                    self.finalize_tag(self.max_pos);
                }
                Some(Frame::LineComment(_)) => {
                    self.finish_line_comment(self.max_pos);
                }
                Some(Frame::Str(_))
                | Some(Frame::Template(_))
                | Some(Frame::Regex(_))
                | Some(Frame::BlockComment(_)) => {
                    unreachable!("unterminated lexeme survived the EOF error scan")
                }
            }
        }
    }

    pub(crate) fn close_all_concise_tags(&mut self) {
        while let Some(tag) = self.open_tags.pop() {
            if tag.allows_body {
                self.emit_close_tag(self.max_pos, self.max_pos, tag.name);
            }
        }
    }

    // ------------------------------------------------------------------
    // Shared helpers used across state modules.

    /// Skip horizontal whitespace starting at `from`; returns the offset of
    /// the first byte that is not whitespace.
    pub(crate) fn past_whitespace(&self, from: usize) -> usize {
        from + strspn!(self.data, b if is_whitespace(b), from)
    }

    /// Report the open-tag-name event if it has not fired yet, applying
    /// any parse options the handler returns. Must be called before the
    /// tag is finalized or any attribute is processed.
    pub(crate) fn ensure_tag_name_reported(&mut self) {
        let halted = self.halted;
        let options = match self.stack.last_mut() {
            Some(Frame::OpenTag(tag)) if !tag.name_reported => {
                tag.name_reported = true;
                tag.at_name_group = false;
                if halted {
                    None
                } else {
                    self.handler.on_open_tag_name(OpenTagNameEvent {
                        start: tag.tag_name.start,
                        end: tag.end,
                        tag_name: tag.tag_name,
                        shorthand_id: tag.shorthand_id,
                        shorthand_class_names: &tag.shorthand_classes,
                        concise: tag.concise,
                    })
                }
            }
            _ => return,
        };
        if let Some(options) = options {
            let tag = self.top_tag();
            if let Some(body) = options.body {
                tag.body_mode = body;
            }
            tag.open_tag_only = options.open_tag_only;
        }
    }
}
