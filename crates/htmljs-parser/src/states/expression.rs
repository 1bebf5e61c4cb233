//! The embedded-language expression scanner.
//!
//! Consumes a maximal expression fragment, respecting bracket nesting and
//! the string/template/regex/comment sub-lexers, and decides at each
//! whitespace or line boundary whether the fragment continues. Parents
//! configure the frame before entry: which bytes terminate it, whether
//! whitespace or end of line may end it, and whether the operator
//! continuation rules apply.

use crate::char_classes::{can_be_followed_by_division, is_whitespace};
use crate::errors::ErrorCode;
use crate::handler::{
    AttrMethodEvent, AttrValueEvent, PlaceholderEvent, ScriptletEvent, TokenHandler,
};
use crate::operators::{continuation, Continuation};
use crate::parser::Parser;
use crate::range::{Range, ValueRange};
use crate::states::{
    BlockCommentFrame, ExprFrame, ExprPurpose, Frame, LineCommentFrame, RegexFrame, StrFrame,
    TemplateFrame, Term,
};

impl<'a, H: TokenHandler> Parser<'a, H> {
    pub(crate) fn expression_char(&mut self, code: u8) {
        if is_whitespace(code) {
            self.expression_whitespace();
            return;
        }

        if let Some(len) = self.expression_terminator_len(code) {
            let consume = self.top_expr().consume_terminator;
            self.exit_expression(self.pos);
            if self.halted {
                return;
            }
            if consume {
                self.skip(len - 1);
            } else {
                self.replay();
            }
            return;
        }

        match code {
            b'(' | b'[' | b'{' => {
                let close = match code {
                    b'(' => b')',
                    b'[' => b']',
                    _ => b'}',
                };
                let expr = self.top_expr();
                expr.group_stack.push(close);
                expr.last_nonws = code;
            }

            b')' | b']' | b'}' => match self.top_expr().group_stack.last().copied() {
                Some(expected) if expected == code => {
                    let expr = self.top_expr();
                    expr.group_stack.pop();
                    expr.last_nonws = code;
                }
                Some(expected) => {
                    self.error(
                        self.pos,
                        ErrorCode::InvalidExpression,
                        format!(
                            "Mismatched closing \"{}\" where \"{}\" was expected.",
                            code as char, expected as char,
                        ),
                    );
                }
                None => {
                    self.error(
                        self.pos,
                        ErrorCode::InvalidExpression,
                        format!("Unmatched closing \"{}\".", code as char),
                    );
                }
            },

            b'"' | b'\'' => {
                self.enter(Frame::Str(StrFrame {
                    start: self.pos,
                    quote: code,
                    escaped: false,
                }));
            }

            b'`' => {
                self.enter(Frame::Template(TemplateFrame {
                    start: self.pos,
                    escaped: false,
                }));
            }

            b'/' => match self.peek(1) {
                Some(b'/') => {
                    self.enter(Frame::LineComment(LineCommentFrame {
                        start: self.pos,
                        emit: false,
                    }));
                    self.skip(1);
                }
                Some(b'*') => {
                    self.enter(Frame::BlockComment(BlockCommentFrame {
                        start: self.pos,
                        emit: false,
                        concise_line: false,
                        star: false,
                    }));
                    self.skip(1);
                }
                _ => {
                    let prev = self.top_expr().last_nonws;
                    if prev != 0 && can_be_followed_by_division(prev) {
                        self.top_expr().last_nonws = b'/';
                    } else {
                        self.enter(Frame::Regex(RegexFrame {
                            start: self.pos,
                            in_class: false,
                            escaped: false,
                        }));
                    }
                }
            },

            _ => self.top_expr().last_nonws = code,
        }
    }

    /// A whitespace byte inside the expression. At depth zero this is where
    /// a whitespace-terminated expression either ends or continues across
    /// an operator.
    fn expression_whitespace(&mut self) {
        let (depth0, by_ws, skip_ops, concise, start) = {
            let expr = self.top_expr();
            (
                expr.group_stack.is_empty(),
                expr.terminated_by_ws,
                expr.skip_operators,
                expr.concise,
                expr.start,
            )
        };
        if !depth0 || !by_ws {
            return;
        }
        if skip_ops {
            self.exit_expression(self.pos);
            if !self.halted {
                self.replay();
            }
            return;
        }
        match continuation(self.data, self.pos, start, concise) {
            Continuation::Operator { resume } => {
                self.note_operator_tail(resume);
                self.resume_at(resume);
            }
            Continuation::Trailing { after_ws } => self.resume_at(after_ws),
            Continuation::End => {
                self.exit_expression(self.pos);
                if !self.halted {
                    self.replay();
                }
            }
        }
    }

    /// After jumping across a continuation operator, record the last byte
    /// of the matched operator so that a following `/` is classified as a
    /// regular expression rather than division.
    fn note_operator_tail(&mut self, resume: usize) {
        let start = self.top_expr().start;
        let mut at = resume;
        while at > start {
            let code = self.data[at - 1];
            if !is_whitespace(code) && !matches!(code, b'\n' | b'\r') {
                self.top_expr().last_nonws = code;
                break;
            }
            at -= 1;
        }
    }

    pub(crate) fn expression_eol(&mut self) -> Option<bool> {
        let (depth0, by_eol, by_ws, skip_ops, concise, start) = {
            let expr = self.top_expr();
            (
                expr.group_stack.is_empty(),
                expr.terminated_by_eol,
                expr.terminated_by_ws,
                expr.skip_operators,
                expr.concise,
                expr.start,
            )
        };
        if !depth0 {
            return Some(true);
        }
        if by_eol || (by_ws && skip_ops) {
            self.exit_expression(self.pos);
            return None;
        }
        if by_ws {
            return match continuation(self.data, self.pos, start, concise) {
                Continuation::Operator { resume } => {
                    self.note_operator_tail(resume);
                    self.pos = resume;
                    Some(false)
                }
                Continuation::Trailing { after_ws } => {
                    self.pos = after_ws;
                    Some(false)
                }
                Continuation::End => {
                    self.exit_expression(self.pos);
                    None
                }
            };
        }
        Some(true)
    }

    /// Match the expression's terminators at the current position. Only
    /// meaningful at group depth zero.
    fn expression_terminator_len(&self, code: u8) -> Option<usize> {
        let expr = match self.stack.last() {
            Some(Frame::Expression(e)) => e,
            _ => unreachable!("expected expression frame"),
        };
        if !expr.group_stack.is_empty() {
            return None;
        }
        for term in expr.terminators {
            match *term {
                Term::Byte(b) if b == code => return Some(1),
                Term::Seq(s) if s[0] == code && self.lookahead_is(0, s) => return Some(s.len()),
                _ => {}
            }
        }
        None
    }

    /// Pop the expression and route its final range to the parent.
    pub(crate) fn exit_expression(&mut self, end: usize) {
        let Frame::Expression(expr) = self.pop_frame() else {
            unreachable!("expected expression frame")
        };
        self.return_from_expression(*expr, end);
    }

    fn return_from_expression(&mut self, expr: ExprFrame, end: usize) {
        let child = Range::new(expr.start, end);
        match expr.purpose {
            ExprPurpose::TagName => {
                let tag = self.top_tag();
                tag.tag_name = child;
                tag.end = end;
                tag.at_name_group = true;
            }
            ExprPurpose::ShorthandId => {
                let tag = self.top_tag();
                tag.shorthand_id = Some(child);
                tag.end = end;
                tag.at_name_group = true;
            }
            ExprPurpose::ShorthandClass => {
                let tag = self.top_tag();
                tag.shorthand_classes.push(child);
                tag.end = end;
                tag.at_name_group = true;
            }
            ExprPurpose::TagVar => {
                let tag = self.top_tag();
                tag.var = Some(child);
                tag.end = end;
                tag.at_name_group = true;
            }
            ExprPurpose::TagArgument { lparen } => {
                let tag = self.top_tag();
                tag.argument = Some(ValueRange::new(lparen, end + 1, child));
                tag.end = end + 1;
                tag.at_name_group = true;
            }
            ExprPurpose::TagParams { lbar } => {
                let tag = self.top_tag();
                tag.params = Some(ValueRange::new(lbar, end + 1, child));
                tag.end = end + 1;
                tag.at_name_group = true;
            }

            ExprPurpose::AttrName => {
                self.top_attr().name = Some(child);
                if !child.is_empty() {
                    self.emit_attr_name(child);
                }
            }
            ExprPurpose::AttrValue {
                introducer,
                spread,
                bound,
            } => {
                if child.is_empty() {
                    self.error(
                        introducer,
                        ErrorCode::IllegalAttributeValue,
                        "Missing value for attribute.",
                    );
                    return;
                }
                let value = ValueRange::new(introducer, end, child);
                if spread {
                    let attr = self.top_attr();
                    attr.spread = true;
                    attr.value = Some(value);
                    self.emit_attr_spread(value);
                } else {
                    let attr = self.top_attr();
                    attr.bound = bound;
                    attr.value = Some(value);
                    self.emit_attr_value(AttrValueEvent {
                        start: introducer,
                        end,
                        value: child,
                        bound,
                    });
                }
                self.complete_attribute();
            }
            ExprPurpose::AttrArgument { lparen } => {
                let attr = self.top_attr();
                attr.args = Some(ValueRange::new(lparen, end + 1, child));
                attr.args_reported = false;
            }
            ExprPurpose::AttrBlock { lbrace } => {
                let body = ValueRange::new(lbrace, end + 1, self.trim_range(child));
                let attr = self.top_attr();
                let params = attr
                    .args
                    .unwrap_or_else(|| ValueRange::new(lbrace, lbrace, Range::new(lbrace, lbrace)));
                attr.args_reported = true;
                attr.method = true;
                attr.body = Some(body);
                let start = attr.start;
                if !self.halted {
                    self.handler.on_attr_method(AttrMethodEvent {
                        start,
                        end: end + 1,
                        params,
                        body,
                    });
                }
                self.complete_attribute();
            }

            ExprPurpose::Placeholder { dollar, escape } => {
                self.emit_placeholder(PlaceholderEvent {
                    start: dollar,
                    end: end + 1,
                    value: child,
                    escape,
                });
            }
            ExprPurpose::TemplateInterp => {}

            ExprPurpose::InlineScript { dollar } => {
                let trimmed = self.trim_range(child);
                let bytes = trimmed.of(self.data);
                let (block, value) = if bytes.len() >= 2 && bytes[0] == b'{' && bytes[bytes.len() - 1] == b'}' {
                    (
                        true,
                        self.trim_range(Range::new(trimmed.start + 1, trimmed.end - 1)),
                    )
                } else {
                    (false, trimmed)
                };
                if !self.halted {
                    self.handler.on_scriptlet(ScriptletEvent {
                        start: dollar,
                        end,
                        value,
                        tag: false,
                        block,
                    });
                }
            }
        }
    }

    /// Shrink a range past leading and trailing whitespace and line
    /// terminators.
    pub(crate) fn trim_range(&self, range: Range) -> Range {
        let mut start = range.start;
        let mut end = range.end;
        while start < end
            && (is_whitespace(self.data[start]) || matches!(self.data[start], b'\n' | b'\r'))
        {
            start += 1;
        }
        while end > start
            && (is_whitespace(self.data[end - 1]) || matches!(self.data[end - 1], b'\n' | b'\r'))
        {
            end -= 1;
        }
        Range::new(start, end)
    }
}
