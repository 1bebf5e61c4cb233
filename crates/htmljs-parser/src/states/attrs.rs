//! Attribute parsing.
//!
//! An attribute progresses from an unknown stage through an optional name,
//! optional parenthesized argument, and then either a method body, a value,
//! or nothing. The stage is implicit in which fields of the frame are set;
//! each trigger byte below either configures a child expression or hands
//! control back to the open tag.

use crate::char_classes::is_whitespace;
use crate::errors::ErrorCode;
use crate::handler::{AttrRecord, TokenHandler};
use crate::parser::Parser;
use crate::range::Range;
use crate::states::{
    ExprFrame, ExprPurpose, Frame, NAME_TERMS_CONCISE, NAME_TERMS_HTML, RBRACE_TERM, RPAREN_TERM,
    VALUE_TERMS_CONCISE, VALUE_TERMS_HTML,
};

impl<'a, H: TokenHandler> Parser<'a, H> {
    pub(crate) fn attr_char(&mut self, code: u8) {
        if is_whitespace(code) {
            return;
        }

        // A pending argument becomes final the moment anything but a method
        // body follows it.
        if code != b'{' {
            self.flush_pending_attr_args();
        }

        let concise = self.attr_is_concise();
        let (has_name, has_args, has_value) = {
            let attr = self.top_attr();
            (attr.name.is_some(), attr.args.is_some(), attr.value.is_some())
        };

        match code {
            b'=' => self.begin_attr_value(self.pos, 1, false),

            b':' if self.peek(1) == Some(b'=') => self.begin_attr_value(self.pos, 2, true),

            b'.' if !has_name && !has_args && self.lookahead_is(0, b"...") => {
                self.begin_attr_spread(self.pos)
            }

            b'(' => {
                if has_args {
                    self.error(
                        self.pos,
                        ErrorCode::IllegalAttributeArgument,
                        "An attribute can only have one argument.",
                    );
                    return;
                }
                self.enter(Frame::Expression(Box::new(ExprFrame::new(
                    self.pos + 1,
                    ExprPurpose::AttrArgument { lparen: self.pos },
                    RPAREN_TERM,
                )
                .consuming()
                .concise_mode(concise))));
            }

            b'{' if has_args || !has_name => {
                let lbrace = self.pos;
                let body_start = self.past_whitespace(lbrace + 1);
                self.enter(Frame::Expression(Box::new(ExprFrame::new(
                    body_start,
                    ExprPurpose::AttrBlock { lbrace },
                    RBRACE_TERM,
                )
                .consuming()
                .concise_mode(concise))));
                self.resume_at(body_start.max(lbrace + 1));
            }

            _ if !has_name && !has_args && !has_value => {
                let terminators = if concise {
                    NAME_TERMS_CONCISE
                } else {
                    NAME_TERMS_HTML
                };
                self.enter(Frame::Expression(Box::new(
                    ExprFrame::new(self.pos, ExprPurpose::AttrName, terminators)
                        .ws_terminated()
                        .eol_terminated(concise)
                        .skip_ops()
                        .concise_mode(concise),
                )));
                self.replay();
            }

            // Anything else ends this attribute; the open tag re-decides.
            _ => {
                self.complete_attribute();
                if !self.halted {
                    self.replay();
                }
            }
        }
    }

    pub(crate) fn attr_eol(&mut self) -> Option<bool> {
        self.flush_pending_attr_args();
        self.complete_attribute();
        None
    }

    fn begin_attr_value(&mut self, introducer: usize, introducer_len: usize, bound: bool) {
        let concise = self.attr_is_concise();
        {
            let attr = self.top_attr();
            if attr.name.is_none() {
                // Shorthand value attribute: synthesize a zero-width name.
                let at = attr.start;
                attr.name = Some(Range::new(at, at));
                attr.default = true;
            }
        }
        let value_start = self.past_value_whitespace(introducer + introducer_len, concise);
        let terminators = if concise {
            VALUE_TERMS_CONCISE
        } else {
            VALUE_TERMS_HTML
        };
        self.enter(Frame::Expression(Box::new(
            ExprFrame::new(
                value_start,
                ExprPurpose::AttrValue {
                    introducer,
                    spread: false,
                    bound,
                },
                terminators,
            )
            .ws_terminated()
            .eol_terminated(concise)
            .concise_mode(concise),
        )));
        self.resume_at(value_start.max(introducer + 1));
    }

    fn begin_attr_spread(&mut self, introducer: usize) {
        let concise = self.attr_is_concise();
        let value_start = self.past_value_whitespace(introducer + 3, concise);
        let terminators = if concise {
            VALUE_TERMS_CONCISE
        } else {
            VALUE_TERMS_HTML
        };
        self.enter(Frame::Expression(Box::new(
            ExprFrame::new(
                value_start,
                ExprPurpose::AttrValue {
                    introducer,
                    spread: true,
                    bound: false,
                },
                terminators,
            )
            .ws_terminated()
            .eol_terminated(concise)
            .concise_mode(concise),
        )));
        self.resume_at(value_start.max(introducer + 1));
    }

    /// Report a parenthesized argument that was held back in case a method
    /// body followed it.
    fn flush_pending_attr_args(&mut self) {
        let pending = {
            let attr = self.top_attr();
            if attr.args_reported {
                None
            } else {
                attr.args
            }
        };
        if let Some(args) = pending {
            self.top_attr().args_reported = true;
            self.emit_attr_args(args);
        }
    }

    /// Pop the attribute frame and record it on the enclosing open tag.
    pub(crate) fn complete_attribute(&mut self) {
        self.flush_pending_attr_args();
        let Frame::Attribute(attr) = self.pop_frame() else {
            unreachable!("expected attribute frame")
        };
        let attr = *attr;
        let tag = self.top_tag();
        let name = attr.name.unwrap_or(Range::new(attr.start, attr.start));
        let record = AttrRecord {
            name,
            value: attr.value,
            args: attr.args,
            body: attr.body,
            bound: attr.bound,
            spread: attr.spread,
            method: attr.method,
            default: attr.default && tag.attributes.is_empty(),
        };
        let attr_end = [
            Some(name.end),
            attr.args.map(|a| a.end),
            attr.value.map(|v| v.end),
            attr.body.map(|b| b.end),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(attr.start);
        tag.end = tag.end.max(attr_end);
        tag.attributes.push(record);
    }

    /// Whitespace between a value introducer and the value. Verbose tags
    /// may wrap attributes across lines; concise values stay on their line
    /// so that the line ending can end the tag.
    fn past_value_whitespace(&self, from: usize, concise: bool) -> usize {
        if concise {
            self.past_whitespace(from)
        } else {
            from + strspn!(self.data, b' ' | b'\t' | 0x0c | b'\r' | b'\n', from)
        }
    }

    fn attr_is_concise(&mut self) -> bool {
        // The attribute's parent is always the open tag directly below it.
        match self.stack.iter().rev().nth(1) {
            Some(Frame::OpenTag(tag)) => tag.concise,
            _ => unreachable!("attribute frame without enclosing open tag"),
        }
    }
}
