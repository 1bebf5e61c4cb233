//! String, template-string, and regular-expression lexemes inside
//! expressions. Each consumes its own closing delimiter; the enclosing
//! expression resumes with its previous-byte record updated so that a
//! following `/` is classified correctly.

use crate::errors::ErrorCode;
use crate::handler::TokenHandler;
use crate::parser::Parser;
use crate::states::{ExprFrame, ExprPurpose, Frame, RBRACE_TERM};

impl<'a, H: TokenHandler> Parser<'a, H> {
    pub(crate) fn string_char(&mut self, code: u8) {
        let quote = match self.stack.last_mut() {
            Some(Frame::Str(s)) => {
                if s.escaped {
                    s.escaped = false;
                    return;
                }
                if code == b'\\' {
                    s.escaped = true;
                    return;
                }
                s.quote
            }
            _ => unreachable!("expected string frame"),
        };
        if code == quote {
            self.exit_sublexer(quote);
        }
    }

    pub(crate) fn string_eol(&mut self) -> Option<bool> {
        let start = match self.stack.last_mut() {
            Some(Frame::Str(s)) => {
                if s.escaped {
                    // A backslash escapes the line terminator; the string
                    // continues on the next line.
                    s.escaped = false;
                    return Some(true);
                }
                s.start
            }
            _ => unreachable!("expected string frame"),
        };
        self.error(
            start,
            ErrorCode::InvalidExpression,
            "String literal is missing its closing quote before the end of the line.",
        );
        Some(true)
    }

    pub(crate) fn template_char(&mut self, code: u8) {
        match self.stack.last_mut() {
            Some(Frame::Template(t)) => {
                if t.escaped {
                    t.escaped = false;
                    return;
                }
                if code == b'\\' {
                    t.escaped = true;
                    return;
                }
            }
            _ => unreachable!("expected template string frame"),
        }
        match code {
            b'`' => self.exit_sublexer(b'`'),
            b'$' if self.peek(1) == Some(b'{') => {
                self.enter(Frame::Expression(Box::new(
                    ExprFrame::new(self.pos + 2, ExprPurpose::TemplateInterp, RBRACE_TERM)
                        .consuming(),
                )));
                self.skip(1);
            }
            _ => {}
        }
    }

    pub(crate) fn regex_char(&mut self, code: u8) {
        let in_class = match self.stack.last_mut() {
            Some(Frame::Regex(r)) => {
                if r.escaped {
                    r.escaped = false;
                    return;
                }
                match code {
                    b'\\' => {
                        r.escaped = true;
                        return;
                    }
                    b'[' if !r.in_class => {
                        r.in_class = true;
                        return;
                    }
                    b']' if r.in_class => {
                        r.in_class = false;
                        return;
                    }
                    _ => r.in_class,
                }
            }
            _ => unreachable!("expected regular expression frame"),
        };
        if code == b'/' && !in_class {
            // Trailing flag letters belong to the literal.
            let flags = strspn!(self.data, b if b.is_ascii_alphabetic(), self.pos + 1);
            self.exit_sublexer(b'/');
            self.skip(flags);
        }
    }

    pub(crate) fn regex_eol(&mut self) -> Option<bool> {
        let start = match self.stack.last() {
            Some(Frame::Regex(r)) => r.start,
            _ => unreachable!("expected regular expression frame"),
        };
        self.error(
            start,
            ErrorCode::InvalidExpression,
            "Regular expression is missing its closing \"/\" before the end of the line.",
        );
        Some(true)
    }

    /// Pop a string/template/regex frame, recording its final byte on the
    /// enclosing expression for division disambiguation.
    fn exit_sublexer(&mut self, last_byte: u8) {
        self.pop_frame();
        if let Some(Frame::Expression(expr)) = self.stack.last_mut() {
            expr.last_nonws = last_byte;
        }
    }
}
