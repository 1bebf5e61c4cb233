//! `<!…` and `<?…` markup: HTML comments, DOCTYPE, CDATA sections, bogus
//! declarations, and scriptlet tags.
//!
//! These constructs have fixed closing delimiters and nothing significant
//! inside, so they are scanned wholesale to their terminator rather than
//! byte by byte. A missing terminator is the document truncating inside
//! the construct, which is this parser's one fatal error for each form.

use memchr::memmem;

use crate::errors::ErrorCode;
use crate::handler::{ScriptletEvent, TokenHandler};
use crate::parser::Parser;
use crate::range::{Range, ValueRange};

impl<'a, H: TokenHandler> Parser<'a, H> {
    /// At `<!`.
    pub(crate) fn parse_markup_declaration(&mut self) {
        if self.lookahead_is(2, b"--") {
            self.parse_html_comment();
        } else if self.doctype_ahead() {
            self.parse_doctype();
        } else if self.lookahead_is(2, b"[CDATA[") {
            self.parse_cdata();
        } else {
            self.parse_declaration();
        }
    }

    fn parse_html_comment(&mut self) {
        let start = self.pos;
        let Some(closer) = self.find_sequence(b"-->", start + 4) else {
            self.pos = self.max_pos;
            self.error(
                start,
                ErrorCode::MalformedComment,
                "Missing \"-->\" to end the comment.",
            );
            return;
        };
        self.flush_content_text(start);
        self.emit_comment(ValueRange::new(
            start,
            closer + 3,
            Range::new(start + 4, closer),
        ));
        self.resume_at(closer + 3);
    }

    fn doctype_ahead(&self) -> bool {
        let from = self.pos + 2;
        self.data.len() >= from + 7 && self.data[from..from + 7].eq_ignore_ascii_case(b"doctype")
    }

    fn parse_doctype(&mut self) {
        let start = self.pos;
        let Some(gt) = self.find_byte(b'>', start + 2) else {
            self.pos = self.max_pos;
            self.error(
                start,
                ErrorCode::MalformedDocumentType,
                "Missing \">\" to end the document type declaration.",
            );
            return;
        };
        self.flush_content_text(start);
        if !self.halted {
            self.handler
                .on_doctype(ValueRange::new(start, gt + 1, Range::new(start + 2, gt)));
        }
        self.resume_at(gt + 1);
    }

    fn parse_cdata(&mut self) {
        let start = self.pos;
        let Some(closer) = self.find_sequence(b"]]>", start + 9) else {
            self.pos = self.max_pos;
            self.error(
                start,
                ErrorCode::MalformedCdata,
                "Missing \"]]>\" to end the CDATA section.",
            );
            return;
        };
        self.flush_content_text(start);
        if !self.halted {
            self.handler
                .on_cdata(ValueRange::new(start, closer + 3, Range::new(start + 9, closer)));
        }
        self.resume_at(closer + 3);
    }

    fn parse_declaration(&mut self) {
        let start = self.pos;
        let Some(gt) = self.find_byte(b'>', start + 2) else {
            self.pos = self.max_pos;
            self.error(
                start,
                ErrorCode::MalformedDeclaration,
                "Missing \">\" to end the declaration.",
            );
            return;
        };
        self.flush_content_text(start);
        if !self.halted {
            self.handler
                .on_declaration(ValueRange::new(start, gt + 1, Range::new(start + 2, gt)));
        }
        self.resume_at(gt + 1);
    }

    /// At `<?`.
    pub(crate) fn parse_scriptlet_tag(&mut self) {
        let start = self.pos;
        let Some(closer) = self.find_sequence(b"?>", start + 2) else {
            self.pos = self.max_pos;
            self.error(
                start,
                ErrorCode::MalformedScriptlet,
                "Missing \"?>\" to end the scriptlet.",
            );
            return;
        };
        self.flush_content_text(start);
        if !self.halted {
            self.handler.on_scriptlet(ScriptletEvent {
                start,
                end: closer + 2,
                value: Range::new(start + 2, closer),
                tag: true,
                block: false,
            });
        }
        self.resume_at(closer + 2);
    }

    pub(crate) fn find_sequence(&self, needle: &[u8], from: usize) -> Option<usize> {
        if from >= self.max_pos {
            return None;
        }
        memmem::find(&self.data[from..], needle).map(|at| from + at)
    }
}
