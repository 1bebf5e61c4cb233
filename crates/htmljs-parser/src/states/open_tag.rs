//! Open tags, in both surface syntaxes.
//!
//! A tag begins with its name group (`name`, then glued `#id`/`.class`
//! shorthands), may carry a glued `/var`, `(argument)`, and `|params|`, and
//! then any number of attributes. Verbose tags end at `>` or `/>`; concise
//! tags end at the line ending, at `;`, or at the `]` closing a bracketed
//! attribute segment.

use crate::char_classes::is_whitespace;
use crate::errors::ErrorCode;
use crate::handler::{BodyMode, OpenTagEvent, TagEnding, TokenHandler};
use crate::parser::Parser;
use crate::states::{
    ConciseTag, ContentFrame, ContentKind, ExprFrame, ExprPurpose, Frame, RBAR_TERM, RPAREN_TERM,
    TAG_NAME_TERMS_CONCISE, TAG_NAME_TERMS_HTML,
};

impl<'a, H: TokenHandler> Parser<'a, H> {
    pub(crate) fn open_tag_char(&mut self, code: u8) {
        // The first byte starts the tag name.
        if self.top_tag().name_pending {
            self.top_tag().name_pending = false;
            let concise = self.top_tag().concise;
            let terminators = if concise {
                TAG_NAME_TERMS_CONCISE
            } else {
                TAG_NAME_TERMS_HTML
            };
            self.enter(Frame::Expression(Box::new(
                ExprFrame::new(self.pos, ExprPurpose::TagName, terminators)
                    .ws_terminated()
                    .eol_terminated(concise)
                    .skip_ops()
                    .concise_mode(concise),
            )));
            self.replay();
            return;
        }

        let (concise, at_name_group, in_group, self_closed, name_reported) = {
            let tag = self.top_tag();
            (
                tag.concise,
                tag.at_name_group,
                tag.in_attr_group,
                tag.self_closed,
                tag.name_reported,
            )
        };

        if is_whitespace(code) {
            self.ensure_tag_name_reported();
            if let Frame::OpenTag(tag) = self.stack.last_mut().expect("open tag frame") {
                tag.at_name_group = false;
            }
            return;
        }

        // A concise `tag/` self-close admits nothing else on the line but
        // whitespace, `;`, or a trailing comment.
        if concise && self_closed && !matches!(code, b';') {
            self.error(
                self.pos,
                ErrorCode::InvalidCharacter,
                "A self-closed concise tag can only be followed by the end of the line.",
            );
            return;
        }

        // Shorthand id/class parts are glued to the name group.
        if (code == b'#' || code == b'.') && !name_reported {
            let purpose = if code == b'#' {
                ExprPurpose::ShorthandId
            } else {
                ExprPurpose::ShorthandClass
            };
            let terminators = if concise {
                TAG_NAME_TERMS_CONCISE
            } else {
                TAG_NAME_TERMS_HTML
            };
            self.enter(Frame::Expression(Box::new(
                ExprFrame::new(self.pos + 1, purpose, terminators)
                    .ws_terminated()
                    .eol_terminated(concise)
                    .skip_ops()
                    .concise_mode(concise),
            )));
            return;
        }

        self.ensure_tag_name_reported();
        if self.halted {
            return;
        }

        match code {
            b'>' if !concise => self.finalize_tag(self.pos + 1),

            b'/' => {
                if !concise && self.peek(1) == Some(b'>') {
                    self.top_tag().self_closed = true;
                    self.skip(1);
                    self.finalize_tag(self.pos + 1);
                } else if at_name_group
                    && self.top_tag().var.is_none()
                    && self.peek(1).is_some_and(crate::char_classes::is_word)
                {
                    let terminators = if concise {
                        TAG_NAME_TERMS_CONCISE
                    } else {
                        TAG_NAME_TERMS_HTML
                    };
                    self.enter(Frame::Expression(Box::new(
                        ExprFrame::new(self.pos + 1, ExprPurpose::TagVar, terminators)
                            .ws_terminated()
                            .eol_terminated(concise)
                            .skip_ops()
                            .concise_mode(concise),
                    )));
                } else if concise {
                    self.top_tag().self_closed = true;
                } else {
                    self.error(
                        self.pos,
                        ErrorCode::InvalidCharacter,
                        "A \"/\" inside an open tag must be part of \"/>\".",
                    );
                }
            }

            b'(' if at_name_group
                && self.top_tag_ref().argument.is_none()
                && self.top_tag_ref().attributes.is_empty() =>
            {
                self.enter(Frame::Expression(Box::new(
                    ExprFrame::new(
                        self.pos + 1,
                        ExprPurpose::TagArgument { lparen: self.pos },
                        RPAREN_TERM,
                    )
                    .consuming()
                    .concise_mode(concise),
                )));
            }

            b'|' if self.top_tag_ref().params.is_none() && self.top_tag_ref().attributes.is_empty() => {
                self.enter(Frame::Expression(Box::new(
                    ExprFrame::new(
                        self.pos + 1,
                        ExprPurpose::TagParams { lbar: self.pos },
                        RBAR_TERM,
                    )
                    .consuming()
                    .concise_mode(concise),
                )));
            }

            b';' if concise && !in_group => {
                let end = self.top_tag().end;
                self.finalize_tag(end);
                if !self.halted {
                    self.top_concise().statement_done = true;
                }
            }

            b'[' if concise && !in_group => {
                self.top_tag().in_attr_group = true;
            }

            b']' if concise && in_group => {
                self.finalize_tag(self.pos + 1);
                if !self.halted {
                    self.top_concise().statement_done = true;
                }
            }

            // Separator between attributes.
            b',' => {}

            b'-' if concise && !in_group => {
                if !self.begin_inline_text_block() {
                    self.open_tag_token(concise, in_group);
                }
            }

            _ => self.open_tag_token(concise, in_group),
        }
    }

    /// An ordinary token inside the tag: an attribute, or in concise mode
    /// possibly the start of inline body text.
    fn open_tag_token(&mut self, concise: bool, in_group: bool) {
        if concise && !in_group && !self.concise_token_is_attr() {
            // Bare token: the tag is done and the rest of the line is
            // inline body text.
            let end = self.top_tag().end;
            let placeholders = self.top_tag().body_mode != BodyMode::StaticText;
            self.finalize_tag(end);
            if self.halted {
                return;
            }
            self.enter(Frame::Content(ContentFrame::new(ContentKind::Line {
                placeholders,
            })));
            self.replay();
        } else {
            self.enter(Frame::Attribute(Box::new(crate::states::AttrFrame::new(
                self.pos,
            ))));
            self.replay();
        }
    }

    pub(crate) fn open_tag_eol(&mut self) -> Option<bool> {
        let (concise, in_group) = {
            let tag = self.top_tag();
            (tag.concise, tag.in_attr_group)
        };
        if !concise || in_group {
            // Verbose tags and bracketed attribute segments span lines.
            self.ensure_tag_name_reported();
            return Some(true);
        }
        let end = self.top_tag().end;
        self.finalize_tag(end);
        None
    }

    /// Emit the open-tag event, pop the frame, and wire up the tag's body.
    pub(crate) fn finalize_tag(&mut self, end: usize) {
        self.ensure_tag_name_reported();
        if self.halted {
            return;
        }
        let Frame::OpenTag(tag) = self.pop_frame() else {
            unreachable!("expected open tag frame")
        };
        let tag = *tag;
        let ending = if tag.self_closed {
            TagEnding::SelfClosed
        } else if tag.open_tag_only {
            TagEnding::OpenOnly
        } else {
            TagEnding::Tag
        };
        self.handler.on_open_tag(OpenTagEvent {
            start: tag.start,
            end,
            tag_name: tag.tag_name,
            var: tag.var,
            argument: tag.argument,
            params: tag.params,
            attributes: &tag.attributes,
            shorthand_id: tag.shorthand_id,
            shorthand_class_names: &tag.shorthand_classes,
            concise: tag.concise,
            open_tag_only: ending != TagEnding::Tag,
            self_closed: tag.self_closed,
        });
        if tag.concise {
            // Tags that take no body are still recorded: they are the
            // would-be parent a deeper line must be reported against.
            self.open_tags.push(ConciseTag {
                name: tag.tag_name,
                indent_len: tag.indent.len(),
                nested_indent: None,
                body: tag.body_mode,
                allows_body: ending == TagEnding::Tag,
            });
        } else if ending == TagEnding::Tag {
            match tag.body_mode {
                BodyMode::Html => self.top_content().open_depth += 1,
                BodyMode::ParsedText | BodyMode::StaticText => {
                    self.enter(Frame::Content(ContentFrame::new(ContentKind::Body {
                        tag_name: tag.tag_name,
                        mode: tag.body_mode,
                    })));
                }
            }
        }
    }

    /// `tag -- text` or `tag --` at the end of a concise tag line: finish
    /// the tag and treat what follows as its body text. Returns false when
    /// the dashes are not a text delimiter.
    fn begin_inline_text_block(&mut self) -> bool {
        let run = strspn!(self.data, b'-', self.pos);
        let after = self.pos + run;
        if run < 2
            || !(after >= self.max_pos || is_whitespace(self.data[after]) || matches!(self.data[after], b'\n' | b'\r'))
        {
            return false;
        }
        let end = self.top_tag().end;
        let placeholders = self.top_tag().body_mode != BodyMode::StaticText;
        self.finalize_tag(end);
        if self.halted {
            return true;
        }
        let text_start = self.past_whitespace(after);
        if text_start >= self.max_pos || matches!(self.data[text_start], b'\n' | b'\r') {
            // Nothing after the dashes: a multi-line delimited block.
            self.enter(Frame::Content(ContentFrame::new(ContentKind::Delimited {
                delim_len: run,
            })));
        } else {
            self.enter(Frame::Content(ContentFrame::new(ContentKind::Line {
                placeholders,
            })));
        }
        self.resume_at(text_start.max(self.pos + 1));
        true
    }

    /// Decide whether the token at the cursor is an attribute or inline
    /// text. A token is an attribute only when it carries an attribute
    /// introducer before the next whitespace or line/segment ending.
    fn concise_token_is_attr(&self) -> bool {
        if self.data[self.pos] == b'{' || self.lookahead_is(0, b"...") {
            return true;
        }
        let mut at = self.pos;
        while at < self.max_pos {
            match self.data[at] {
                b' ' | b'\t' | 0x0c | b'\n' | b'\r' | b';' | b']' => return false,
                b'=' | b'(' | b',' => return true,
                b':' if self.data.get(at + 1) == Some(&b'=') => return true,
                _ => at += 1,
            }
        }
        false
    }
}
