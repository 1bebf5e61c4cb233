//! Frame types for the state stack.
//!
//! Each lexical context is one variant of [`Frame`]; the stack is a plain
//! vector, the parent of a frame is the frame below it, and every variant's
//! payload embeds its own `start` offset. The `char`/`eol`/`eof` behavior of
//! each state lives in the modules under `states/`, implemented directly on
//! the parser so the hot loop dispatches with a single `match`.

use crate::handler::{AttrRecord, BodyMode};
use crate::range::{Range, ValueRange};

mod attrs;
mod comments;
mod concise;
mod content;
mod expression;
mod markup;
mod open_tag;
mod strings;

pub(crate) enum Frame {
    Concise(ConciseFrame),
    Content(ContentFrame),
    OpenTag(Box<OpenTagFrame>),
    Attribute(Box<AttrFrame>),
    Expression(Box<ExprFrame>),
    Str(StrFrame),
    Template(TemplateFrame),
    Regex(RegexFrame),
    LineComment(LineCommentFrame),
    BlockComment(BlockCommentFrame),
}

/// Root state: indentation-delimited concise syntax.
#[derive(Default)]
pub(crate) struct ConciseFrame {
    /// After a `;`/`]` ended a tag mid-line, only whitespace and comments
    /// may follow on the same line.
    pub(crate) statement_done: bool,
}

/// One open tag in concise mode, tracked for indentation-driven closing.
pub(crate) struct ConciseTag {
    pub(crate) name: Range,
    pub(crate) indent_len: usize,
    /// Canonical indent of the tag's direct children, fixed by the first
    /// child line. All siblings must match it byte for byte.
    pub(crate) nested_indent: Option<Range>,
    pub(crate) body: BodyMode,
    /// False for self-closed tags and tags marked open-tag-only; such a tag
    /// may not have children and receives no close event.
    pub(crate) allows_body: bool,
}

/// What a verbose content frame is scanning.
#[derive(Clone, Copy)]
pub(crate) enum ContentKind {
    /// A verbose region opened from a concise line that began with `<`.
    /// Exits at the first end of line with no verbose tag left open.
    Mixed,
    /// The body of a tag in parsed-text or static-text mode; nothing is
    /// recognized except placeholders (parsed text only) and the tag's own
    /// closing tag.
    Body { tag_name: Range, mode: BodyMode },
    /// Text until end of line: concise inline text after a tag, a
    /// `-- text` line, or a `- text` line of a parsed-text body.
    Line { placeholders: bool },
    /// A `--` delimited HTML block, closed by a line holding exactly the
    /// same number of hyphens.
    Delimited { delim_len: usize },
}

pub(crate) struct ContentFrame {
    pub(crate) kind: ContentKind,
    /// Start of unreported text, set lazily at the first text byte.
    pub(crate) text_start: Option<usize>,
    /// Verbose tags currently open in this region (Mixed/Delimited only).
    pub(crate) open_depth: usize,
}

impl ContentFrame {
    pub(crate) fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            text_start: None,
            open_depth: 0,
        }
    }

    pub(crate) fn allows_tags(&self) -> bool {
        matches!(self.kind, ContentKind::Mixed | ContentKind::Delimited { .. })
    }

    pub(crate) fn allows_placeholders(&self) -> bool {
        match self.kind {
            ContentKind::Mixed | ContentKind::Delimited { .. } => true,
            ContentKind::Body { mode, .. } => mode == BodyMode::ParsedText,
            ContentKind::Line { placeholders } => placeholders,
        }
    }
}

pub(crate) struct OpenTagFrame {
    pub(crate) start: usize,
    /// End of the last completed part, advanced as the tag is parsed.
    pub(crate) end: usize,
    pub(crate) concise: bool,
    /// Leading whitespace of the tag's line (concise mode only).
    pub(crate) indent: Range,
    pub(crate) tag_name: Range,
    pub(crate) name_pending: bool,
    /// The open-tag-name event fired and parse options were applied.
    pub(crate) name_reported: bool,
    /// True while the cursor sits directly after the name group or a glued
    /// suffix of it, where `/`, `(`, `|`, `#`, and `.` still bind to the
    /// tag rather than to an attribute.
    pub(crate) at_name_group: bool,
    pub(crate) shorthand_id: Option<Range>,
    pub(crate) shorthand_classes: Vec<Range>,
    pub(crate) var: Option<Range>,
    pub(crate) argument: Option<ValueRange>,
    pub(crate) params: Option<ValueRange>,
    pub(crate) attributes: Vec<AttrRecord>,
    pub(crate) body_mode: BodyMode,
    pub(crate) open_tag_only: bool,
    pub(crate) self_closed: bool,
    /// Inside a concise `[ … ]` attribute segment, where line endings do
    /// not end the tag.
    pub(crate) in_attr_group: bool,
}

impl OpenTagFrame {
    pub(crate) fn new(start: usize, concise: bool, indent: Range) -> Self {
        Self {
            start,
            end: start,
            concise,
            indent,
            tag_name: Range::new(start, start),
            name_pending: true,
            name_reported: false,
            at_name_group: false,
            shorthand_id: None,
            shorthand_classes: Vec::new(),
            var: None,
            argument: None,
            params: None,
            attributes: Vec::new(),
            body_mode: BodyMode::Html,
            open_tag_only: false,
            self_closed: false,
            in_attr_group: false,
        }
    }
}

pub(crate) struct AttrFrame {
    pub(crate) start: usize,
    pub(crate) name: Option<Range>,
    pub(crate) args: Option<ValueRange>,
    pub(crate) args_reported: bool,
    pub(crate) value: Option<ValueRange>,
    pub(crate) body: Option<ValueRange>,
    pub(crate) bound: bool,
    pub(crate) spread: bool,
    pub(crate) method: bool,
    pub(crate) default: bool,
}

impl AttrFrame {
    pub(crate) fn new(start: usize) -> Self {
        Self {
            start,
            name: None,
            args: None,
            args_reported: false,
            value: None,
            body: None,
            bound: false,
            spread: false,
            method: false,
            default: false,
        }
    }
}

/// What an expression is being scanned for. The purpose decides where the
/// child range is routed when the expression exits, and which error an
/// unterminated expression reports at end of input.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ExprPurpose {
    TagName,
    ShorthandId,
    ShorthandClass,
    TagVar,
    TagArgument { lparen: usize },
    TagParams { lbar: usize },
    AttrName,
    AttrValue {
        introducer: usize,
        spread: bool,
        bound: bool,
    },
    AttrArgument { lparen: usize },
    AttrBlock { lbrace: usize },
    Placeholder { dollar: usize, escape: bool },
    TemplateInterp,
    InlineScript { dollar: usize },
}

/// A terminator: one byte, or a multi-byte literal that must match at the
/// current position.
#[derive(Clone, Copy)]
pub(crate) enum Term {
    Byte(u8),
    Seq(&'static [u8]),
}

pub(crate) struct ExprFrame {
    pub(crate) start: usize,
    pub(crate) purpose: ExprPurpose,
    /// Expected closing byte for each open `(`/`[`/`{` group.
    pub(crate) group_stack: Vec<u8>,
    pub(crate) terminators: &'static [Term],
    pub(crate) terminated_by_ws: bool,
    pub(crate) terminated_by_eol: bool,
    pub(crate) skip_operators: bool,
    /// Consume a matched terminator instead of leaving it for the parent.
    pub(crate) consume_terminator: bool,
    /// Surface mode for the operator continuation rules.
    pub(crate) concise: bool,
    /// Previous non-whitespace byte, for regex/division disambiguation.
    /// Zero while nothing has been consumed.
    pub(crate) last_nonws: u8,
}

impl ExprFrame {
    pub(crate) fn new(start: usize, purpose: ExprPurpose, terminators: &'static [Term]) -> Self {
        Self {
            start,
            purpose,
            group_stack: Vec::new(),
            terminators,
            terminated_by_ws: false,
            terminated_by_eol: false,
            skip_operators: false,
            consume_terminator: false,
            concise: false,
            last_nonws: 0,
        }
    }

    pub(crate) fn ws_terminated(mut self) -> Self {
        self.terminated_by_ws = true;
        self
    }

    pub(crate) fn eol_terminated(mut self, yes: bool) -> Self {
        self.terminated_by_eol = yes;
        self
    }

    pub(crate) fn skip_ops(mut self) -> Self {
        self.skip_operators = true;
        self
    }

    /// Consume the matched terminator instead of leaving it to the parent.
    pub(crate) fn consuming(mut self) -> Self {
        self.consume_terminator = true;
        self
    }

    pub(crate) fn concise_mode(mut self, concise: bool) -> Self {
        self.concise = concise;
        self
    }
}

pub(crate) struct StrFrame {
    pub(crate) start: usize,
    pub(crate) quote: u8,
    pub(crate) escaped: bool,
}

pub(crate) struct TemplateFrame {
    pub(crate) start: usize,
    pub(crate) escaped: bool,
}

pub(crate) struct RegexFrame {
    pub(crate) start: usize,
    pub(crate) in_class: bool,
    pub(crate) escaped: bool,
}

pub(crate) struct LineCommentFrame {
    pub(crate) start: usize,
    /// Report the comment through `on_comment` (concise-level comments
    /// only; comments inside expressions are part of the expression).
    pub(crate) emit: bool,
}

pub(crate) struct BlockCommentFrame {
    pub(crate) start: usize,
    pub(crate) emit: bool,
    /// Comment opened at the start of a concise line; after it closes, the
    /// remainder of the line must be whitespace.
    pub(crate) concise_line: bool,
    pub(crate) star: bool,
}

// Terminator tables per syntax position and surface mode. Sequences come
// first so that a `/` is checked against `/>` before any single-byte rule
// could claim it.

pub(crate) const VALUE_TERMS_HTML: &[Term] = &[Term::Seq(b"/>"), Term::Byte(b'>'), Term::Byte(b',')];
pub(crate) const VALUE_TERMS_CONCISE: &[Term] =
    &[Term::Byte(b']'), Term::Byte(b';'), Term::Byte(b',')];

pub(crate) const NAME_TERMS_HTML: &[Term] = &[
    Term::Seq(b"/>"),
    Term::Seq(b":="),
    Term::Byte(b'>'),
    Term::Byte(b','),
    Term::Byte(b'('),
    Term::Byte(b'='),
];
pub(crate) const NAME_TERMS_CONCISE: &[Term] = &[
    Term::Seq(b":="),
    Term::Byte(b']'),
    Term::Byte(b';'),
    Term::Byte(b'='),
    Term::Byte(b','),
    Term::Byte(b'('),
];

pub(crate) const TAG_NAME_TERMS_HTML: &[Term] = &[
    Term::Seq(b"/>"),
    Term::Seq(b":="),
    Term::Byte(b'>'),
    Term::Byte(b'/'),
    Term::Byte(b'('),
    Term::Byte(b'|'),
    Term::Byte(b'#'),
    Term::Byte(b'.'),
    Term::Byte(b'='),
];
pub(crate) const TAG_NAME_TERMS_CONCISE: &[Term] = &[
    Term::Seq(b":="),
    Term::Byte(b'#'),
    Term::Byte(b'.'),
    Term::Byte(b'('),
    Term::Byte(b'|'),
    Term::Byte(b'/'),
    Term::Byte(b'='),
    Term::Byte(b';'),
    Term::Byte(b'['),
    Term::Byte(b']'),
    Term::Byte(b','),
];

pub(crate) const RBRACE_TERM: &[Term] = &[Term::Byte(b'}')];
pub(crate) const RPAREN_TERM: &[Term] = &[Term::Byte(b')')];
pub(crate) const RBAR_TERM: &[Term] = &[Term::Byte(b'|')];
pub(crate) const NO_TERMS: &[Term] = &[];
