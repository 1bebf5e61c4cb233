use crate::errors::ErrorCode;
use crate::range::{Range, ValueRange};

/// How an open tag's body is lexed for the remainder of that tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyMode {
    /// Regular HTML content: nested tags, comments, placeholders.
    #[default]
    Html,
    /// Raw text in which `${…}` placeholders are still recognized, the way
    /// script and style bodies are usually handled.
    ParsedText,
    /// Raw text with nothing recognized but the closing tag.
    StaticText,
}

/// Options a handler may return from [`TokenHandler::on_open_tag_name`] to
/// steer how the parser treats the rest of the tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct TagParseOptions {
    /// Body mode for the tag. `None` keeps the default HTML body.
    pub body: Option<BodyMode>,
    /// Mark the tag void: it takes no body and no closing tag.
    pub open_tag_only: bool,
}

/// How an open tag's source text ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagEnding {
    /// `<div>` or a concise tag: a body and a closing tag may follow.
    Tag,
    /// A tag the handler marked void via [`TagParseOptions::open_tag_only`].
    OpenOnly,
    /// `<div/>`.
    SelfClosed,
}

/// One parsed attribute, reported in the open-tag event's attribute list.
///
/// The per-attribute events (`on_attr_name` and friends) have already fired
/// by the time the open-tag event carries this summary.
#[derive(Clone, Copy, Debug)]
pub struct AttrRecord {
    /// Name range. Zero-width when the attribute is the tag's shorthand
    /// value attribute (no name was written).
    pub name: Range,
    pub value: Option<ValueRange>,
    pub args: Option<ValueRange>,
    pub body: Option<ValueRange>,
    /// Value was introduced with `:=`.
    pub bound: bool,
    /// `...expr` spread attribute.
    pub spread: bool,
    /// `name(params) { body }` method shorthand.
    pub method: bool,
    /// Nameless first attribute (`<h1=title>`).
    pub default: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct PlaceholderEvent {
    pub start: usize,
    pub end: usize,
    /// Interior expression, excluding the `${`/`$!{` and `}` delimiters.
    pub value: Range,
    /// `${…}` escapes its output; `$!{…}` does not.
    pub escape: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct OpenTagNameEvent<'e> {
    /// Full name group including any shorthand id/class parts.
    pub start: usize,
    pub end: usize,
    pub tag_name: Range,
    pub shorthand_id: Option<Range>,
    pub shorthand_class_names: &'e [Range],
    pub concise: bool,
}

#[derive(Clone, Debug)]
pub struct OpenTagEvent<'e> {
    pub start: usize,
    pub end: usize,
    pub tag_name: Range,
    /// `<div/varName>` tag variable.
    pub var: Option<Range>,
    /// `<if(condition)>` tag argument, outer range including parentheses.
    pub argument: Option<ValueRange>,
    /// `<for|item|>` tag parameters, outer range including the bars.
    pub params: Option<ValueRange>,
    pub attributes: &'e [AttrRecord],
    pub shorthand_id: Option<Range>,
    pub shorthand_class_names: &'e [Range],
    pub concise: bool,
    /// True when the tag takes no body: self-closed or marked void.
    pub open_tag_only: bool,
    pub self_closed: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct CloseTagEvent {
    pub start: usize,
    pub end: usize,
    /// Zero-width for `</>` and for the synthetic closes emitted when
    /// concise-mode indentation ends a tag.
    pub tag_name: Range,
}

#[derive(Clone, Copy, Debug)]
pub struct AttrValueEvent {
    /// Outer range including the `=`/`:=` introducer.
    pub start: usize,
    pub end: usize,
    pub value: Range,
    pub bound: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct AttrMethodEvent {
    pub start: usize,
    pub end: usize,
    /// `(params)` range including parentheses.
    pub params: ValueRange,
    /// `{ body }` range including braces; `value` is the interior with
    /// surrounding whitespace trimmed.
    pub body: ValueRange,
}

#[derive(Clone, Copy, Debug)]
pub struct ScriptletEvent {
    pub start: usize,
    pub end: usize,
    pub value: Range,
    /// `<?…?>` tag form rather than a concise `$` line.
    pub tag: bool,
    /// Concise `$ { … }` block statement.
    pub block: bool,
}

#[derive(Clone, Debug)]
pub struct ErrorEvent {
    pub start: usize,
    pub end: usize,
    pub code: ErrorCode,
    pub message: String,
}

/// Callback surface invoked synchronously while parsing.
///
/// Every method has a no-op default, so a handler implements only the events
/// it cares about. Events arrive in strict source order; events for nested
/// constructs fire before the event of their enclosing construct.
pub trait TokenHandler {
    fn on_text(&mut self, _text: Range) {}
    fn on_placeholder(&mut self, _event: PlaceholderEvent) {}
    /// Fires as soon as the tag's name group is known, before any attribute
    /// events. The returned options switch the tag's body mode or mark it
    /// void for the remainder of the tag.
    fn on_open_tag_name(&mut self, _event: OpenTagNameEvent<'_>) -> Option<TagParseOptions> {
        None
    }
    fn on_open_tag(&mut self, _event: OpenTagEvent<'_>) {}
    fn on_close_tag(&mut self, _event: CloseTagEvent) {}
    fn on_attr_name(&mut self, _name: Range) {}
    fn on_attr_args(&mut self, _args: ValueRange) {}
    fn on_attr_value(&mut self, _event: AttrValueEvent) {}
    fn on_attr_spread(&mut self, _value: ValueRange) {}
    fn on_attr_method(&mut self, _event: AttrMethodEvent) {}
    fn on_comment(&mut self, _comment: ValueRange) {}
    fn on_cdata(&mut self, _cdata: ValueRange) {}
    fn on_doctype(&mut self, _doctype: ValueRange) {}
    fn on_declaration(&mut self, _declaration: ValueRange) {}
    fn on_scriptlet(&mut self, _event: ScriptletEvent) {}
    fn on_error(&mut self, _event: ErrorEvent) {}
    fn on_finish(&mut self) {}
}
