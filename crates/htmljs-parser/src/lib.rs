//! A streaming tokenizer for an HTML-superset templating syntax that
//! freely embeds JavaScript-style expressions.
//!
//! The parser consumes a byte buffer and reports a flat sequence of
//! range-tagged events through a [`TokenHandler`]: open tags, attributes,
//! text, placeholders, comments, and so on. It never builds a tree and
//! never copies source text; every event carries byte offsets into the
//! caller's buffer.
//!
//! Two surface syntaxes are recognized together: a verbose, angle-bracket
//! HTML form and a concise, indentation-delimited form. Parsing starts in
//! concise mode; a line beginning with `<` switches to the verbose form
//! for that element. Embedded expressions follow the lexical rules of the
//! embedded language, so a `>` inside a string, template literal, regular
//! expression, or bracketed group never ends a tag.
//!
//! ```
//! use htmljs_parser::{parse, Range, TokenHandler};
//!
//! #[derive(Default)]
//! struct TagNames(Vec<Range>);
//!
//! impl TokenHandler for TagNames {
//!     fn on_open_tag(&mut self, event: htmljs_parser::OpenTagEvent<'_>) {
//!         self.0.push(event.tag_name);
//!     }
//! }
//!
//! let source = b"<div class=greeting>Hello ${name}</div>";
//! let mut names = TagNames::default();
//! parse(source, &mut names);
//! assert_eq!(names.0[0].of(source), b"div");
//! ```

#[macro_use]
mod macros;

mod char_classes;
mod errors;
mod handler;
mod operators;
mod parser;
mod range;
mod states;

pub use errors::ErrorCode;
pub use handler::{
    AttrMethodEvent, AttrRecord, AttrValueEvent, BodyMode, CloseTagEvent, ErrorEvent,
    OpenTagEvent, OpenTagNameEvent, PlaceholderEvent, ScriptletEvent, TagEnding, TagParseOptions,
    TokenHandler,
};
pub use parser::parse;
pub use range::{Range, ValueRange};
