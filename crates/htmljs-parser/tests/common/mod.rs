//! A handler that serializes every event to one line, with ranges resolved
//! against the source so expectations read like the input.

use htmljs_parser::{
    parse, AttrMethodEvent, AttrValueEvent, BodyMode, CloseTagEvent, ErrorEvent, OpenTagEvent,
    OpenTagNameEvent, PlaceholderEvent, Range, ScriptletEvent, TagParseOptions, TokenHandler,
    ValueRange,
};

pub struct Recorder<'a> {
    source: &'a [u8],
    pub events: Vec<String>,
    pub parsed_text: &'static [&'static str],
    pub static_text: &'static [&'static str],
    pub void: &'static [&'static str],
}

impl<'a> Recorder<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            events: Vec::new(),
            parsed_text: &[],
            static_text: &[],
            void: &[],
        }
    }

    fn s(&self, range: Range) -> String {
        String::from_utf8_lossy(range.of(self.source)).into_owned()
    }
}

impl TokenHandler for Recorder<'_> {
    fn on_text(&mut self, text: Range) {
        let slice = self.s(text);
        self.events.push(format!("text {:?}", slice));
    }

    fn on_placeholder(&mut self, event: PlaceholderEvent) {
        let slice = self.s(event.value);
        let marker = if event.escape { "" } else { "!" };
        self.events.push(format!("placeholder{} {:?}", marker, slice));
    }

    fn on_open_tag_name(&mut self, event: OpenTagNameEvent<'_>) -> Option<TagParseOptions> {
        let name = self.s(event.tag_name);
        let mut line = format!("tag_name {:?}", name);
        if let Some(id) = event.shorthand_id {
            line.push_str(&format!(" id={:?}", self.s(id)));
        }
        if !event.shorthand_class_names.is_empty() {
            let classes: Vec<String> = event
                .shorthand_class_names
                .iter()
                .map(|c| self.s(*c))
                .collect();
            line.push_str(&format!(" classes={:?}", classes));
        }
        self.events.push(line);

        if self.parsed_text.iter().any(|t| t.as_bytes() == name.as_bytes()) {
            Some(TagParseOptions {
                body: Some(BodyMode::ParsedText),
                open_tag_only: false,
            })
        } else if self.static_text.iter().any(|t| t.as_bytes() == name.as_bytes()) {
            Some(TagParseOptions {
                body: Some(BodyMode::StaticText),
                open_tag_only: false,
            })
        } else if self.void.iter().any(|t| t.as_bytes() == name.as_bytes()) {
            Some(TagParseOptions {
                body: None,
                open_tag_only: true,
            })
        } else {
            None
        }
    }

    fn on_open_tag(&mut self, event: OpenTagEvent<'_>) {
        let mut line = format!("open_tag {:?}", self.s(event.tag_name));
        if event.concise {
            line.push_str(" concise");
        }
        if event.self_closed {
            line.push_str(" self_closed");
        } else if event.open_tag_only {
            line.push_str(" open_only");
        }
        if let Some(var) = event.var {
            line.push_str(&format!(" var={:?}", self.s(var)));
        }
        if let Some(argument) = event.argument {
            line.push_str(&format!(" args={:?}", self.s(argument.value)));
        }
        if let Some(params) = event.params {
            line.push_str(&format!(" params={:?}", self.s(params.value)));
        }
        self.events.push(line);
    }

    fn on_close_tag(&mut self, event: CloseTagEvent) {
        let slice = self.s(event.tag_name);
        self.events.push(format!("close_tag {:?}", slice));
    }

    fn on_attr_name(&mut self, name: Range) {
        let slice = self.s(name);
        self.events.push(format!("attr_name {:?}", slice));
    }

    fn on_attr_args(&mut self, args: ValueRange) {
        let slice = self.s(args.value);
        self.events.push(format!("attr_args {:?}", slice));
    }

    fn on_attr_value(&mut self, event: AttrValueEvent) {
        let slice = self.s(event.value);
        let bound = if event.bound { " bound" } else { "" };
        self.events.push(format!("attr_value {:?}{}", slice, bound));
    }

    fn on_attr_spread(&mut self, value: ValueRange) {
        let slice = self.s(value.value);
        self.events.push(format!("attr_spread {:?}", slice));
    }

    fn on_attr_method(&mut self, event: AttrMethodEvent) {
        let params = self.s(event.params.outer());
        let body = self.s(event.body.value);
        self.events
            .push(format!("attr_method params={:?} body={:?}", params, body));
    }

    fn on_comment(&mut self, comment: ValueRange) {
        let slice = self.s(comment.value);
        self.events.push(format!("comment {:?}", slice));
    }

    fn on_cdata(&mut self, cdata: ValueRange) {
        let slice = self.s(cdata.value);
        self.events.push(format!("cdata {:?}", slice));
    }

    fn on_doctype(&mut self, doctype: ValueRange) {
        let slice = self.s(doctype.value);
        self.events.push(format!("doctype {:?}", slice));
    }

    fn on_declaration(&mut self, declaration: ValueRange) {
        let slice = self.s(declaration.value);
        self.events.push(format!("declaration {:?}", slice));
    }

    fn on_scriptlet(&mut self, event: ScriptletEvent) {
        let slice = self.s(event.value);
        let mut line = format!("scriptlet {:?}", slice);
        if event.tag {
            line.push_str(" tag");
        }
        if event.block {
            line.push_str(" block");
        }
        self.events.push(line);
    }

    fn on_error(&mut self, event: ErrorEvent) {
        self.events.push(format!("error {}", event.code.as_str()));
    }
}

pub fn record(source: &[u8]) -> Vec<String> {
    let mut recorder = Recorder::new(source);
    parse(source, &mut recorder);
    recorder.events
}

pub fn record_with(
    source: &[u8],
    parsed_text: &'static [&'static str],
    static_text: &'static [&'static str],
    void: &'static [&'static str],
) -> Vec<String> {
    let mut recorder = Recorder::new(source);
    recorder.parsed_text = parsed_text;
    recorder.static_text = static_text;
    recorder.void = void;
    parse(source, &mut recorder);
    recorder.events
}
