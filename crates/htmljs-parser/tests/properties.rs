//! Property tests over arbitrary input. The parser must never panic, must
//! keep every reported range inside the buffer, must report text spans in
//! order without overlap, must stay silent after its first error, and must
//! be deterministic.

mod common;

use htmljs_parser::{
    parse, AttrValueEvent, CloseTagEvent, ErrorEvent, OpenTagEvent, PlaceholderEvent, Range,
    TokenHandler, ValueRange,
};
use quickcheck_macros::quickcheck;

/// Collects the facts the properties below assert on.
#[derive(Default)]
struct Auditor {
    len: usize,
    ranges: Vec<(usize, usize)>,
    text_spans: Vec<(usize, usize)>,
    errors: usize,
    events_after_error: usize,
    finished: usize,
}

impl Auditor {
    fn new(len: usize) -> Self {
        Self {
            len,
            ..Default::default()
        }
    }

    fn saw_range(&mut self, start: usize, end: usize) {
        if self.errors > 0 {
            self.events_after_error += 1;
        }
        self.ranges.push((start, end));
    }

    fn saw_value(&mut self, value: ValueRange) {
        self.saw_range(value.start, value.end);
        self.ranges.push((value.value.start, value.value.end));
    }
}

impl TokenHandler for Auditor {
    fn on_text(&mut self, text: Range) {
        self.saw_range(text.start, text.end);
        self.text_spans.push((text.start, text.end));
    }
    fn on_placeholder(&mut self, event: PlaceholderEvent) {
        self.saw_range(event.start, event.end);
        self.ranges.push((event.value.start, event.value.end));
    }
    fn on_open_tag(&mut self, event: OpenTagEvent<'_>) {
        self.saw_range(event.start, event.end);
        self.ranges.push((event.tag_name.start, event.tag_name.end));
        for attr in event.attributes {
            self.ranges.push((attr.name.start, attr.name.end));
        }
    }
    fn on_close_tag(&mut self, event: CloseTagEvent) {
        self.saw_range(event.start, event.end);
    }
    fn on_attr_name(&mut self, name: Range) {
        self.saw_range(name.start, name.end);
    }
    fn on_attr_args(&mut self, args: ValueRange) {
        self.saw_value(args);
    }
    fn on_attr_value(&mut self, event: AttrValueEvent) {
        self.saw_range(event.start, event.end);
        self.ranges.push((event.value.start, event.value.end));
    }
    fn on_attr_spread(&mut self, value: ValueRange) {
        self.saw_value(value);
    }
    fn on_comment(&mut self, comment: ValueRange) {
        self.saw_value(comment);
    }
    fn on_cdata(&mut self, cdata: ValueRange) {
        self.saw_value(cdata);
    }
    fn on_doctype(&mut self, doctype: ValueRange) {
        self.saw_value(doctype);
    }
    fn on_declaration(&mut self, declaration: ValueRange) {
        self.saw_value(declaration);
    }
    fn on_error(&mut self, event: ErrorEvent) {
        assert!(event.end <= self.len);
        assert!(event.start <= event.end);
        self.errors += 1;
    }
    fn on_finish(&mut self) {
        self.finished += 1;
    }
}

fn audit(data: &[u8]) -> Auditor {
    let mut auditor = Auditor::new(data.len());
    parse(data, &mut auditor);
    auditor
}

/// Map arbitrary bytes onto the parser's significant alphabet so random
/// inputs actually reach the interesting states.
fn squash(data: &[u8]) -> Vec<u8> {
    const ALPHABET: &[u8] = b"<>=/${}`'\"\n\r ;,.[]()|#!-a1:\t\\*+";
    data.iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()])
        .collect()
}

#[quickcheck]
fn never_panics_and_ranges_stay_in_bounds(data: Vec<u8>) -> bool {
    for input in [data.clone(), squash(&data)] {
        let auditor = audit(&input);
        assert_eq!(auditor.finished, 1);
        for (start, end) in &auditor.ranges {
            assert!(start <= end, "range {}..{} inverted", start, end);
            assert!(*end <= input.len(), "range {}..{} out of bounds", start, end);
        }
    }
    true
}

#[quickcheck]
fn text_spans_are_ordered_and_disjoint(data: Vec<u8>) -> bool {
    let input = squash(&data);
    let auditor = audit(&input);
    let mut last_end = 0;
    for (start, end) in &auditor.text_spans {
        assert!(
            *start >= last_end,
            "text span {}..{} overlaps the previous one ending at {}",
            start,
            end,
            last_end
        );
        last_end = *end;
    }
    true
}

#[quickcheck]
fn errors_are_single_shot(data: Vec<u8>) -> bool {
    let input = squash(&data);
    let auditor = audit(&input);
    assert!(auditor.errors <= 1);
    assert_eq!(auditor.events_after_error, 0);
    true
}

#[quickcheck]
fn parsing_is_deterministic(data: Vec<u8>) -> bool {
    let input = squash(&data);
    let first = common::record(&input);
    let second = common::record(&input);
    first == second
}
