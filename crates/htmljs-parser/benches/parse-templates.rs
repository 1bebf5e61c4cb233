use htmljs_parser::{parse, OpenTagEvent, Range, TokenHandler};

fn main() {
    divan::main();
}

struct Counter {
    tags: usize,
    text_bytes: usize,
}

impl TokenHandler for Counter {
    fn on_open_tag(&mut self, _event: OpenTagEvent<'_>) {
        self.tags += 1;
    }
    fn on_text(&mut self, text: Range) {
        self.text_bytes += text.len();
    }
}

/// A representative template mixing both surface syntaxes, attribute
/// expressions, placeholders, and a script body.
fn build_template(repeats: usize) -> Vec<u8> {
    let chunk = concat!(
        "div.page#main\n",
        "  <header class=site-header data-idx=i + 1>\n",
        "    <h1>Welcome ${user.name}!</h1>\n",
        "  </header>\n",
        "  ul [ class=items role=list ]\n",
        "    li -- Item ${i} of ${total}\n",
        "  $ const total = items.length;\n",
        "  // per-page footer\n",
        "  span hello\n",
    );
    chunk.as_bytes().repeat(repeats)
}

#[divan::bench(args = [16, 256])]
fn parse_template(bencher: divan::Bencher, repeats: usize) {
    let input = build_template(repeats);

    bencher.bench(|| {
        let mut counter = Counter {
            tags: 0,
            text_bytes: 0,
        };
        parse(&input, &mut counter);
        divan::black_box((counter.tags, counter.text_bytes))
    });
}
