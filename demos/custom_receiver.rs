//! Count node kinds with a hand-written receiver, including nodes that
//! were started but never committed.

use std::collections::BTreeMap;

use weft_syntax::{DataTag, NodeKind, Receiver, SourceLocation, SyntaxError, parse};

#[derive(Default)]
struct Census {
    ended: Option<NodeKind>,
    committed: BTreeMap<NodeKind, usize>,
    discarded: usize,
    errors: Vec<String>,
}

impl Receiver for Census {
    fn node_start(&mut self, _kind: NodeKind) {
        if self.ended.take().is_some() {
            self.discarded += 1;
        }
    }

    fn node_end(&mut self, kind: NodeKind) {
        if self.ended.replace(kind).is_some() {
            self.discarded += 1;
        }
    }

    fn node_commit(&mut self) {
        if let Some(kind) = self.ended.take() {
            *self.committed.entry(kind).or_default() += 1;
        }
    }

    fn data(&mut self, _tag: DataTag, _text: &str) {}

    fn source_location(&mut self, _location: &SourceLocation) {}

    fn error(&mut self, error: &SyntaxError) {
        self.errors.push(error.to_string());
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn main() {
    let mut census = Census::default();
    parse(
        "var a = 1;\nbutton { width: ; }\nif (a) { print a; }",
        &mut census,
    );

    for (kind, count) in &census.committed {
        println!("{kind:>24} {count}");
    }
    println!("{:>24} {}", "discarded", census.discarded);
    for error in &census.errors {
        println!("error: {error}");
    }
}
