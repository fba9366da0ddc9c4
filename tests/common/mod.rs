#![allow(dead_code)]

use weft_syntax::{
    DataTag, NodeKind, Receiver, SourceLocation, SyntaxError, SyntaxNode, parse, parse_tree,
};

/// One recorded receiver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(NodeKind),
    End(NodeKind),
    Commit,
    Data(DataTag, String),
    Location(SourceLocation),
    Error(SyntaxError),
}

/// Receiver that records every call and checks the nesting discipline
/// as events arrive.
#[derive(Debug, Default)]
pub struct RecordingReceiver {
    pub events: Vec<Event>,
    open: Vec<NodeKind>,
    pending: bool,
}

impl RecordingReceiver {
    /// Concatenation of every data payload, in arrival order.
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Data(_, text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&SyntaxError> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Error(error) => Some(error),
                _ => None,
            })
            .collect()
    }

    pub fn is_balanced(&self) -> bool {
        self.open.is_empty()
    }
}

impl Receiver for RecordingReceiver {
    fn node_start(&mut self, kind: NodeKind) {
        self.pending = false;
        self.open.push(kind);
        self.events.push(Event::Start(kind));
    }

    fn node_end(&mut self, kind: NodeKind) {
        assert_eq!(self.open.pop(), Some(kind), "node_end does not match node_start");
        self.pending = true;
        self.events.push(Event::End(kind));
    }

    fn node_commit(&mut self) {
        assert!(self.pending, "node_commit without a pending node");
        self.pending = false;
        self.events.push(Event::Commit);
    }

    fn data(&mut self, tag: DataTag, text: &str) {
        assert!(!self.open.is_empty(), "data outside any node");
        self.events.push(Event::Data(tag, text.to_string()));
    }

    fn source_location(&mut self, location: &SourceLocation) {
        assert!(!self.open.is_empty(), "location outside any node");
        self.events.push(Event::Location(location.clone()));
    }

    fn error(&mut self, error: &SyntaxError) {
        self.events.push(Event::Error(error.clone()));
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn record(source: &str) -> RecordingReceiver {
    let mut receiver = RecordingReceiver::default();
    parse(source, &mut receiver);
    receiver
}

/// Parse and return the document, failing on any diagnostic.
pub fn parse_ok(source: &str) -> SyntaxNode {
    parse_tree(source)
        .into_result()
        .unwrap_or_else(|e| panic!("unexpected parse failure: {e}\n--- source ---\n{source}"))
}

/// Kinds of the document's direct children.
pub fn top_level(source: &str) -> Vec<NodeKind> {
    parse_ok(source).nodes().map(SyntaxNode::kind).collect()
}

/// Drop tags and decode the escapes `highlight` produces.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
