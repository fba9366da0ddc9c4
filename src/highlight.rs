//! HTML syntax highlighting driven by parse events.
//!
//! Every consumed token reaches the receiver exactly once, so stripping the
//! markup from the output gives back the source text.

use crate::parser::{SyntaxError, parse};
use crate::receiver::Receiver;
use crate::syntax::{DataTag, NodeKind, SourceLocation};

/// Highlight `source` as a sequence of `<span>` elements.
#[must_use]
pub fn highlight(source: &str) -> String {
    let mut highlighter = Highlighter::new();
    parse(source, &mut highlighter);
    highlighter.into_html()
}

/// Receiver rendering each data event as an HTML span.
///
/// The style class comes from the data tag, refined by the innermost
/// open node for punctuation.
#[derive(Debug, Default)]
pub struct Highlighter {
    out: String,
    open: Vec<NodeKind>,
    errors: Vec<SyntaxError>,
}

impl Highlighter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics received so far.
    #[must_use]
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    #[must_use]
    pub fn into_html(self) -> String {
        self.out
    }

    fn class(&self, tag: DataTag) -> Option<&'static str> {
        let class = match tag {
            DataTag::Whitespace | DataTag::Comment => return None,
            DataTag::Keyword => "keyword",
            DataTag::Modifier => "modifier",
            DataTag::Punctuation => match self.open.last() {
                Some(NodeKind::String) => "placeholder",
                Some(
                    NodeKind::Selector
                    | NodeKind::ObjectSelector
                    | NodeKind::Flag
                    | NodeKind::Filter,
                ) => "selector",
                _ => "punctuation",
            },
            DataTag::Operator => "operator",
            DataTag::Comparator => "comparator",
            DataTag::Combinator => "combinator",
            DataTag::Number => "number",
            DataTag::StringChunk => "string",
            DataTag::RawString => "raw-string",
            DataTag::Color => "color",
            DataTag::Constant => "constant",
            DataTag::TypeName => "type",
            DataTag::VarName => "variable",
            DataTag::PropertyName => "property",
            DataTag::FunctionName => "function",
            DataTag::ParameterName => "parameter",
            DataTag::ElementName => "element",
            DataTag::ClassName => "class",
            DataTag::IdName => "id",
            DataTag::FlagName => "flag",
            DataTag::ObjectKeyword => "object",
            DataTag::Language => "language",
            DataTag::ForeignContent => "foreign",
            DataTag::Invalid => "invalid",
        };
        Some(class)
    }
}

impl Receiver for Highlighter {
    fn node_start(&mut self, kind: NodeKind) {
        self.open.push(kind);
    }

    fn node_end(&mut self, kind: NodeKind) {
        let closed = self.open.pop();
        debug_assert_eq!(closed, Some(kind), "unbalanced node_end");
    }

    fn node_commit(&mut self) {}

    fn data(&mut self, tag: DataTag, text: &str) {
        match self.class(tag) {
            Some(class) => {
                self.out.push_str("<span class=\"weft-");
                self.out.push_str(class);
                self.out.push_str("\">");
                escape_into(&mut self.out, text);
                self.out.push_str("</span>");
            }
            None => escape_into(&mut self.out, text),
        }
    }

    fn source_location(&mut self, _location: &SourceLocation) {}

    fn error(&mut self, error: &SyntaxError) {
        self.errors.push(error.clone());
    }

    fn reset(&mut self) {
        self.out.clear();
        self.open.clear();
        self.errors.clear();
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
