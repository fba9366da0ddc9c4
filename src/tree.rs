//! Tree-building receiver.
//!
//! Mirrors `node_start`/`node_end` with an explicit stack of open nodes
//! and materializes a node into its parent only on `node_commit`.

use std::fmt;

use crate::Error;
use crate::parser::SyntaxError;
use crate::receiver::Receiver;
use crate::syntax::{DataTag, NodeKind, SourceLocation};

/// A child of a [`SyntaxNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Data { tag: DataTag, text: String },
}

/// A committed production with its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: NodeKind,
    children: Vec<SyntaxElement>,
    location: Option<SourceLocation>,
}

impl SyntaxNode {
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            location: None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn children(&self) -> &[SyntaxElement] {
        &self.children
    }

    /// Span reported by the parser; `None` for productions that failed.
    #[must_use]
    pub const fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Direct child nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Data { .. } => None,
        })
    }

    /// Direct data payloads, trivia excluded.
    pub fn data(&self) -> impl Iterator<Item = (DataTag, &str)> {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Data { tag, text } if !tag.is_trivia() => Some((*tag, text.as_str())),
            _ => None,
        })
    }

    /// First direct child node of the given kind.
    #[must_use]
    pub fn child(&self, kind: NodeKind) -> Option<&Self> {
        self.nodes().find(|node| node.kind == kind)
    }

    /// All descendants of the given kind, in source order.
    #[must_use]
    pub fn find_all(&self, kind: NodeKind) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect(kind, &mut found);
        found
    }

    fn collect<'a>(&'a self, kind: NodeKind, found: &mut Vec<&'a Self>) {
        for node in self.nodes() {
            if node.kind == kind {
                found.push(node);
            }
            node.collect(kind, found);
        }
    }

    /// Concatenated payload text of the whole subtree, trivia included.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.write_text(out),
                SyntaxElement::Data { text, .. } => out.push_str(text),
            }
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{indent}{}", self.kind)?;
        if let Some(location) = &self.location {
            write!(f, " @{}:{}", location.line, location.column)?;
        }
        writeln!(f)?;
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.write_tree(f, depth + 1)?,
                SyntaxElement::Data { tag, .. } if tag.is_trivia() => {}
                SyntaxElement::Data { tag, text } => {
                    writeln!(f, "{indent}  {tag:?} {text:?}")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// Result of a tree-building parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    pub root: Option<SyntaxNode>,
    pub errors: Vec<SyntaxError>,
}

impl SyntaxTree {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.root.is_some() && self.errors.is_empty()
    }

    /// The root node when the parse produced no errors.
    pub fn into_result(self) -> Result<SyntaxNode, Error> {
        if !self.errors.is_empty() {
            return Err(Error::Syntax(self.errors));
        }
        self.root.ok_or(Error::Empty)
    }
}

/// Receiver that assembles committed nodes into a [`SyntaxTree`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<SyntaxNode>,
    pending: Option<SyntaxNode>,
    root: Option<SyntaxNode>,
    errors: Vec<SyntaxError>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics received so far.
    #[must_use]
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Number of nodes currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn finish(self) -> SyntaxTree {
        SyntaxTree {
            root: self.root,
            errors: self.errors,
        }
    }
}

impl Receiver for TreeBuilder {
    fn node_start(&mut self, kind: NodeKind) {
        self.pending = None;
        self.stack.push(SyntaxNode::new(kind));
    }

    fn node_end(&mut self, kind: NodeKind) {
        let Some(node) = self.stack.pop() else {
            log::warn!("node_end({kind}) with no open node");
            return;
        };
        if node.kind != kind {
            log::warn!("node_end({kind}) closes an open {}", node.kind);
        }
        self.pending = Some(node);
    }

    fn node_commit(&mut self) {
        let Some(node) = self.pending.take() else {
            log::warn!("node_commit with no pending node");
            return;
        };
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(SyntaxElement::Node(node)),
            None => self.root = Some(node),
        }
    }

    fn data(&mut self, tag: DataTag, text: &str) {
        if let Some(node) = self.stack.last_mut() {
            node.children.push(SyntaxElement::Data {
                tag,
                text: text.to_string(),
            });
        }
    }

    fn source_location(&mut self, location: &SourceLocation) {
        if let Some(node) = self.stack.last_mut() {
            node.location = Some(location.clone());
        }
    }

    fn error(&mut self, error: &SyntaxError) {
        self.errors.push(error.clone());
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.pending = None;
        self.root = None;
        self.errors.clear();
    }
}
