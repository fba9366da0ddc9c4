//! Lexer, event-driven parser, and receivers for the Weft language.
//!
//! The parser does not build a tree. It reports what it recognizes to a
//! [`Receiver`] as nested `node_start` / `data` / `node_end` /
//! `node_commit` events, and consumers decide what to keep. Two receivers
//! ship with the crate: [`TreeBuilder`] and [`Highlighter`].
//!
//! # Quick start
//!
//! ## Build a syntax tree
//!
//! ```
//! use weft_syntax::{NodeKind, parse_tree};
//!
//! let tree = parse_tree("button.primary { color: #ff0000; }");
//! let root = tree.into_result().unwrap();
//! assert_eq!(root.find_all(NodeKind::Rule).len(), 1);
//! assert_eq!(root.find_all(NodeKind::Color).len(), 1);
//! ```
//!
//! ## Stream events into your own receiver
//!
//! ```
//! use weft_syntax::{DataTag, NodeKind, Receiver, SourceLocation, SyntaxError, parse};
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl Receiver for Names {
//!     fn node_start(&mut self, _kind: NodeKind) {}
//!     fn node_end(&mut self, _kind: NodeKind) {}
//!     fn node_commit(&mut self) {}
//!     fn data(&mut self, tag: DataTag, text: &str) {
//!         if tag == DataTag::VarName {
//!             self.0.push(text.to_string());
//!         }
//!     }
//!     fn source_location(&mut self, _location: &SourceLocation) {}
//!     fn error(&mut self, _error: &SyntaxError) {}
//!     fn reset(&mut self) {}
//! }
//!
//! let mut names = Names::default();
//! parse("var width = 10;\nheight = width;", &mut names);
//! assert_eq!(names.0, ["width", "height", "width"]);
//! ```
//!
//! ## Highlight
//!
//! ```
//! let html = weft_syntax::highlight("var x = 1;");
//! assert!(html.contains("<span class=\"weft-keyword\">var</span>"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod highlight;
pub mod lexer;
pub mod parser;
pub mod receiver;
pub mod syntax;
pub mod token;
pub mod tree;

pub use highlight::{Highlighter, highlight};
pub use lexer::{Lexer, tokenize};
pub use parser::{MAX_NESTING, ParseOptions, SyntaxError, parse, parse_with};
pub use receiver::Receiver;
pub use syntax::{DataTag, NodeKind, Range, SourceLocation};
pub use token::{Placeholder, Position, StringToken, Token, TokenKind};
pub use tree::{SyntaxElement, SyntaxNode, SyntaxTree, TreeBuilder};

/// Unified error type for the convenience entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The source parsed with diagnostics; the first one is shown.
    #[error("{} ({} error(s))", .0.first().map(ToString::to_string).unwrap_or_default(), .0.len())]
    Syntax(Vec<SyntaxError>),
    /// The receiver never saw a committed document.
    #[error("no document was produced")]
    Empty,
}

/// Parse `source` into a [`SyntaxTree`] with default options.
#[must_use]
pub fn parse_tree(source: &str) -> SyntaxTree {
    parse_tree_with(&ParseOptions::default(), source)
}

/// [`parse_tree`] with explicit options.
#[must_use]
pub fn parse_tree_with(options: &ParseOptions, source: &str) -> SyntaxTree {
    let mut builder = TreeBuilder::new();
    parse_with(options, source, &mut builder);
    builder.finish()
}
