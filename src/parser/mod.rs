//! Recursive-descent parser emitting events to a [`Receiver`].
//!
//! Every production follows the same shape: `node_start`, data and nested
//! productions while tokens are consumed, `source_location` on success,
//! `node_end`, and a `bool` result. The caller decides whether to send
//! `node_commit` for it. Grammar choices are made up front by lookahead
//! predicates (see `predicates.rs`) so failed productions only happen on
//! malformed input.

mod expressions;
mod predicates;
mod selectors;
mod statements;
mod types;

use std::fmt;

use crate::lexer::Lexer;
use crate::receiver::Receiver;
use crate::syntax::{DataTag, NodeKind, Range, SourceLocation};
use crate::token::{Position, Token, TokenKind};

/// Deepest node nesting the parser descends into before giving up on a
/// statement. Keeps recursion well inside a 2 MB thread stack.
pub const MAX_NESTING: usize = 256;

/// A recoverable syntax diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct SyntaxError {
    pub message: String,
    pub file: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}: ")?;
        }
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.line, self.column
        )
    }
}

impl SyntaxError {
    #[must_use]
    pub fn new(message: impl Into<String>, file: Option<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            file,
            line,
            column,
        }
    }
}

/// Settings for a single parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// File name reported in locations and errors.
    pub file: Option<String>,
    /// Whether `name argument` (a call without parentheses) is accepted.
    pub whitespace_calls: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            file: None,
            whitespace_calls: true,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub const fn whitespace_calls(mut self, enabled: bool) -> Self {
        self.whitespace_calls = enabled;
        self
    }
}

/// Parse `source` and report everything to `receiver`.
///
/// The whole result travels through receiver calls; errors are reported
/// with [`Receiver::error`] and never stop the parse.
pub fn parse(source: &str, receiver: &mut dyn Receiver) {
    parse_with(&ParseOptions::default(), source, receiver);
}

/// [`parse`] with explicit options.
pub fn parse_with(options: &ParseOptions, source: &str, receiver: &mut dyn Receiver) {
    let mut parser = Parser::new(source, options, receiver);
    parser.parse_document();
    log::debug!(
        "parsed {} bytes with {} error(s)",
        source.len(),
        parser.error_count
    );
}

/// What a statement looks like before the first `{` or terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementShape {
    Rule,
    SelectorCall,
    Other,
}

pub(crate) struct Parser<'a, 'r> {
    lexer: Lexer<'a>,
    receiver: &'r mut dyn Receiver,
    file: Option<String>,
    whitespace_calls: bool,
    /// Byte index past the last significant token consumed.
    last_end: usize,
    /// First failure of the statement being parsed.
    failure: Option<SyntaxError>,
    error_count: usize,
    /// Nodes currently open below the document.
    depth: usize,
}

impl<'a, 'r> Parser<'a, 'r> {
    fn new(source: &'a str, options: &ParseOptions, receiver: &'r mut dyn Receiver) -> Self {
        Self {
            lexer: Lexer::new(source),
            receiver,
            file: options.file.clone(),
            whitespace_calls: options.whitespace_calls,
            last_end: 0,
            failure: None,
            error_count: 0,
            depth: 0,
        }
    }

    fn parse_document(&mut self) {
        let start = self.lexer.position();
        self.receiver.node_start(NodeKind::Document);
        self.parse_statements(false);
        self.skip_trivia();
        self.finish(NodeKind::Document, start, true);
        self.receiver.node_commit();
    }

    /// Statement list up to a `}` (inside a block) or the end of input.
    ///
    /// A failed statement is reported once and skipped, so one malformed
    /// construct never takes the rest of the list with it.
    fn parse_statements(&mut self, in_block: bool) {
        loop {
            self.skip_trivia();
            let Some(token) = self.peek() else {
                break;
            };

            if token.kind == TokenKind::RightBrace {
                if in_block {
                    break;
                }
                self.failure = None;
                self.fail("unexpected '}'");
                self.recover(false);
                continue;
            }

            self.failure = None;
            if !self.sub(Self::parse_statement) {
                self.recover(in_block);
            }
        }
    }

    /// Report the pending failure and skip to the next statement boundary.
    ///
    /// Skipped tokens are wrapped in an `Invalid` node: through the next
    /// `;`, through a balanced `{...}`, or up to an unmatched `}`.
    fn recover(&mut self, stop_at_brace: bool) {
        let error = self.failure.take().unwrap_or_else(|| {
            let position = self.lexer.position();
            self.error_at("invalid statement", position)
        });
        log::debug!("recovering from: {error}");
        self.error_count += 1;
        self.receiver.error(&error);

        let start = self.lexer.position();
        self.receiver.node_start(NodeKind::Invalid);
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token.kind {
                // The enclosing block owns an unmatched `}`.
                TokenKind::RightBrace if depth == 0 && stop_at_brace => break,
                TokenKind::RightBrace if depth <= 1 => {
                    self.bump(DataTag::Invalid);
                    break;
                }
                TokenKind::RightBrace => {
                    depth -= 1;
                    self.bump(DataTag::Invalid);
                }
                TokenKind::LeftBrace => {
                    depth += 1;
                    self.bump(DataTag::Invalid);
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.bump(DataTag::Invalid);
                    break;
                }
                _ => {
                    self.bump(DataTag::Invalid);
                }
            }
        }
        self.finish(NodeKind::Invalid, start, true);
        self.receiver.node_commit();
    }

    // -- Event helpers --

    /// Run a production and commit its node when it succeeds.
    fn sub(&mut self, production: impl FnOnce(&mut Self) -> bool) -> bool {
        let ok = production(self);
        if ok {
            self.receiver.node_commit();
        }
        ok
    }

    /// Run `body` as a complete production of the given kind.
    fn node(&mut self, kind: NodeKind, body: impl FnOnce(&mut Self) -> bool) -> bool {
        let start = self.begin(kind);
        let ok = self.nested(body);
        self.finish(kind, start, ok)
    }

    /// [`Parser::node`] for productions whose leading whitespace is
    /// significant.
    fn node_here(&mut self, kind: NodeKind, body: impl FnOnce(&mut Self) -> bool) -> bool {
        self.receiver.node_start(kind);
        let start = self.lexer.position();
        let ok = self.nested(body);
        self.finish(kind, start, ok)
    }

    /// Run a node body one level deeper, failing once [`MAX_NESTING`] is
    /// reached.
    fn nested(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        if self.depth >= MAX_NESTING {
            return self.fail("nesting too deep");
        }
        self.depth += 1;
        let ok = body(self);
        self.depth -= 1;
        ok
    }

    /// Open a node after moving leading trivia into the parent.
    fn begin(&mut self, kind: NodeKind) -> Position {
        self.skip_trivia();
        self.receiver.node_start(kind);
        self.lexer.position()
    }

    /// Close a node, sending its location first when it succeeded.
    fn finish(&mut self, kind: NodeKind, start: Position, ok: bool) -> bool {
        if ok {
            let location = SourceLocation {
                file: self.file.clone(),
                line: start.line,
                column: start.column,
                range: Range {
                    offset: start.byte_index,
                    length: self.last_end.saturating_sub(start.byte_index),
                },
            };
            self.receiver.source_location(&location);
        }
        self.receiver.node_end(kind);
        ok
    }

    fn emit(&mut self, tag: DataTag, text: &str) {
        self.receiver.data(tag, text);
    }

    /// Consume the next token and report it as data.
    fn bump(&mut self, tag: DataTag) -> Option<Token> {
        let token = self.lexer.next_token()?;
        let tag = match token.kind {
            TokenKind::Whitespace if tag != DataTag::Combinator => DataTag::Whitespace,
            TokenKind::LineComment | TokenKind::BlockComment => DataTag::Comment,
            _ => {
                self.last_end = token.end();
                tag
            }
        };
        self.receiver.data(tag, &token.text);
        Some(token)
    }

    fn skip_trivia(&mut self) {
        while self.peek().is_some_and(|token| token.kind.is_trivia()) {
            self.bump(DataTag::Whitespace);
        }
    }

    // -- Lookahead helpers --

    fn peek(&mut self) -> Option<Token> {
        let token = self.lexer.peek_token();
        self.lexer.reset_peek();
        token
    }

    fn peek_significant(&mut self) -> Option<Token> {
        let token = self.lexer.peek_significant();
        self.lexer.reset_peek();
        token
    }

    fn at(&mut self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == *kind)
    }

    fn at_keyword(&mut self, keyword: &str) -> bool {
        self.peek().is_some_and(|token| token.is_keyword(keyword))
    }

    /// Next significant token is `keyword`.
    fn next_is_keyword(&mut self, keyword: &str) -> bool {
        self.peek_significant()
            .is_some_and(|token| token.is_keyword(keyword))
    }

    fn next_is(&mut self, kind: &TokenKind) -> bool {
        self.peek_significant()
            .is_some_and(|token| token.kind == *kind)
    }

    /// Consume an optional token; trivia is only taken when it is there.
    fn eat(&mut self, kind: &TokenKind, tag: DataTag) -> bool {
        if !self.next_is(kind) {
            return false;
        }
        self.skip_trivia();
        self.bump(tag);
        true
    }

    // -- Expectations --

    fn expect(&mut self, kind: &TokenKind, tag: DataTag, what: &str) -> bool {
        self.skip_trivia();
        if self.at(kind) {
            self.bump(tag);
            true
        } else {
            self.fail_expected(what)
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> bool {
        self.skip_trivia();
        if self.at_keyword(keyword) {
            self.bump(DataTag::Keyword);
            true
        } else {
            self.fail_expected(keyword)
        }
    }

    fn expect_identifier(&mut self, tag: DataTag, what: &str) -> bool {
        self.expect(&TokenKind::Identifier, tag, what)
    }

    fn fail_expected(&mut self, what: &str) -> bool {
        let message = match self.peek() {
            Some(token) => format!("expected {what}, found '{}'", token.text),
            None => format!("expected {what}, found end of input"),
        };
        self.fail(&message)
    }

    /// Record the first failure of the current statement. Always `false`.
    fn fail(&mut self, message: &str) -> bool {
        if self.failure.is_none() {
            let position = self
                .peek()
                .map_or_else(|| self.lexer.position(), |token| token.position);
            log::trace!("production failed: {message}");
            self.failure = Some(self.error_at(message, position));
        }
        false
    }

    fn error_at(&self, message: &str, position: Position) -> SyntaxError {
        SyntaxError::new(message, self.file.clone(), position.line, position.column)
    }

    /// Report a diagnostic immediately, outside statement recovery.
    fn report(&mut self, error: SyntaxError) {
        self.error_count += 1;
        self.receiver.error(&error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{SyntaxNode, TreeBuilder};

    fn tree(source: &str) -> (SyntaxNode, Vec<SyntaxError>) {
        let mut builder = TreeBuilder::new();
        parse(source, &mut builder);
        let tree = builder.finish();
        (tree.root.expect("document"), tree.errors)
    }

    #[test]
    fn document_is_always_produced() {
        let (root, errors) = tree("");
        assert_eq!(root.kind(), NodeKind::Document);
        assert!(errors.is_empty());
    }

    #[test]
    fn one_error_per_malformed_statement() {
        let (root, errors) = tree("var = ;\nvar x = 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 1);
        let declarations = root.find_all(NodeKind::Declaration);
        assert_eq!(declarations.len(), 1);
        assert!(declarations[0].text().contains('x'));
    }

    #[test]
    fn stray_closing_brace_is_skipped() {
        let (root, errors) = tree("} var x = 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unexpected '}'");
        assert_eq!(root.find_all(NodeKind::Declaration).len(), 1);
    }

    #[test]
    fn recovery_stops_at_enclosing_brace() {
        let (root, errors) = tree("button { color: ; } var y = 2;");
        assert_eq!(errors.len(), 1);
        assert_eq!(root.find_all(NodeKind::Rule).len(), 1);
        assert_eq!(root.find_all(NodeKind::Declaration).len(), 1);
    }

    #[test]
    fn recovery_skips_balanced_block() {
        let (root, errors) = tree("function (a) { return a; } var z;");
        assert_eq!(errors.len(), 1);
        let invalid = root.child(NodeKind::Invalid).expect("invalid");
        assert!(invalid.text().ends_with('}'));
        assert_eq!(root.find_all(NodeKind::Declaration).len(), 1);
    }

    #[test]
    fn file_name_flows_into_errors_and_locations() {
        let mut builder = TreeBuilder::new();
        let options = ParseOptions::new().file("main.weft");
        parse_with(&options, "var x = 1;\nvar = 2;", &mut builder);
        let tree = builder.finish();
        assert_eq!(tree.errors[0].file.as_deref(), Some("main.weft"));
        assert_eq!(tree.errors[0].line, 2);
        assert!(tree.errors[0].to_string().starts_with("main.weft: "));
        let root = tree.root.expect("root");
        let declaration = root.child(NodeKind::Declaration).expect("declaration");
        let location = declaration.location().expect("location");
        assert_eq!(location.file.as_deref(), Some("main.weft"));
        assert_eq!(location.range.offset, 0);
        assert_eq!(location.range.length, "var x = 1;".len());
    }

    #[test]
    fn whitespace_calls_can_be_disabled() {
        let mut builder = TreeBuilder::new();
        let options = ParseOptions::new().whitespace_calls(false);
        parse_with(&options, "print 1;", &mut builder);
        let tree = builder.finish();
        assert_eq!(tree.errors.len(), 1);
        let root = tree.root.expect("root");
        assert!(root.find_all(NodeKind::SingleArgumentCall).is_empty());
    }
}
