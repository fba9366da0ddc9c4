//! Lookahead predicates resolving the grammar's shared prefixes.
//!
//! Each predicate peeks as far as it needs and always releases the whole
//! peek session before returning, so the lexer is left exactly where it
//! was.

use super::{Parser, StatementShape};
use crate::token::{Token, TokenKind};

/// Keywords that may follow `@` in a selector.
pub(super) const OBJECT_KEYWORDS: [&str; 7] =
    ["this", "self", "parent", "root", "event", "key", "value"];

/// Identifiers that never start a whitespace-call argument.
const CONTINUATION_KEYWORDS: [&str; 5] = ["in", "else", "case", "default", "finally"];

impl Parser<'_, '_> {
    /// `path :` or `path =` whose right-hand side reaches a terminator
    /// before any block.
    pub(super) fn is_assignment(&mut self) -> bool {
        let result = self.scan_assignment();
        self.lexer.reset_peek();
        log::trace!("is_assignment: {result}");
        result
    }

    fn scan_assignment(&mut self) -> bool {
        match self.lexer.peek_significant() {
            Some(token) if token.kind == TokenKind::Identifier => {}
            Some(token) if token.kind == TokenKind::At => {
                if !self
                    .lexer
                    .peek_token()
                    .is_some_and(|token| is_object_keyword(&token))
                {
                    return false;
                }
            }
            _ => return false,
        }

        // Rest of the value path, up to the assignment sign.
        loop {
            let Some(token) = self.lexer.peek_token() else {
                return false;
            };
            match token.kind {
                TokenKind::Dot => {
                    if !self
                        .lexer
                        .peek_token()
                        .is_some_and(|token| token.kind == TokenKind::Identifier)
                    {
                        return false;
                    }
                }
                TokenKind::LeftBracket => {
                    if !self.skip_balanced(TokenKind::LeftBracket, TokenKind::RightBracket) {
                        return false;
                    }
                }
                TokenKind::LeftParen => {
                    if !self.skip_balanced(TokenKind::LeftParen, TokenKind::RightParen) {
                        return false;
                    }
                }
                TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment => {}
                TokenKind::Colon | TokenKind::Equals => break,
                _ => return false,
            }
        }

        // Right-hand side: a block before the terminator makes it a rule.
        let mut depth = 0usize;
        loop {
            let Some(token) = self.lexer.peek_token() else {
                return true;
            };
            match token.kind {
                TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Semicolon | TokenKind::RightBrace if depth == 0 => return true,
                TokenKind::LeftBrace if depth == 0 => return false,
                TokenKind::At if depth == 0 => {
                    // `@Type {` on the right-hand side is an object value;
                    // `@this` and friends are ordinary path heads.
                    if !self
                        .lexer
                        .peek_token()
                        .is_some_and(|token| is_object_keyword(&token))
                    {
                        return true;
                    }
                }
                _ => {}
            }
        }
    }

    /// Peek past a bracketed group whose opener was just peeked.
    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) -> bool {
        let mut depth = 1usize;
        while let Some(token) = self.lexer.peek_token() {
            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
        }
        false
    }

    /// Classify a statement by what it reaches first: a block, a `->`, or
    /// a terminator.
    pub(super) fn statement_shape(&mut self) -> StatementShape {
        let mut depth = 0usize;
        let shape = loop {
            let Some(token) = self.lexer.peek_token() else {
                break StatementShape::Other;
            };
            match token.kind {
                TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Arrow if depth == 0 => break StatementShape::SelectorCall,
                TokenKind::LeftBrace if depth == 0 => break StatementShape::Rule,
                TokenKind::Semicolon | TokenKind::RightBrace if depth == 0 => {
                    break StatementShape::Other;
                }
                _ => {}
            }
        };
        self.lexer.reset_peek();
        log::trace!("statement shape: {shape:?}");
        shape
    }

    /// Whitespace between selector fragments is a descendant combinator
    /// unless what follows is a combinator symbol, a block, an object
    /// sign, or the end of the chain.
    pub(super) fn whitespace_is_combinator(&mut self) -> bool {
        let next = self.lexer.peek_significant();
        self.lexer.reset_peek();
        next.is_some_and(|token| {
            !matches!(
                token.kind,
                TokenKind::Greater
                    | TokenKind::Plus
                    | TokenKind::Tilde
                    | TokenKind::LeftBrace
                    | TokenKind::At
                    | TokenKind::Comma
                    | TokenKind::Colon
                    | TokenKind::Arrow
                    | TokenKind::Semicolon
                    | TokenKind::RightBrace
            )
        })
    }

    /// Identifier + `(` is always a call; identifier + whitespace is a
    /// single-argument call when whitespace calls are permitted and the
    /// next significant token can start an argument.
    pub(super) fn is_call(&mut self) -> bool {
        let result = self.scan_call();
        self.lexer.reset_peek();
        result
    }

    fn scan_call(&mut self) -> bool {
        if !self
            .lexer
            .peek_token()
            .is_some_and(|token| token.kind == TokenKind::Identifier)
        {
            return false;
        }
        match self.lexer.peek_token().map(|token| token.kind) {
            Some(TokenKind::LeftParen) => true,
            Some(TokenKind::Whitespace) if self.whitespace_calls => {
                self.lexer.peek_significant().is_some_and(|token| {
                    !token.kind.is_punctuation()
                        && token.kind != TokenKind::Invalid
                        && !CONTINUATION_KEYWORDS
                            .iter()
                            .any(|keyword| token.is_keyword(keyword))
                })
            }
            _ => false,
        }
    }

    /// Identifier directly followed by `(`.
    pub(super) fn is_paren_call(&mut self) -> bool {
        let name = self.lexer.peek_token();
        let paren = self.lexer.peek_token();
        self.lexer.reset_peek();
        name.is_some_and(|token| token.kind == TokenKind::Identifier)
            && paren.is_some_and(|token| token.kind == TokenKind::LeftParen)
    }

    /// `@` followed by one of the object keywords.
    pub(super) fn is_object_selector(&mut self) -> bool {
        let sign = self.lexer.peek_token();
        let name = self.lexer.peek_token();
        self.lexer.reset_peek();
        sign.is_some_and(|token| token.kind == TokenKind::At)
            && name.is_some_and(|token| is_object_keyword(&token))
    }

    /// Current token followed directly by an identifier, as in `.name`,
    /// `#name` and `:name`.
    pub(super) fn is_sign_then_name(&mut self, sign: &TokenKind) -> bool {
        let first = self.lexer.peek_token();
        let name = self.lexer.peek_token();
        self.lexer.reset_peek();
        first.is_some_and(|token| token.kind == *sign)
            && name.is_some_and(|token| token.kind == TokenKind::Identifier)
    }

    /// A type followed by `|` at its own nesting level.
    pub(super) fn is_multiple_type(&mut self) -> bool {
        let mut depth = 0usize;
        let result = loop {
            let Some(token) = self.lexer.peek_token() else {
                break false;
            };
            match token.kind {
                TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket => {
                    if depth == 0 {
                        break false;
                    }
                    depth -= 1;
                }
                TokenKind::Pipe if depth == 0 => break true,
                TokenKind::Identifier
                | TokenKind::At
                | TokenKind::Ampersand
                | TokenKind::FatArrow
                | TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment => {}
                TokenKind::Comma | TokenKind::Colon if depth > 0 => {}
                _ => break false,
            }
        };
        self.lexer.reset_peek();
        result
    }

    /// `[key : value]` rather than `[element]`; the `[` is the next token.
    pub(super) fn is_map_type(&mut self) -> bool {
        self.lexer.peek_token();
        let mut depth = 0usize;
        let result = loop {
            let Some(token) = self.lexer.peek_token() else {
                break false;
            };
            match token.kind {
                TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                TokenKind::RightBracket => {
                    if depth == 0 {
                        break false;
                    }
                    depth -= 1;
                }
                TokenKind::Colon if depth == 0 => break true,
                _ => {}
            }
        };
        self.lexer.reset_peek();
        result
    }
}

pub(super) fn is_object_keyword(token: &Token) -> bool {
    token.kind == TokenKind::Identifier && OBJECT_KEYWORDS.contains(&token.text.as_str())
}
