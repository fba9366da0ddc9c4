//! Expressions, literals, value paths and calls.

use super::Parser;
use crate::syntax::{DataTag, NodeKind};
use crate::token::{Placeholder, TokenKind};

const fn operator_tag(kind: &TokenKind) -> Option<DataTag> {
    match kind {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::Caret
        | TokenKind::AndAnd
        | TokenKind::OrOr
        | TokenKind::DoubleDot => Some(DataTag::Operator),
        TokenKind::EqualEqual
        | TokenKind::NotEqual
        | TokenKind::Less
        | TokenKind::LessEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual => Some(DataTag::Comparator),
        _ => None,
    }
}

impl Parser<'_, '_> {
    /// `unary (operator unary)*`, kept flat: operators and comparators are
    /// tagged data between the operand nodes.
    pub(super) fn parse_expression(&mut self) -> bool {
        self.node(NodeKind::Expression, Self::expression_body)
    }

    /// An expression used as a statement, closed by `;`.
    pub(super) fn parse_expression_statement(&mut self) -> bool {
        self.node(NodeKind::Expression, |p| {
            p.expression_body() && p.expect(&TokenKind::Semicolon, DataTag::Punctuation, "';'")
        })
    }

    fn expression_body(&mut self) -> bool {
        if !self.sub(Self::parse_unary) {
            return false;
        }
        loop {
            let Some(tag) = self
                .peek_significant()
                .and_then(|token| operator_tag(&token.kind))
            else {
                return true;
            };
            self.skip_trivia();
            self.bump(tag);
            if !self.sub(Self::parse_unary) {
                return false;
            }
        }
    }

    /// `!x`, `-x`, or a primary.
    fn parse_unary(&mut self) -> bool {
        self.skip_trivia();
        if self
            .peek()
            .is_some_and(|token| matches!(token.kind, TokenKind::Bang | TokenKind::Minus))
        {
            return self.node(NodeKind::Unary, |p| {
                p.bump(DataTag::Operator);
                p.sub(Self::parse_unary)
            });
        }
        self.parse_primary()
    }

    pub(super) fn parse_primary(&mut self) -> bool {
        self.skip_trivia();
        let Some(token) = self.peek() else {
            return self.fail_expected("expression");
        };
        match &token.kind {
            kind if kind.is_number() => self.literal(NodeKind::Number, DataTag::Number),
            TokenKind::DoubleQuoted(_) | TokenKind::SingleQuoted(_) => self.parse_string(),
            TokenKind::RawString => self.literal(NodeKind::RawString, DataTag::RawString),
            TokenKind::Hash => self.parse_color(),
            TokenKind::LeftParen => self.parse_parenthesized(),
            TokenKind::LeftBracket => self.parse_array(),
            TokenKind::Dollar => self.parse_builtin_call(),
            TokenKind::At if self.is_object_selector() => self.parse_value_path(),
            TokenKind::At => self.parse_object_definition(),
            TokenKind::Identifier => match token.text.as_str() {
                "true" | "false" | "null" => self.literal(NodeKind::Constant, DataTag::Constant),
                "new" => self.parse_new(),
                _ => self.parse_value_path(),
            },
            _ => self.fail_expected("expression"),
        }
    }

    /// Single-token literal.
    fn literal(&mut self, kind: NodeKind, tag: DataTag) -> bool {
        self.node(kind, |p| p.bump(tag).is_some())
    }

    /// `#` followed by a hex run, read with hex preference switched on.
    fn parse_color(&mut self) -> bool {
        self.node(NodeKind::Color, |p| {
            p.bump(DataTag::Punctuation);
            let saved = p.lexer.hex_preferred();
            p.lexer.set_hex_preferred(true);
            let token = p.lexer.next_token();
            p.lexer.set_hex_preferred(saved);

            match token {
                Some(token) if token.kind.is_hex_number() => {
                    p.last_end = token.end();
                    p.emit(DataTag::Color, &token.text);
                    true
                }
                Some(_) => {
                    p.lexer.rewind();
                    p.fail_expected("hex color")
                }
                None => p.fail_expected("hex color"),
            }
        })
    }

    fn parse_parenthesized(&mut self) -> bool {
        self.node(NodeKind::Expression, |p| {
            p.bump(DataTag::Punctuation);
            p.sub(Self::parse_expression)
                && p.expect(&TokenKind::RightParen, DataTag::Punctuation, "')'")
        })
    }

    fn parse_array(&mut self) -> bool {
        self.node(NodeKind::Array, |p| {
            p.bump(DataTag::Punctuation);
            if p.eat(&TokenKind::RightBracket, DataTag::Punctuation) {
                return true;
            }
            loop {
                if !p.sub(Self::parse_expression) {
                    return false;
                }
                if !p.eat(&TokenKind::Comma, DataTag::Punctuation) {
                    return p.expect(&TokenKind::RightBracket, DataTag::Punctuation, "']'");
                }
            }
        })
    }

    /// `new Type` or `new Type(arguments)`.
    fn parse_new(&mut self) -> bool {
        self.node(NodeKind::New, |p| {
            p.bump(DataTag::Keyword);
            p.expect_identifier(DataTag::TypeName, "type name")
                && (!p.at(&TokenKind::LeftParen) || p.parse_arguments())
        })
    }

    /// `$name(arguments)`
    fn parse_builtin_call(&mut self) -> bool {
        self.node(NodeKind::BuiltinCall, |p| {
            p.bump(DataTag::Punctuation);
            p.expect_identifier(DataTag::FunctionName, "builtin name") && p.parse_arguments()
        })
    }

    /// `( argument (, argument)* )` emitted into the caller's node.
    pub(super) fn parse_arguments(&mut self) -> bool {
        if !self.expect(&TokenKind::LeftParen, DataTag::Punctuation, "'('") {
            return false;
        }
        if self.eat(&TokenKind::RightParen, DataTag::Punctuation) {
            return true;
        }
        loop {
            if !self.sub(Self::parse_argument) {
                return false;
            }
            if !self.eat(&TokenKind::Comma, DataTag::Punctuation) {
                return self.expect(&TokenKind::RightParen, DataTag::Punctuation, "')'");
            }
        }
    }

    fn parse_argument(&mut self) -> bool {
        self.node(NodeKind::Argument, |p| {
            p.eat(&TokenKind::Ellipsis, DataTag::Operator);
            p.sub(Self::parse_expression)
        })
    }

    /// `head (.name | [index])*` where any name may be a call.
    pub(super) fn parse_value_path(&mut self) -> bool {
        self.node(NodeKind::ValuePath, |p| {
            let head = if p.is_object_selector() {
                p.sub(Self::parse_object_selector)
            } else {
                p.parse_path_segment(DataTag::VarName)
            };
            if !head {
                return false;
            }
            loop {
                let ok = if p.is_sign_then_name(&TokenKind::Dot) {
                    p.bump(DataTag::Punctuation);
                    p.parse_path_segment(DataTag::PropertyName)
                } else if p.at(&TokenKind::LeftBracket) {
                    p.sub(Self::parse_index_accessor)
                } else {
                    return true;
                };
                if !ok {
                    return false;
                }
            }
        })
    }

    fn parse_path_segment(&mut self, tag: DataTag) -> bool {
        if !self.at(&TokenKind::Identifier) {
            return self.fail_expected("name");
        }
        if self.is_call() {
            return self.sub(Self::parse_call);
        }
        self.bump(tag);
        true
    }

    /// `name(arguments)` or the whitespace form `name argument`.
    fn parse_call(&mut self) -> bool {
        if self.is_paren_call() {
            self.node(NodeKind::FunctionCall, |p| {
                p.bump(DataTag::FunctionName);
                p.parse_arguments()
            })
        } else {
            self.node(NodeKind::SingleArgumentCall, |p| {
                p.bump(DataTag::FunctionName);
                p.sub(Self::parse_argument)
            })
        }
    }

    fn parse_index_accessor(&mut self) -> bool {
        self.node(NodeKind::IndexAccessor, |p| {
            p.bump(DataTag::Punctuation);
            p.sub(Self::parse_expression)
                && p.expect(&TokenKind::RightBracket, DataTag::Punctuation, "']'")
        })
    }

    /// Quoted string; placeholders are parsed in place as expressions.
    pub(super) fn parse_string(&mut self) -> bool {
        self.node(NodeKind::String, |p| {
            let Some(token) = p.lexer.next_token() else {
                return p.fail_expected("string");
            };
            p.last_end = token.end();
            let placeholders = token
                .kind
                .string_token()
                .map(|string| string.placeholders.clone())
                .unwrap_or_default();
            if placeholders.is_empty() {
                p.emit(DataTag::StringChunk, &token.text);
                return true;
            }

            let resume = p.lexer.position();
            let body_end = token.end() - 1;
            let mut chunk_start = token.position.byte_index;
            for placeholder in placeholders {
                if placeholder.position.byte_index < chunk_start {
                    continue;
                }
                let chunk = p.lexer.slice(chunk_start, placeholder.position.byte_index);
                if !chunk.is_empty() {
                    p.emit(DataTag::StringChunk, chunk);
                }
                chunk_start = p.parse_placeholder(placeholder, body_end);
            }
            let tail = p.lexer.slice(chunk_start, token.end());
            p.emit(DataTag::StringChunk, tail);

            p.lexer.seek(resume);
            p.last_end = token.end();
            true
        })
    }

    /// Parse one placeholder inside a string body and return the byte
    /// index where plain string text resumes.
    ///
    /// Whitespace calls are off inside placeholders so `"%name rest"` does
    /// not read `rest` as an argument; the flag is restored on every path.
    fn parse_placeholder(&mut self, placeholder: Placeholder, body_end: usize) -> usize {
        self.lexer.seek(placeholder.position);
        let saved_limit = self.lexer.limit();
        self.lexer.set_limit(Some(body_end));
        let saved_calls = self.whitespace_calls;
        self.whitespace_calls = false;
        let saved_failure = self.failure.take();

        self.bump(DataTag::Punctuation);
        let ok = if placeholder.braced {
            self.bump(DataTag::Punctuation);
            self.sub(Self::parse_expression)
                && self.expect(&TokenKind::RightBrace, DataTag::Punctuation, "'}'")
        } else {
            self.sub(Self::parse_value_path)
        };

        self.whitespace_calls = saved_calls;
        self.lexer.set_limit(saved_limit);

        let mut resume = self.lexer.position().byte_index;
        if !ok {
            let error = self.failure.take().unwrap_or_else(|| {
                self.error_at("invalid string placeholder", placeholder.position)
            });
            self.report(error);
            if resume < placeholder.end {
                let rest = self.lexer.slice(resume, placeholder.end);
                self.emit(DataTag::Invalid, rest);
                resume = placeholder.end;
            }
        }
        self.failure = saved_failure;
        resume
    }
}
