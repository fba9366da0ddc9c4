//! Type annotations.

use super::Parser;
use crate::syntax::{DataTag, NodeKind};
use crate::token::TokenKind;

impl Parser<'_, '_> {
    /// `single (| single)*`; a lone member is not wrapped.
    pub(super) fn parse_type(&mut self) -> bool {
        self.skip_trivia();
        if !self.is_multiple_type() {
            return self.parse_single_type();
        }
        self.node(NodeKind::MultipleType, |p| {
            if !p.sub(Self::parse_single_type) {
                return false;
            }
            while p.eat(&TokenKind::Pipe, DataTag::Operator) {
                if !p.sub(Self::parse_single_type) {
                    return false;
                }
            }
            true
        })
    }

    fn parse_single_type(&mut self) -> bool {
        self.skip_trivia();
        match self.peek().map(|token| token.kind) {
            Some(TokenKind::LeftParen) => self.parse_function_type(),
            Some(TokenKind::Ampersand) => self.node(NodeKind::PointerType, |p| {
                p.bump(DataTag::Operator);
                p.sub(Self::parse_single_type)
            }),
            Some(TokenKind::At) => self.node(NodeKind::ObjectType, |p| {
                p.bump(DataTag::Punctuation);
                p.expect_identifier(DataTag::TypeName, "type name")
            }),
            Some(TokenKind::LeftBracket) => self.parse_collection_type(),
            Some(TokenKind::Identifier) => self.node(NodeKind::Type, |p| {
                p.bump(DataTag::TypeName);
                true
            }),
            _ => self.fail_expected("type"),
        }
    }

    /// `(parameters) => result`
    fn parse_function_type(&mut self) -> bool {
        self.node(NodeKind::FunctionType, |p| {
            p.bump(DataTag::Punctuation);
            if !p.eat(&TokenKind::RightParen, DataTag::Punctuation) {
                loop {
                    if !p.sub(Self::parse_type) {
                        return false;
                    }
                    if !p.eat(&TokenKind::Comma, DataTag::Punctuation) {
                        break;
                    }
                }
                if !p.expect(&TokenKind::RightParen, DataTag::Punctuation, "')'") {
                    return false;
                }
            }
            p.expect(&TokenKind::FatArrow, DataTag::Punctuation, "'=>'")
                && p.sub(Self::parse_single_type)
        })
    }

    /// `[element]` or `[key: value]`.
    fn parse_collection_type(&mut self) -> bool {
        let kind = if self.is_map_type() {
            NodeKind::MapType
        } else {
            NodeKind::ArrayType
        };
        self.node(kind, |p| {
            p.bump(DataTag::Punctuation);
            if !p.sub(Self::parse_type) {
                return false;
            }
            if kind == NodeKind::MapType
                && !(p.expect(&TokenKind::Colon, DataTag::Punctuation, "':'")
                    && p.sub(Self::parse_type))
            {
                return false;
            }
            p.expect(&TokenKind::RightBracket, DataTag::Punctuation, "']'")
        })
    }
}
