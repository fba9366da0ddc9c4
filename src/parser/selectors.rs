//! The element-selection grammar: selectors, combinators, rules and
//! object definitions.

use super::Parser;
use crate::syntax::{DataTag, NodeKind};
use crate::token::TokenKind;

const fn is_combinator_symbol(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Greater | TokenKind::Plus | TokenKind::Tilde
    )
}

impl Parser<'_, '_> {
    /// `chain (, chain)* :? block`
    pub(super) fn parse_rule(&mut self) -> bool {
        self.node(NodeKind::Rule, |p| {
            if !p.sub(Self::parse_selector_chain) {
                return false;
            }
            while p.eat(&TokenKind::Comma, DataTag::Punctuation) {
                if !p.sub(Self::parse_selector_chain) {
                    return false;
                }
            }
            p.eat(&TokenKind::Colon, DataTag::Punctuation);
            p.sub(Self::parse_block)
        })
    }

    /// `chain -> name(arguments);`
    pub(super) fn parse_selector_call(&mut self) -> bool {
        self.node(NodeKind::SelectorCall, |p| {
            p.sub(Self::parse_selector_chain)
                && p.expect(&TokenKind::Arrow, DataTag::Punctuation, "'->'")
                && p.expect_identifier(DataTag::FunctionName, "function name")
                && p.parse_arguments()
                && p.expect(&TokenKind::Semicolon, DataTag::Punctuation, "';'")
        })
    }

    pub(super) fn parse_selector_chain(&mut self) -> bool {
        self.node(NodeKind::SelectorChain, |p| {
            if !p.sub(Self::parse_selector) {
                return false;
            }
            loop {
                let Some(token) = p.peek() else {
                    return true;
                };
                if token.kind.is_trivia() {
                    if p.whitespace_is_combinator() {
                        if !p.sub(Self::parse_whitespace_combinator) || !p.sub(Self::parse_selector)
                        {
                            return false;
                        }
                        continue;
                    }
                    // Formatting only, unless an explicit combinator follows.
                    if !p
                        .peek_significant()
                        .is_some_and(|token| is_combinator_symbol(&token.kind))
                    {
                        return true;
                    }
                    p.skip_trivia();
                    continue;
                }
                if !is_combinator_symbol(&token.kind) {
                    return true;
                }
                if !p.sub(Self::parse_combinator) || !p.sub(Self::parse_selector) {
                    return false;
                }
            }
        })
    }

    fn parse_combinator(&mut self) -> bool {
        self.node(NodeKind::Combinator, |p| {
            p.bump(DataTag::Combinator);
            true
        })
    }

    /// Whitespace standing for the descendant combinator.
    fn parse_whitespace_combinator(&mut self) -> bool {
        self.node_here(NodeKind::Combinator, |p| {
            let mut consumed = false;
            while p.peek().is_some_and(|token| token.kind.is_trivia()) {
                p.bump(DataTag::Combinator);
                consumed = true;
            }
            consumed
        })
    }

    /// Optional head (`name`, `*` or an object selector) followed by any
    /// number of classes, ids, flags and filters, all without whitespace.
    pub(super) fn parse_selector(&mut self) -> bool {
        self.node(NodeKind::Selector, |p| {
            let mut parts = 0usize;
            match p.peek().map(|token| token.kind) {
                Some(TokenKind::Identifier | TokenKind::Star) => {
                    p.bump(DataTag::ElementName);
                    parts += 1;
                }
                Some(TokenKind::At) if p.is_object_selector() => {
                    if !p.sub(Self::parse_object_selector) {
                        return false;
                    }
                    parts += 1;
                }
                _ => {}
            }

            loop {
                if p.is_sign_then_name(&TokenKind::Dot) {
                    p.bump(DataTag::Punctuation);
                    p.bump(DataTag::ClassName);
                } else if p.is_sign_then_name(&TokenKind::Hash) {
                    p.bump(DataTag::Punctuation);
                    p.bump(DataTag::IdName);
                } else if p.is_sign_then_name(&TokenKind::Colon) {
                    if !p.sub(Self::parse_flag) {
                        return false;
                    }
                } else if p.at(&TokenKind::LeftBracket) {
                    if !p.sub(Self::parse_filter) {
                        return false;
                    }
                } else {
                    break;
                }
                parts += 1;
            }

            parts > 0 || p.fail_expected("selector")
        })
    }

    /// `@this`, `@parent`, ...
    pub(super) fn parse_object_selector(&mut self) -> bool {
        self.node(NodeKind::ObjectSelector, |p| {
            p.bump(DataTag::Punctuation);
            p.bump(DataTag::ObjectKeyword);
            true
        })
    }

    /// `:name` or `:name(arguments)`.
    fn parse_flag(&mut self) -> bool {
        self.node(NodeKind::Flag, |p| {
            p.bump(DataTag::Punctuation);
            p.bump(DataTag::FlagName);
            !p.at(&TokenKind::LeftParen) || p.parse_arguments()
        })
    }

    /// `[expression]`
    fn parse_filter(&mut self) -> bool {
        self.node(NodeKind::Filter, |p| {
            p.bump(DataTag::Punctuation);
            p.sub(Self::parse_expression)
                && p.expect(&TokenKind::RightBracket, DataTag::Punctuation, "']'")
        })
    }

    /// `@Type { ... }` or the anonymous `@ { ... }`.
    pub(super) fn parse_object_definition(&mut self) -> bool {
        self.node(NodeKind::ObjectDefinition, |p| {
            p.bump(DataTag::Punctuation);
            if p.next_is(&TokenKind::Identifier) {
                p.skip_trivia();
                p.bump(DataTag::TypeName);
            }
            p.sub(Self::parse_block)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::syntax::{DataTag, NodeKind};
    use crate::tree::{SyntaxNode, TreeBuilder};

    fn root(source: &str) -> SyntaxNode {
        let mut builder = TreeBuilder::new();
        parse(source, &mut builder);
        let tree = builder.finish();
        assert!(tree.errors.is_empty(), "unexpected errors: {:?}", tree.errors);
        tree.root.expect("document")
    }

    fn combinators(chain: &SyntaxNode) -> Vec<String> {
        chain
            .find_all(NodeKind::Combinator)
            .into_iter()
            .map(SyntaxNode::text)
            .collect()
    }

    #[test]
    fn whitespace_between_selectors_is_descendant_combinator() {
        let doc = root("panel button { }");
        let chain = doc.find_all(NodeKind::SelectorChain)[0];
        assert_eq!(chain.find_all(NodeKind::Selector).len(), 2);
        assert_eq!(combinators(chain), vec![" ".to_string()]);
    }

    #[test]
    fn whitespace_around_combinator_symbol_is_formatting() {
        let doc = root("panel > button ~ label { }");
        let chain = doc.find_all(NodeKind::SelectorChain)[0];
        assert_eq!(chain.find_all(NodeKind::Selector).len(), 3);
        assert_eq!(combinators(chain), vec![">".to_string(), "~".to_string()]);
    }

    #[test]
    fn whitespace_before_block_is_formatting() {
        let doc = root("button   { }");
        let chain = doc.find_all(NodeKind::SelectorChain)[0];
        assert!(combinators(chain).is_empty());
    }

    #[test]
    fn selector_parts() {
        let doc = root("button.primary#submit:hover:nth(2)[enabled] { }");
        let selector = doc.find_all(NodeKind::Selector)[0];
        let data: Vec<_> = selector.data().collect();
        assert!(data.contains(&(DataTag::ElementName, "button")));
        assert!(data.contains(&(DataTag::ClassName, "primary")));
        assert!(data.contains(&(DataTag::IdName, "submit")));
        let flags = selector.find_all(NodeKind::Flag);
        assert_eq!(flags.len(), 2);
        assert!(flags[1].find_all(NodeKind::Argument).len() == 1);
        assert_eq!(selector.find_all(NodeKind::Filter).len(), 1);
    }

    #[test]
    fn selector_lists() {
        let doc = root("button, .label { }");
        let rule = doc.child(NodeKind::Rule).expect("rule");
        assert_eq!(rule.find_all(NodeKind::SelectorChain).len(), 2);
    }

    #[test]
    fn object_selectors_start_rules() {
        let doc = root("@parent > button { }");
        let rule = doc.child(NodeKind::Rule).expect("rule");
        let object = rule.find_all(NodeKind::ObjectSelector);
        assert_eq!(object.len(), 1);
        assert!(object[0].data().any(|d| d == (DataTag::ObjectKeyword, "parent")));
    }

    #[test]
    fn object_definitions() {
        let doc = root("@Button { text: \"ok\"; }\n@ { }");
        let objects = doc.find_all(NodeKind::ObjectDefinition);
        assert_eq!(objects.len(), 2);
        assert!(objects[0].data().any(|d| d == (DataTag::TypeName, "Button")));
        assert!(!objects[1].data().any(|d| d.0 == DataTag::TypeName));
    }

    #[test]
    fn selector_call() {
        let doc = root("list > item.selected -> refresh(1, true);");
        let call = doc.child(NodeKind::SelectorCall).expect("selector call");
        assert!(call.child(NodeKind::SelectorChain).is_some());
        assert!(call.data().any(|d| d == (DataTag::FunctionName, "refresh")));
        assert_eq!(call.find_all(NodeKind::Argument).len(), 2);
    }

    #[test]
    fn nested_rules() {
        let doc = root("window { panel { color: red; } }");
        let rules = doc.find_all(NodeKind::Rule);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].find_all(NodeKind::Assignment).len(), 1);
    }
}
