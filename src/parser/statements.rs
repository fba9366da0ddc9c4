//! Statements: declarations, functions, flow control and instructions.

use super::{Parser, StatementShape};
use crate::syntax::{DataTag, NodeKind};
use crate::token::TokenKind;

impl Parser<'_, '_> {
    /// Dispatch on the first significant token of a statement.
    pub(super) fn parse_statement(&mut self) -> bool {
        self.skip_trivia();
        let Some(token) = self.peek() else {
            return self.fail_expected("statement");
        };

        match &token.kind {
            TokenKind::Identifier => match token.text.as_str() {
                "var" | "const" => self.parse_declaration(),
                "function" | "override" | "insert" => self.parse_function_declaration(),
                "if" => self.parse_if(),
                "switch" => self.parse_switch(),
                "loop" => self.parse_loop(),
                "for" => self.parse_for(),
                "return" => self.parse_return(),
                "repeat" => self.parse_bare_keyword(NodeKind::Repeat),
                "break" => self.parse_bare_keyword(NodeKind::Break),
                "continue" => self.parse_bare_keyword(NodeKind::Continue),
                "needs" => self.parse_needs(),
                "configure" => self.parse_configure(),
                "else" | "case" | "default" | "finally" => {
                    let message = format!("'{}' without a matching statement", token.text);
                    self.fail(&message)
                }
                _ => self.parse_selector_statement(),
            },
            TokenKind::Foreign { .. } => self.parse_foreign(),
            TokenKind::At if !self.is_object_selector() => self.parse_object_definition(),
            _ => self.parse_selector_statement(),
        }
    }

    /// Assignment, rule, selector call, or a plain expression statement.
    fn parse_selector_statement(&mut self) -> bool {
        if self.is_assignment() {
            return self.parse_assignment();
        }
        match self.statement_shape() {
            StatementShape::Rule => self.parse_rule(),
            StatementShape::SelectorCall => self.parse_selector_call(),
            StatementShape::Other => self.parse_expression_statement(),
        }
    }

    pub(super) fn parse_block(&mut self) -> bool {
        self.node(NodeKind::Block, |p| {
            if !p.expect(&TokenKind::LeftBrace, DataTag::Punctuation, "'{'") {
                return false;
            }
            p.parse_statements(true);
            p.expect(&TokenKind::RightBrace, DataTag::Punctuation, "'}'")
        })
    }

    fn parse_declaration(&mut self) -> bool {
        self.node(NodeKind::Declaration, |p| {
            p.bump(DataTag::Keyword);
            if !p.expect_identifier(DataTag::VarName, "variable name") {
                return false;
            }
            if p.eat(&TokenKind::Colon, DataTag::Punctuation) && !p.sub(Self::parse_type) {
                return false;
            }
            if p.eat(&TokenKind::Equals, DataTag::Punctuation) && !p.sub(Self::parse_expression)
            {
                return false;
            }
            p.expect(&TokenKind::Semicolon, DataTag::Punctuation, "';'")
        })
    }

    fn parse_assignment(&mut self) -> bool {
        self.node(NodeKind::Assignment, |p| {
            if !p.sub(Self::parse_value_path) {
                return false;
            }
            if !(p.eat(&TokenKind::Colon, DataTag::Punctuation)
                || p.eat(&TokenKind::Equals, DataTag::Punctuation))
            {
                return p.fail_expected("':' or '='");
            }
            if !p.sub(Self::parse_expression) {
                return false;
            }
            // The last assignment of a block may leave out its `;`.
            p.next_is(&TokenKind::RightBrace)
                || p.expect(&TokenKind::Semicolon, DataTag::Punctuation, "';'")
        })
    }

    /// `function`, `override function` or `insert function`.
    fn parse_function_declaration(&mut self) -> bool {
        self.node(NodeKind::FunctionDeclaration, |p| {
            if p.at_keyword("override") || p.at_keyword("insert") {
                p.bump(DataTag::Modifier);
            }
            if !p.expect_keyword("function")
                || !p.expect_identifier(DataTag::FunctionName, "function name")
                || !p.expect(&TokenKind::LeftParen, DataTag::Punctuation, "'('")
            {
                return false;
            }
            if !p.eat(&TokenKind::RightParen, DataTag::Punctuation) {
                loop {
                    if !p.sub(Self::parse_parameter) {
                        return false;
                    }
                    if p.eat(&TokenKind::Comma, DataTag::Punctuation) {
                        continue;
                    }
                    if !p.expect(&TokenKind::RightParen, DataTag::Punctuation, "')'") {
                        return false;
                    }
                    break;
                }
            }
            if p.eat(&TokenKind::Colon, DataTag::Punctuation) && !p.sub(Self::parse_type) {
                return false;
            }
            p.sub(Self::parse_block)
        })
    }

    fn parse_parameter(&mut self) -> bool {
        self.node(NodeKind::Parameter, |p| {
            if !p.expect_identifier(DataTag::ParameterName, "parameter name") {
                return false;
            }
            !p.eat(&TokenKind::Colon, DataTag::Punctuation) || p.sub(Self::parse_type)
        })
    }

    /// `( expression )` as used by `if`, `switch` and `loop`.
    fn parse_condition(&mut self) -> bool {
        self.expect(&TokenKind::LeftParen, DataTag::Punctuation, "'('")
            && self.sub(Self::parse_expression)
            && self.expect(&TokenKind::RightParen, DataTag::Punctuation, "')'")
    }

    fn parse_if(&mut self) -> bool {
        self.node(NodeKind::If, |p| {
            p.bump(DataTag::Keyword);
            if !p.parse_condition() || !p.sub(Self::parse_block) {
                return false;
            }
            !p.next_is_keyword("else") || p.sub(Self::parse_else)
        })
    }

    fn parse_else(&mut self) -> bool {
        self.node(NodeKind::Else, |p| {
            p.bump(DataTag::Keyword);
            if p.next_is_keyword("if") {
                p.sub(Self::parse_if)
            } else {
                p.sub(Self::parse_block)
            }
        })
    }

    fn parse_switch(&mut self) -> bool {
        self.node(NodeKind::Switch, |p| {
            p.bump(DataTag::Keyword);
            if !p.parse_condition()
                || !p.expect(&TokenKind::LeftBrace, DataTag::Punctuation, "'{'")
            {
                return false;
            }
            loop {
                if p.eat(&TokenKind::RightBrace, DataTag::Punctuation) {
                    return true;
                }
                let ok = if p.next_is_keyword("case") {
                    p.sub(Self::parse_case)
                } else if p.next_is_keyword("default") {
                    p.sub(Self::parse_default)
                } else {
                    p.fail_expected("'case', 'default' or '}'")
                };
                if !ok {
                    return false;
                }
            }
        })
    }

    fn parse_case(&mut self) -> bool {
        self.node(NodeKind::Case, |p| {
            p.bump(DataTag::Keyword);
            if !p.sub(Self::parse_expression) {
                return false;
            }
            while p.eat(&TokenKind::Comma, DataTag::Punctuation) {
                if !p.sub(Self::parse_expression) {
                    return false;
                }
            }
            p.sub(Self::parse_block)
        })
    }

    fn parse_default(&mut self) -> bool {
        self.node(NodeKind::Default, |p| {
            p.bump(DataTag::Keyword);
            p.sub(Self::parse_block)
        })
    }

    /// `loop { }` or `loop (condition) { }`, with an optional `finally`.
    fn parse_loop(&mut self) -> bool {
        self.node(NodeKind::Loop, |p| {
            p.bump(DataTag::Keyword);
            if p.next_is(&TokenKind::LeftParen) && !p.parse_condition() {
                return false;
            }
            p.sub(Self::parse_block) && p.parse_optional_finally()
        })
    }

    fn parse_for(&mut self) -> bool {
        self.node(NodeKind::For, |p| {
            p.bump(DataTag::Keyword);
            p.expect(&TokenKind::LeftParen, DataTag::Punctuation, "'('")
                && p.expect_identifier(DataTag::VarName, "loop variable")
                && p.expect_keyword("in")
                && p.sub(Self::parse_expression)
                && p.expect(&TokenKind::RightParen, DataTag::Punctuation, "')'")
                && p.sub(Self::parse_block)
                && p.parse_optional_finally()
        })
    }

    fn parse_optional_finally(&mut self) -> bool {
        if !self.next_is_keyword("finally") {
            return true;
        }
        self.sub(|p| {
            p.node(NodeKind::Finally, |p| {
                p.bump(DataTag::Keyword);
                p.sub(Self::parse_block)
            })
        })
    }

    fn parse_return(&mut self) -> bool {
        self.node(NodeKind::Return, |p| {
            p.bump(DataTag::Keyword);
            if !p.next_is(&TokenKind::Semicolon)
                && !p.next_is(&TokenKind::RightBrace)
                && !p.sub(Self::parse_expression)
            {
                return false;
            }
            p.next_is(&TokenKind::RightBrace)
                || p.expect(&TokenKind::Semicolon, DataTag::Punctuation, "';'")
        })
    }

    /// `repeat;`, `break;` and `continue;`.
    fn parse_bare_keyword(&mut self, kind: NodeKind) -> bool {
        self.node(kind, |p| {
            p.bump(DataTag::Keyword);
            p.next_is(&TokenKind::RightBrace)
                || p.expect(&TokenKind::Semicolon, DataTag::Punctuation, "';'")
        })
    }

    fn parse_needs(&mut self) -> bool {
        self.node(NodeKind::Needs, |p| {
            p.bump(DataTag::Keyword);
            p.skip_trivia();
            let is_string = p.peek().is_some_and(|token| {
                matches!(
                    token.kind,
                    TokenKind::DoubleQuoted(_) | TokenKind::SingleQuoted(_) | TokenKind::RawString
                )
            });
            let ok = if is_string {
                p.sub(Self::parse_primary)
            } else {
                p.sub(Self::parse_value_path)
            };
            ok && p.expect(&TokenKind::Semicolon, DataTag::Punctuation, "';'")
        })
    }

    fn parse_configure(&mut self) -> bool {
        self.node(NodeKind::Configure, |p| {
            p.bump(DataTag::Keyword);
            p.expect_identifier(DataTag::VarName, "configuration name")
                && p.sub(Self::parse_block)
        })
    }

    /// `<lang> ... </lang>`, split into its tag and content parts.
    fn parse_foreign(&mut self) -> bool {
        self.node(NodeKind::Foreign, |p| {
            let Some(token) = p.lexer.next_token() else {
                return p.fail_expected("foreign block");
            };
            let TokenKind::Foreign { language } = &token.kind else {
                p.lexer.rewind();
                return p.fail_expected("foreign block");
            };

            let open = language.len() + 2;
            let close = language.len() + 3;
            let content = &token.text[open..token.text.len() - close];

            p.emit(DataTag::Punctuation, "<");
            p.emit(DataTag::Language, language);
            p.emit(DataTag::Punctuation, ">");
            if !content.is_empty() {
                p.emit(DataTag::ForeignContent, content);
            }
            p.emit(DataTag::Punctuation, "</");
            p.emit(DataTag::Language, language);
            p.emit(DataTag::Punctuation, ">");
            p.last_end = token.end();
            true
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

    fn kinds(node: &SyntaxNode) -> Vec<NodeKind> {
        node.nodes().map(SyntaxNode::kind).collect()
    }

    #[test]
    fn declarations() {
        let doc = root("var count: int = 3;\nconst name;");
        let declarations = doc.find_all(NodeKind::Declaration);
        assert_eq!(declarations.len(), 2);
        assert_eq!(
            kinds(declarations[0]),
            vec![NodeKind::Type, NodeKind::Expression]
        );
        let data: Vec<_> = declarations[1].data().collect();
        assert_eq!(
            data,
            vec![
                (DataTag::Keyword, "const"),
                (DataTag::VarName, "name"),
                (DataTag::Punctuation, ";")
            ]
        );
    }

    #[test]
    fn function_declaration_variants() {
        let doc = root(
            "function add(a: int, b: int): int { return a + b; }\n\
             override function draw() { }\n\
             insert function hook(e) { }",
        );
        let functions = doc.find_all(NodeKind::FunctionDeclaration);
        assert_eq!(functions.len(), 3);
        assert_eq!(functions[0].find_all(NodeKind::Parameter).len(), 2);
        assert_eq!(functions[0].child(NodeKind::Type).map(SyntaxNode::text), Some("int".to_string()));
        assert!(functions[1].data().any(|d| d == (DataTag::Modifier, "override")));
        assert!(functions[2].data().any(|d| d == (DataTag::Modifier, "insert")));
    }

    #[test]
    fn if_else_chain() {
        let doc = root("if (a) { } else if (b) { } else { }");
        let outer = doc.child(NodeKind::If).expect("if");
        let else_node = outer.child(NodeKind::Else).expect("else");
        let inner = else_node.child(NodeKind::If).expect("else if");
        assert!(inner.child(NodeKind::Else).is_some());
    }

    #[test]
    fn switch_cases() {
        let doc = root("switch (mode) { case 1, 2 { break; } default { } }");
        let switch = doc.child(NodeKind::Switch).expect("switch");
        assert_eq!(
            kinds(switch),
            vec![NodeKind::Expression, NodeKind::Case, NodeKind::Default]
        );
        let case = switch.child(NodeKind::Case).expect("case");
        assert_eq!(case.find_all(NodeKind::Break).len(), 1);
    }

    #[test]
    fn loops_with_finally() {
        let doc = root(
            "loop (running) { repeat; } finally { }\n\
             for (item in items) { continue; } finally { return; }",
        );
        let looped = doc.child(NodeKind::Loop).expect("loop");
        assert!(looped.child(NodeKind::Finally).is_some());
        let for_node = doc.child(NodeKind::For).expect("for");
        assert!(for_node.data().any(|d| d == (DataTag::VarName, "item")));
        assert!(for_node.child(NodeKind::Finally).is_some());
        assert_eq!(doc.find_all(NodeKind::Return).len(), 1);
    }

    #[test]
    fn instructions() {
        let doc = root("needs \"ui/button\";\nneeds ui.theme;\nconfigure window { width: 10; }");
        let needs = doc.find_all(NodeKind::Needs);
        assert!(needs[0].child(NodeKind::String).is_some());
        assert!(needs[1].child(NodeKind::ValuePath).is_some());
        let configure = doc.child(NodeKind::Configure).expect("configure");
        assert!(configure.find_all(NodeKind::Assignment).len() == 1);
    }

    #[test]
    fn foreign_block_parts() {
        let doc = root("<css>a { b: c; }</css>");
        let foreign = doc.child(NodeKind::Foreign).expect("foreign");
        assert!(foreign.data().any(|d| d == (DataTag::Language, "css")));
        assert!(
            foreign
                .data()
                .any(|d| d == (DataTag::ForeignContent, "a { b: c; }"))
        );
        assert_eq!(foreign.text(), "<css>a { b: c; }</css>");
    }

    #[test]
    fn misplaced_keyword_is_an_error() {
        let mut builder = TreeBuilder::new();
        parse("else { }", &mut builder);
        let tree = builder.finish();
        assert_eq!(tree.errors.len(), 1);
        assert!(tree.errors[0].message.contains("else"));
    }
}
