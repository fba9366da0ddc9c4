//! Property-based tests with proptest.
//!
//! The lexer and parser must accept any input: lexing is total, peeking
//! never moves the cursor, and the event stream always reproduces the
//! source text with balanced nodes.

mod common;

use common::{record, strip_markup};
use proptest::prelude::*;
use weft_syntax::{Lexer, NodeKind, highlight, parse_tree, tokenize};

// -- Strategies --

/// Weft-flavoured fragments, so generated input reaches deep into the
/// grammar instead of failing at the first character.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}".prop_map(|s| s),
        "[0-9]{1,3}(\\.[0-9]{1,2})?%?".prop_map(|s| s),
        Just("#a1f".to_string()),
        Just("\"x %name y\"".to_string()),
        Just("'%{a + 1}'".to_string()),
        Just("`raw`".to_string()),
        Just("<js>1</js>".to_string()),
        Just("// c\n".to_string()),
        Just("/* c */".to_string()),
        prop::sample::select(vec![
            "{", "}", "(", ")", "[", "]", ";", ":", ",", ".", "..", "...", "=", "==", "->",
            "=>", ">", "<", "+", "-", "*", "/", "!", "&&", "||", "|", "&", "@", "@this", "$",
            "~", "var", "if", "else", "for", "in", "switch", "case", "default", "function",
            "return", "loop", "finally", "new", "needs", "configure", "true",
        ])
        .prop_map(str::to_string),
    ]
}

fn separator() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just(" ".to_string()),
        1 => Just(String::new()),
        1 => Just("\n".to_string()),
    ]
}

fn source() -> impl Strategy<Value = String> {
    prop::collection::vec((fragment(), separator()), 0..40).prop_map(|parts| {
        parts
            .into_iter()
            .flat_map(|(fragment, separator)| [fragment, separator])
            .collect()
    })
}

// -- Properties --

proptest! {
    /// Tokens cover the input exactly, in order, with no empty tokens.
    #[test]
    fn lexing_is_total(input in "\\PC{0,64}") {
        let tokens = tokenize(&input);
        let mut offset = 0;
        for token in &tokens {
            prop_assert!(!token.text.is_empty());
            prop_assert_eq!(token.position.byte_index, offset);
            offset = token.end();
        }
        prop_assert_eq!(offset, input.len());
    }

    /// Any number of peeks followed by a reset leaves the lexer where it was.
    #[test]
    fn peek_reset_restores_cursor(input in source(), consumed in 0usize..5, peeks in 0usize..8) {
        let mut lexer = Lexer::new(&input);
        for _ in 0..consumed {
            lexer.next_token();
        }
        let before = lexer.position();
        let expected = lexer.peek_token();
        lexer.reset_peek();
        for _ in 0..peeks {
            lexer.peek_token();
        }
        lexer.reset_peek();
        prop_assert_eq!(lexer.position(), before);
        prop_assert_eq!(lexer.next_token(), expected);
    }

    /// Rewinding after a read yields the same token again.
    #[test]
    fn rewind_replays_last_token(input in source(), consumed in 0usize..5) {
        let mut lexer = Lexer::new(&input);
        for _ in 0..consumed {
            lexer.next_token();
        }
        if let Some(token) = lexer.next_token() {
            prop_assert!(lexer.rewind());
            prop_assert_eq!(lexer.next_token(), Some(token));
        }
    }

    /// Every byte of the source reaches the receiver exactly once.
    #[test]
    fn events_reproduce_source(input in source()) {
        let receiver = record(&input);
        prop_assert_eq!(receiver.text(), input);
        prop_assert!(receiver.is_balanced());
    }

    /// Arbitrary text never breaks the event protocol either.
    #[test]
    fn arbitrary_text_reproduces_source(input in "\\PC{0,64}") {
        let receiver = record(&input);
        prop_assert_eq!(receiver.text(), input);
        prop_assert!(receiver.is_balanced());
    }

    /// The tree builder always yields a document; without errors its
    /// text is the whole source.
    #[test]
    fn tree_always_has_a_document(input in source()) {
        let tree = parse_tree(&input);
        let root = tree.root.expect("document");
        prop_assert_eq!(root.kind(), NodeKind::Document);
        if tree.errors.is_empty() {
            prop_assert_eq!(root.text(), input);
        }
    }

    /// Highlighted output is the source plus markup.
    #[test]
    fn highlight_preserves_text(input in source()) {
        prop_assert_eq!(strip_markup(&highlight(&input)), input);
    }
}
