//! Highlighter output.

mod common;

use common::strip_markup;
use weft_syntax::{Highlighter, ParseOptions, highlight, parse_with};

#[test]
fn stripping_markup_gives_back_the_source() {
    let source = "\
needs \"ui\";
panel > button.primary:hover, @this[a < b] {
    color: #a0b0c0;
    label: \"%{count} <items> & more\";
    $log(@this, ...rest);
}
function f(x: [string: int] | null): &int { return x && !y; }
<html><b>raw</b></html>
";
    assert_eq!(strip_markup(&highlight(source)), source);
}

#[test]
fn broken_input_is_still_fully_rendered() {
    let source = "var = ;\n}}} if ( { \"%{\" `";
    assert_eq!(strip_markup(&highlight(source)), source);
}

#[test]
fn selector_parts_are_classified() {
    let html = highlight("panel button.primary #go { }");
    assert!(html.contains("<span class=\"weft-element\">panel</span>"));
    assert!(html.contains("<span class=\"weft-combinator\"> </span>"));
    assert!(html.contains("<span class=\"weft-class\">primary</span>"));
    assert!(html.contains("<span class=\"weft-id\">go</span>"));
}

#[test]
fn colors_and_foreign_blocks() {
    let html = highlight("c = #0f0;\n<css>a{}</css>");
    assert!(html.contains("<span class=\"weft-color\">0f0</span>"));
    assert!(html.contains("<span class=\"weft-language\">css</span>"));
    assert!(html.contains("<span class=\"weft-foreign\">a{}</span>"));
}

#[test]
fn highlighter_respects_options() {
    let options = ParseOptions::new().file("x.weft").whitespace_calls(false);
    let mut highlighter = Highlighter::new();
    parse_with(&options, "print 1;", &mut highlighter);
    let errors = highlighter.errors().to_vec();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].file.as_deref(), Some("x.weft"));
    assert!(highlighter.into_html().contains("weft-invalid"));
}
