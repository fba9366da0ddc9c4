//! Event protocol as seen by a receiver.

mod common;

use common::{Event, RecordingReceiver, record};
use weft_syntax::{DataTag, NodeKind, Receiver, TreeBuilder, parse};

#[test]
fn document_events_frame_everything() {
    let receiver = record("var a;");
    assert_eq!(receiver.events.first(), Some(&Event::Start(NodeKind::Document)));
    assert_eq!(receiver.events.last(), Some(&Event::Commit));
    assert!(matches!(
        receiver.events[receiver.events.len() - 2],
        Event::End(NodeKind::Document)
    ));
    assert!(receiver.is_balanced());
}

#[test]
fn location_precedes_node_end() {
    let receiver = record("var a;");
    let end = receiver
        .events
        .iter()
        .position(|event| *event == Event::End(NodeKind::Declaration))
        .expect("declaration end");
    assert!(matches!(receiver.events[end - 1], Event::Location(_)));
    assert_eq!(receiver.events[end + 1], Event::Commit);
}

#[test]
fn declaration_event_sequence() {
    let receiver = record("var a;");
    let sequence: Vec<_> = receiver
        .events
        .iter()
        .filter(|event| !matches!(event, Event::Location(_)))
        .cloned()
        .collect();
    assert_eq!(
        sequence,
        vec![
            Event::Start(NodeKind::Document),
            Event::Start(NodeKind::Declaration),
            Event::Data(DataTag::Keyword, "var".to_string()),
            Event::Data(DataTag::Whitespace, " ".to_string()),
            Event::Data(DataTag::VarName, "a".to_string()),
            Event::Data(DataTag::Punctuation, ";".to_string()),
            Event::End(NodeKind::Declaration),
            Event::Commit,
            Event::End(NodeKind::Document),
            Event::Commit,
        ]
    );
}

#[test]
fn failed_production_ends_without_commit_or_location() {
    let receiver = record("var = 1;");
    let end = receiver
        .events
        .iter()
        .position(|event| *event == Event::End(NodeKind::Declaration))
        .expect("declaration end");
    assert!(!matches!(receiver.events[end - 1], Event::Location(_)));
    assert_ne!(receiver.events.get(end + 1), Some(&Event::Commit));
    assert_eq!(receiver.errors().len(), 1);
}

#[test]
fn error_arrives_before_invalid_node() {
    let receiver = record("if x;");
    let error = receiver
        .events
        .iter()
        .position(|event| matches!(event, Event::Error(_)))
        .expect("error");
    let invalid = receiver
        .events
        .iter()
        .position(|event| *event == Event::Start(NodeKind::Invalid))
        .expect("invalid");
    assert!(error < invalid);
}

#[test]
fn every_byte_is_reported_once() {
    let source = "switch (a) {\n  case 1 { print \"%a!\"; }\n  default { }\n}\n// end";
    let receiver = record(source);
    assert_eq!(receiver.text(), source);
    assert!(receiver.errors().is_empty());
}

#[test]
fn text_survives_errors() {
    let source = "var = ;\n} button { x: ; }\nvar ok = \"%{\";";
    let receiver = record(source);
    assert_eq!(receiver.text(), source);
    assert!(!receiver.errors().is_empty());
}

#[test]
fn reset_makes_a_receiver_reusable() {
    let mut builder = TreeBuilder::new();
    parse("var = ;", &mut builder);
    assert_eq!(builder.errors().len(), 1);
    builder.reset();
    parse("var a;", &mut builder);
    let tree = builder.finish();
    assert!(tree.is_ok());
}

#[test]
fn receivers_work_through_mutable_references() {
    let mut receiver = RecordingReceiver::default();
    {
        let mut by_ref = &mut receiver;
        parse("a = 1;", &mut by_ref);
    }
    assert!(receiver.is_balanced());
    assert_eq!(receiver.text(), "a = 1;");
}
