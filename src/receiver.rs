//! The event protocol connecting the parser to its consumers.
//!
//! The parser never builds a tree. It reports what it recognizes as a
//! nested sequence of events and leaves the interpretation to a
//! [`Receiver`]:
//!
//! - `node_start` opens a working node;
//! - `data` attaches a payload to the innermost open node;
//! - `source_location` describes the innermost open node, right before it
//!   ends;
//! - `node_end` closes the node into a single pending slot;
//! - `node_commit` attaches the pending node to its parent.
//!
//! A node that is ended but never committed is dropped. This is how the
//! parser backs out of a failed production without taking any event back.

use crate::parser::SyntaxError;
use crate::syntax::{DataTag, NodeKind, SourceLocation};

/// Consumer of parse events.
///
/// Calls arrive in strict nested order from a single call stack:
/// `node_start`/`node_end` pairs nest like parentheses and `node_commit`
/// always refers to the most recently ended node.
pub trait Receiver {
    fn node_start(&mut self, kind: NodeKind);

    fn node_end(&mut self, kind: NodeKind);

    fn node_commit(&mut self);

    fn data(&mut self, tag: DataTag, text: &str);

    fn source_location(&mut self, location: &SourceLocation);

    /// Non-fatal diagnostic; parsing continues after it.
    fn error(&mut self, error: &SyntaxError);

    /// Clear all state so the receiver can be reused.
    fn reset(&mut self);
}

impl<R: Receiver + ?Sized> Receiver for &mut R {
    fn node_start(&mut self, kind: NodeKind) {
        (**self).node_start(kind);
    }

    fn node_end(&mut self, kind: NodeKind) {
        (**self).node_end(kind);
    }

    fn node_commit(&mut self) {
        (**self).node_commit();
    }

    fn data(&mut self, tag: DataTag, text: &str) {
        (**self).data(tag, text);
    }

    fn source_location(&mut self, location: &SourceLocation) {
        (**self).source_location(location);
    }

    fn error(&mut self, error: &SyntaxError) {
        (**self).error(error);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
