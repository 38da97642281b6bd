//! Event scanner for markup templates.
//!
//! # Scope
//!
//! This crate implements a single-pass scanner for two template dialects:
//! - **Tag syntax**: `<div class="a">${x}</div>`, with placeholders,
//!   scriptlets, comments, CDATA, document types and declarations
//! - **Concise syntax**: indentation-based tags (`div.foo id="x"`), with
//!   `--` delimited HTML blocks and mixed-mode tag syntax lines
//!
//! The scanner does not build a tree. It reports what it finds to a
//! [`Listener`] in source order and stops at the first malformed construct,
//! reporting a [`Diagnostic`].
//!
//! # Example
//!
//! ```
//! use marlin_parser::{Event, ScanOptions, scan};
//!
//! let events = scan("<b>${name}</b>", ScanOptions::html());
//! assert!(matches!(events[0], Event::OpenTag(ref tag) if tag.tag_name == "b"));
//! assert!(matches!(events[1], Event::Placeholder(ref p) if p.value == "name"));
//! ```

/// Diagnostic codes and the diagnostic type.
pub mod diagnostic;
/// Events delivered to listeners.
pub mod event;
/// The listener trait and an event-collecting listener.
pub mod listener;
/// Tags and attributes.
pub mod node;
/// Expression continuation operators.
pub mod operators;
/// Scanner configuration.
pub mod options;
/// The scanning engine.
pub mod scanner;
/// Open-tag-only element table.
pub mod tags;

pub use diagnostic::{Diagnostic, ErrorCode};
pub use event::{
    CloseTag, Comment, CommentKind, Event, Expression, ExpressionContext, Literal, Placeholder,
    Scriptlet, ScriptletKind, StringLiteral, Text, TextMode,
};
pub use listener::{EventCollector, Listener};
pub use node::{Argument, Attribute, Method, RawPart, ShorthandFragment, Tag};
pub use options::{BodyMode, ScanOptions, TagParseOptions};
pub use scanner::{Scanner, State};

/// Scan `source` and collect every event, ending with [`Event::Finish`].
#[must_use]
pub fn scan(source: &str, options: ScanOptions) -> Vec<Event> {
    Scanner::new(EventCollector::new(), options)
        .scan([source])
        .into_events()
}
