//! The boundary between the scanner and its consumer.

use std::collections::HashMap;

use crate::diagnostic::Diagnostic;
use crate::event::{CloseTag, Comment, Event, Expression, Literal, Placeholder, Scriptlet, StringLiteral, Text};
use crate::node::Tag;
use crate::options::BodyMode;

/// Receives scan events in source order.
///
/// Every method defaults to doing nothing, so implementors only override
/// what they need.
pub trait Listener {
    /// Body text.
    fn on_text(&mut self, _text: &Text) {}

    /// A placeholder (not reported inside template literals).
    fn on_placeholder(&mut self, _placeholder: &Placeholder) {}

    /// A completed string literal.
    fn on_string(&mut self, _string: &StringLiteral) {}

    /// An attribute value or argument.
    fn on_expression(&mut self, _expression: &Expression) {}

    /// An open tag. The returned mode selects how the body is scanned.
    fn on_open_tag(&mut self, _tag: &Tag) -> BodyMode {
        BodyMode::Default
    }

    /// A closing tag, explicit or implied.
    fn on_close_tag(&mut self, _close_tag: &CloseTag) {}

    /// A scriptlet or inline script.
    fn on_scriptlet(&mut self, _scriptlet: &Scriptlet) {}

    /// An HTML comment, or a script comment in concise content.
    fn on_comment(&mut self, _comment: &Comment) {}

    /// A CDATA section.
    fn on_cdata(&mut self, _cdata: &Literal) {}

    /// A document type.
    fn on_document_type(&mut self, _document_type: &Literal) {}

    /// A declaration.
    fn on_declaration(&mut self, _declaration: &Literal) {}

    /// A diagnostic. No further events follow except [`Listener::on_finish`].
    fn on_error(&mut self, _diagnostic: &Diagnostic) {}

    /// The scan is over.
    fn on_finish(&mut self) {}
}

/// A listener that records every event.
#[derive(Debug, Clone, Default)]
pub struct EventCollector {
    events: Vec<Event>,
    body_modes: HashMap<String, BodyMode>,
}

impl EventCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `mode` whenever a tag named `tag_name` opens.
    #[must_use]
    pub fn with_body_mode(mut self, tag_name: impl Into<String>, mode: BodyMode) -> Self {
        let _ = self.body_modes.insert(tag_name.into(), mode);
        self
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl Listener for EventCollector {
    fn on_text(&mut self, text: &Text) {
        self.events.push(Event::Text(text.clone()));
    }

    fn on_placeholder(&mut self, placeholder: &Placeholder) {
        self.events.push(Event::Placeholder(placeholder.clone()));
    }

    fn on_string(&mut self, string: &StringLiteral) {
        self.events.push(Event::String(string.clone()));
    }

    fn on_expression(&mut self, expression: &Expression) {
        self.events.push(Event::Expression(expression.clone()));
    }

    fn on_open_tag(&mut self, tag: &Tag) -> BodyMode {
        self.events.push(Event::OpenTag(tag.clone()));
        self.body_modes
            .get(&tag.tag_name)
            .copied()
            .unwrap_or_default()
    }

    fn on_close_tag(&mut self, close_tag: &CloseTag) {
        self.events.push(Event::CloseTag(close_tag.clone()));
    }

    fn on_scriptlet(&mut self, scriptlet: &Scriptlet) {
        self.events.push(Event::Scriptlet(scriptlet.clone()));
    }

    fn on_comment(&mut self, comment: &Comment) {
        self.events.push(Event::Comment(comment.clone()));
    }

    fn on_cdata(&mut self, cdata: &Literal) {
        self.events.push(Event::Cdata(cdata.clone()));
    }

    fn on_document_type(&mut self, document_type: &Literal) {
        self.events.push(Event::DocumentType(document_type.clone()));
    }

    fn on_declaration(&mut self, declaration: &Literal) {
        self.events.push(Event::Declaration(declaration.clone()));
    }

    fn on_error(&mut self, diagnostic: &Diagnostic) {
        self.events.push(Event::Error(diagnostic.clone()));
    }

    fn on_finish(&mut self) {
        self.events.push(Event::Finish);
    }
}
