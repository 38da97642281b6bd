//! Quoted string literals inside expressions and placeholders.

use super::core::{Input, Scanner, State};
use super::part::{PartKind, StringPart, StringSegment};
use crate::diagnostic::ErrorCode;
use crate::event::StringLiteral;
use crate::listener::Listener;

impl<L: Listener> Scanner<L> {
    /// Start a string at the opening `quote` under the cursor.
    pub(crate) fn begin_string(&mut self, quote: char) {
        let string = StringPart {
            quote,
            segments: Vec::new(),
            current_text: String::new(),
            is_literal: true,
        };
        self.begin_part(PartKind::String(string), "", State::String);
    }

    fn push_string_text(&mut self, text: &str) {
        self.current_part_mut()
            .string_mut()
            .current_text
            .push_str(text);
    }

    fn string_placeholders_enabled(&self) -> bool {
        !self.options.ignore_placeholders && !self.options.ignore_nonstandard_string_placeholders
    }

    pub(crate) fn handle_string_state(&mut self, input: Input) {
        match input {
            // line terminators become escape sequences
            Input::Eol(newline) => {
                let escaped = if newline == "\r\n" { "\\r\\n" } else { "\\n" };
                self.push_string_text(escaped);
            }
            Input::Eof => {
                let pos = self.current_part().pos;
                let message = if self.placeholder_depth > 0 {
                    "EOF reached while parsing string expression found inside placeholder"
                } else {
                    "EOF reached while parsing string expression"
                };
                self.notify_error(pos, ErrorCode::InvalidString, message);
            }
            Input::Char('\\') => self.string_escape(),
            Input::Char('$')
                if self.string_placeholders_enabled() && self.placeholder_marker_len().is_some() =>
            {
                let string = self.current_part_mut().string_mut();
                if !string.current_text.is_empty() {
                    let text = core::mem::take(&mut string.current_text);
                    string.segments.push(StringSegment::Text(text));
                }
                string.is_literal = false;
                self.begin_placeholder();
            }
            Input::Char(ch) if ch == self.current_part_mut().string_mut().quote => {
                let end_pos = self.pos + 1;
                self.end_string(end_pos);
            }
            Input::Char(ch) => self.push_string_text(ch.encode_utf8(&mut [0; 4])),
        }
    }

    /// A backslash inside a string.
    ///
    /// Escapes pass through untouched except in front of a placeholder
    /// marker, where they are normalized.
    fn string_escape(&mut self) {
        let pos = self.pos;
        let ignore_placeholders = self.options.ignore_placeholders;
        if self.look_ahead_for("\\\\${", pos) {
            self.push_string_text(if ignore_placeholders { "\\\\\\\\" } else { "\\\\" });
            self.skip(1);
        } else if self.look_ahead_for("\\${", pos) {
            self.push_string_text(if ignore_placeholders { "\\\\$" } else { "$" });
            self.skip(1);
        } else {
            let (escape, len) = self.escape_sequence();
            self.push_string_text(&escape);
            self.skip(len);
        }
    }

    fn end_string(&mut self, end_pos: usize) {
        let part = self.end_part();
        let PartKind::String(mut string) = part.kind else {
            panic!("illegal state: ended a {} part as a string", part.kind_name());
        };
        if !string.current_text.is_empty() {
            string.segments.push(StringSegment::Text(string.current_text));
        }

        let quote = string.quote;
        let mut pieces: Vec<String> = string
            .segments
            .into_iter()
            .map(|segment| match segment {
                StringSegment::Text(text) => format!("{quote}{text}{quote}"),
                StringSegment::Placeholder(value) => format!("({value})"),
            })
            .collect();
        let value = match pieces.len() {
            0 => format!("{quote}{quote}"),
            1 => pieces.remove(0),
            _ => format!("({})", pieces.join("+")),
        };

        let literal = StringLiteral {
            value,
            is_string_literal: string.is_literal,
            pos: part.pos,
            end_pos,
        };
        self.listener.on_string(&literal);

        match self.state {
            State::Expression => {
                let part = self.current_part_mut();
                let was_empty = part.value.is_empty();
                part.value.push_str(&literal.value);
                let expression = part.expression_mut();
                expression.is_string_literal = Some(was_empty && literal.is_string_literal);
            }
            State::Placeholder => self.append_to_part(&literal.value),
            other => panic!("illegal state: string ended into {other}"),
        }
    }
}
