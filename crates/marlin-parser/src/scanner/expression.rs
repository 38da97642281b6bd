//! Embedded expressions: attribute values, arguments and placeholders.

use super::core::{Input, Scanner, State};
use super::part::{ExpressionPart, PartKind, PlaceholderPart, StringSegment};
use crate::diagnostic::ErrorCode;
use crate::event::{Expression, ExpressionContext, Placeholder};
use crate::listener::Listener;
use crate::operators::{ends_with_operator, is_whitespace, match_forward};

/// Characters after which `/` divides instead of starting a regular expression.
fn ends_operand(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, ']' | '}' | ')' | '.' | '<' | '%' | '_' | '$')
}

const fn closer_for(ch: char) -> char {
    match ch {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

// =============================================================================
// Expression
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Start an expression at the cursor.
    ///
    /// With `end_after_group` the expression is a parenthesized argument and
    /// ends with its closing parenthesis.
    pub(crate) fn begin_expression(&mut self, end_after_group: bool) {
        let expression = ExpressionPart {
            end_after_group,
            ..ExpressionPart::default()
        };
        self.begin_part(PartKind::Expression(expression), "", State::Expression);
    }

    /// Append source text that is not a string literal.
    fn append_to_expression(&mut self, text: &str) {
        let part = self.current_part_mut();
        part.value.push_str(text);
        if !text.chars().all(is_whitespace) {
            part.expression_mut().is_string_literal = Some(false);
        }
    }

    pub(crate) fn handle_expression_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.expression_eol(newline),
            Input::Eof => self.expression_eof(),
            Input::Char(ch) => self.expression_char(ch),
        }
    }

    fn expression_char(&mut self, ch: char) {
        let concise = self.is_concise;
        let depth = self.current_part_mut().expression_mut().group_stack.len();

        match ch {
            '"' | '\'' => self.begin_string(ch),
            '`' => self.begin_template_string(),
            '/' => self.expression_slash(depth),
            '\\' => {
                let (escape, len) = self.escape_sequence();
                self.append_to_expression(&escape);
                self.skip(len);
            }
            _ if depth == 0 && is_whitespace(ch) => self.expression_whitespace(),
            ',' if depth == 0 => self.end_expression_before_cursor(),
            '>' if depth == 0 && !concise => self.end_expression_before_cursor(),
            ';' if depth == 0 && concise => self.end_expression_before_cursor(),
            ']' if depth == 0 && concise && self.current_tag().within_attr_group => {
                self.end_expression_before_cursor();
            }
            '(' | '[' | '{' => {
                self.current_part_mut()
                    .expression_mut()
                    .group_stack
                    .push(closer_for(ch));
                self.append_to_expression(ch.encode_utf8(&mut [0; 4]));
            }
            ')' | ']' | '}' => self.expression_group_end(ch),
            _ => self.append_to_expression(ch.encode_utf8(&mut [0; 4])),
        }
    }

    fn expression_slash(&mut self, depth: usize) {
        match self.peek(1) {
            Some('/') => self.begin_js_comment(false),
            Some('*') => self.begin_js_comment(true),
            Some('>') if depth == 0 && !self.is_concise => self.end_expression_before_cursor(),
            _ => {
                let divides = !self.current_part().value.is_empty()
                    && self.previous_non_whitespace_char().is_some_and(ends_operand);
                if divides {
                    self.append_to_expression("/");
                } else {
                    self.begin_regular_expression();
                }
            }
        }
    }

    fn expression_group_end(&mut self, ch: char) {
        let pos = self.pos;
        let part = self.current_part_mut().expression_mut();
        match part.group_stack.pop() {
            Some(expected) if expected == ch => {}
            Some(expected) => {
                self.notify_error(
                    pos,
                    ErrorCode::InvalidExpression,
                    format!("Mismatched group. A \"{ch}\" character was found when \"{expected}\" was expected."),
                );
                return;
            }
            None => {
                self.notify_error(
                    pos,
                    ErrorCode::InvalidExpression,
                    format!(
                        "Mismatched group. A closing \"{ch}\" character was found but it is not matched with a corresponding opening character."
                    ),
                );
                return;
            }
        }

        self.append_to_expression(ch.encode_utf8(&mut [0; 4]));
        let part = self.current_part_mut().expression_mut();
        if !part.end_after_group || !part.group_stack.is_empty() {
            return;
        }
        if !part.method && self.current_part().resume == State::AttributeName {
            let whitespace = self.inline_whitespace_len(pos + 1);
            if self.look_ahead_for("{", pos + 1 + whitespace) {
                self.begin_method_body(whitespace);
                return;
            }
        }
        self.end_expression(pos + 1);
    }

    /// Continue an attribute argument into the `{` that follows it.
    fn begin_method_body(&mut self, whitespace: usize) {
        let gap = self.data[self.pos + 1..self.pos + 1 + whitespace].to_string();
        self.append_to_expression(&gap);
        self.append_to_expression("{");
        let expression = self.current_part_mut().expression_mut();
        expression.method = true;
        expression.group_stack.push('}');
        self.skip(whitespace + 1);
    }

    /// Unenclosed whitespace: skip it, continue past an operator, or end.
    fn expression_whitespace(&mut self) {
        let next_pos = self.pos + self.event_len;
        let part = self.current_part_mut();
        if part.value.is_empty() {
            part.pos = next_pos;
            return;
        }

        let tag_syntax = !self.is_concise;
        let legacy = self.options.legacy_compatibility;
        if let Some(len) = match_forward(self.rest(), tag_syntax, legacy) {
            let continuation = self.rest()[..len].to_string();
            self.append_to_expression(&continuation);
            self.current_part_mut().expression_mut().has_unenclosed_whitespace = true;
            self.skip(len - self.event_len);
        } else if ends_with_operator(&self.current_part().value) {
            let rest = self.rest();
            let len = rest.len() - rest.trim_start_matches(is_whitespace).len();
            let whitespace = rest[..len].to_string();
            self.append_to_expression(&whitespace);
            self.current_part_mut().expression_mut().has_unenclosed_whitespace = true;
            self.skip(len - self.event_len);
        } else {
            self.end_expression_before_cursor();
        }
    }

    fn expression_eol(&mut self, newline: &str) {
        let depth = self.current_part_mut().expression_mut().group_stack.len();
        if depth > 0 {
            self.append_to_part(newline);
            return;
        }

        let line_ends = self.is_concise && !self.current_tag().within_attr_group;
        if line_ends && self.current_part().value.is_empty() {
            self.end_expression_before_cursor();
        } else {
            self.expression_whitespace();
        }
    }

    fn expression_eof(&mut self) {
        let depth = self.current_part_mut().expression_mut().group_stack.len();
        if depth == 0 && self.is_concise {
            let pos = self.pos;
            self.end_expression(pos);
            self.redispatch_eof();
        } else {
            self.malformed_open_tag("EOF reached while parsing open tag");
        }
    }

    /// End the expression at the cursor and hand the current input to the
    /// resumed state.
    fn end_expression_before_cursor(&mut self) {
        let pos = self.pos;
        self.end_expression(pos);
        self.reconsume();
    }

    pub(crate) fn end_expression(&mut self, end_pos: usize) {
        let part = self.end_part();
        let PartKind::Expression(expression) = part.kind else {
            panic!("illegal state: ended a {} part as an expression", part.kind_name());
        };
        let is_string_literal = expression.is_string_literal.unwrap_or(false);

        let expression = match part.resume {
            State::AttributeValue => Expression {
                value: if expression.has_unenclosed_whitespace {
                    format!("({})", part.value)
                } else {
                    part.value
                },
                context: ExpressionContext::AttributeValue,
                is_string_literal,
                pos: part.pos,
                end_pos,
            },
            State::AttributeName if expression.method => Expression {
                value: format!("function{}", part.value),
                context: ExpressionContext::AttributeMethod,
                is_string_literal: false,
                pos: part.pos,
                end_pos,
            },
            resume @ (State::AttributeName | State::WithinOpenTag) => {
                // arguments report the text between the parentheses
                let inner = part
                    .value
                    .strip_prefix('(')
                    .and_then(|value| value.strip_suffix(')'))
                    .unwrap_or(&part.value)
                    .to_string();
                Expression {
                    value: inner,
                    context: if resume == State::AttributeName {
                        ExpressionContext::AttributeArgument
                    } else {
                        ExpressionContext::TagArgument
                    },
                    is_string_literal: false,
                    pos: part.pos + 1,
                    end_pos: end_pos.saturating_sub(1).max(part.pos + 1),
                }
            }
            other => panic!("illegal state: expression ended into {other}"),
        };
        self.open_tag_expression(expression);
    }
}

// =============================================================================
// Placeholder
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Start a `${` or `$!{` placeholder at the cursor and skip its marker.
    pub(crate) fn begin_placeholder(&mut self) {
        let marker_len = self.placeholder_marker_len().unwrap_or(2);
        let placeholder = PlaceholderPart {
            escape: marker_len == 2,
            depth: 0,
            within_body: !self.within_open_tag,
            within_attribute: self.within_attribute,
            within_string: self.state == State::String,
            within_template_string: self.state == State::TemplateString,
            within_open_tag: self.within_open_tag && !self.within_attribute,
            within_tag_name: matches!(self.state, State::TagName | State::TagNameShorthand),
        };
        self.placeholder_depth += 1;
        self.begin_part(PartKind::Placeholder(placeholder), "", State::Placeholder);
        self.skip(marker_len - 1);
    }

    pub(crate) fn handle_placeholder_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.append_to_part(newline),
            Input::Eof => {
                let pos = self.current_part().pos;
                self.notify_error(
                    pos,
                    ErrorCode::MalformedPlaceholder,
                    "EOF reached while parsing placeholder",
                );
            }
            Input::Char(quote @ ('"' | '\'')) => self.begin_string(quote),
            Input::Char('`') => self.begin_template_string(),
            Input::Char('}') if self.current_part_mut().placeholder_mut().depth == 0 => {
                let end_pos = self.pos + 1;
                self.end_placeholder(end_pos);
            }
            Input::Char(ch) => {
                let placeholder = self.current_part_mut().placeholder_mut();
                match ch {
                    '{' => placeholder.depth += 1,
                    '}' => placeholder.depth -= 1,
                    _ => {}
                }
                self.append_char_to_part(ch);
            }
        }
    }

    fn end_placeholder(&mut self, end_pos: usize) {
        let part = self.end_part();
        self.placeholder_depth -= 1;
        let PartKind::Placeholder(flags) = part.kind else {
            panic!("illegal state: ended a {} part as a placeholder", part.kind_name());
        };
        let marker_len = if flags.escape { 2 } else { 3 };
        let value = part.value;

        if !flags.within_template_string {
            self.listener.on_placeholder(&Placeholder {
                value: value.clone(),
                escape: flags.escape,
                within_body: flags.within_body,
                within_attribute: flags.within_attribute,
                within_string: flags.within_string,
                within_open_tag: flags.within_open_tag,
                within_tag_name: flags.within_tag_name,
                pos: part.pos,
                end_pos,
            });
        }

        match part.resume {
            State::String => {
                let string = self.current_part_mut().string_mut();
                if !string.current_text.is_empty() {
                    let text = core::mem::take(&mut string.current_text);
                    string.segments.push(StringSegment::Text(text));
                }
                string.segments.push(StringSegment::Placeholder(value));
            }
            State::TemplateString => self.append_to_part(&format!("${{{value}}}")),
            State::TagName => {
                let tag = self.current_tag_mut();
                tag.flush_tag_name_text();
                tag.tag_name_parts.push(format!("({value})"));
            }
            State::TagNameShorthand => {
                self.shorthand_placeholder(&value, part.pos, marker_len, end_pos);
            }
            State::WithinOpenTag => {
                let attribute = self.current_tag_mut().last_attribute_mut();
                attribute.value = Some(value);
                attribute.end_pos = end_pos;
            }
            _ => {}
        }
    }
}

// =============================================================================
// Template String
// =============================================================================

impl<L: Listener> Scanner<L> {
    pub(crate) fn begin_template_string(&mut self) {
        self.begin_part(PartKind::TemplateString, "`", State::TemplateString);
    }

    pub(crate) fn handle_template_string_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.append_to_part(newline),
            Input::Eof => {
                let pos = self.current_part().pos;
                self.notify_error(
                    pos,
                    ErrorCode::InvalidTemplateString,
                    "EOF reached while parsing template string expression",
                );
            }
            Input::Char('\\') => {
                let (escape, len) = self.escape_sequence();
                self.append_to_part(&escape);
                self.skip(len);
            }
            Input::Char('$') if self.placeholder_marker_len() == Some(2) => self.begin_placeholder(),
            Input::Char('`') => {
                self.append_char_to_part('`');
                let part = self.end_part();
                self.nested_literal_ended(&part.value);
            }
            Input::Char(ch) => self.append_char_to_part(ch),
        }
    }

    /// Splice a completed template string or regular expression into the
    /// expression or placeholder that contains it.
    fn nested_literal_ended(&mut self, value: &str) {
        if self.state == State::Expression {
            self.append_to_expression(value);
        } else {
            self.append_to_part(value);
        }
    }
}

// =============================================================================
// Regular Expression
// =============================================================================

impl<L: Listener> Scanner<L> {
    fn begin_regular_expression(&mut self) {
        let kind = PartKind::RegularExpression { in_char_set: false };
        self.begin_part(kind, "/", State::RegularExpression);
    }

    pub(crate) fn handle_regular_expression_state(&mut self, input: Input) {
        let Input::Char(ch) = input else {
            let pos = self.current_part().pos;
            let message = if input == Input::Eof {
                "EOF reached while parsing regular expression"
            } else {
                "EOL reached while parsing regular expression"
            };
            self.notify_error(pos, ErrorCode::InvalidRegularExpression, message);
            return;
        };

        let part = self.current_part_mut();
        let PartKind::RegularExpression { in_char_set } = &mut part.kind else {
            panic!("illegal state: expected a regular expression part");
        };
        match ch {
            '\\' => {
                let (escape, len) = self.escape_sequence();
                self.append_to_part(&escape);
                self.skip(len);
            }
            '[' => {
                *in_char_set = true;
                part.value.push(ch);
            }
            ']' => {
                *in_char_set = false;
                part.value.push(ch);
            }
            '/' if !*in_char_set => {
                part.value.push(ch);
                let flags: String = self.data[self.pos + 1..]
                    .chars()
                    .take_while(char::is_ascii_alphabetic)
                    .collect();
                self.skip(flags.len());
                let mut part = self.end_part();
                part.value.push_str(&flags);
                self.nested_literal_ended(&part.value);
            }
            _ => part.value.push(ch),
        }
    }
}
