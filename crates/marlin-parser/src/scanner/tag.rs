//! Open tags, attributes and closing tags.

use super::block::Block;
use super::core::{Input, Scanner, State};
use super::part::{PartKind, ShorthandFragmentBuilder, ShorthandKind, ShorthandPart, TrailingWhitespace};
use crate::diagnostic::ErrorCode;
use crate::event::{Expression, ExpressionContext};
use crate::listener::Listener;
use crate::node::{Argument, Attribute, Method, RawPart, ShorthandFragment, Tag};
use crate::operators::is_whitespace;
use crate::options::BodyMode;
use crate::tags;

// =============================================================================
// Open Tag Lifecycle
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Push a new tag and start scanning its name.
    ///
    /// In tag syntax the cursor is on `<`; in concise syntax it is on the
    /// first character of the name.
    pub(crate) fn begin_open_tag(&mut self) {
        self.end_text();
        let concise = self.is_concise;
        let pos = self.pos;
        let indent = if concise { self.indent.clone() } else { String::new() };

        let mut tag = Tag::new(pos, indent, concise);
        tag.tag_name_start = if concise { pos } else { pos + 1 };
        if self.begin_mixed_mode {
            tag.begin_mixed_mode = true;
            self.begin_mixed_mode = false;
        }

        self.blocks.push(Block::Tag(tag));
        self.within_open_tag = true;
        self.enter_state(State::TagName);
    }

    fn is_open_tag_only(&self, tag_name: &str) -> bool {
        let lower = tag_name.to_ascii_lowercase();
        self.options
            .open_tag_only
            .as_ref()
            .and_then(|predicate| predicate(&lower))
            .unwrap_or_else(|| tags::is_open_tag_only(&lower))
    }

    /// Report the current open tag and pick the state for its body.
    ///
    /// The cursor is on `>` or the `/` of `/>` in tag syntax, or on whatever
    /// ended the tag in concise syntax.
    pub(crate) fn finish_open_tag(&mut self, self_closed: bool) {
        let concise = self.is_concise;
        let pos = self.pos;
        let end_pos = match (concise, self_closed) {
            (true, _) => pos,
            (false, true) => pos + 2,
            (false, false) => pos + 1,
        };

        let (name_start, name_end) = {
            let tag = self.current_tag();
            (tag.tag_name_start, tag.tag_name_end.unwrap_or(pos))
        };
        let source_name = self.data.get(name_start..name_end).unwrap_or_default().to_string();

        let tag = self.current_tag_mut();
        if !tag.tag_name_parts.is_empty() {
            tag.flush_tag_name_text();
            tag.tag_name_expression = Some(tag.tag_name_parts.join("+"));
        }
        if tag.tag_name.is_empty() && tag.tag_name_expression.is_none() {
            tag.tag_name = "div".to_string();
        }
        let tag_name = tag.tag_name.clone();
        let parse_options = self.options.tag_parse_options.get(&tag_name).cloned().unwrap_or_default();

        let tag = self.current_tag_mut();
        if parse_options.ignore_attributes {
            tag.attributes.clear();
        } else if tag.requires_commas && tag.attributes.len() > 1 && !parse_options.relax_require_commas {
            let missing = tag.attributes[..tag.attributes.len() - 1]
                .iter()
                .find(|attribute| !attribute.ended_with_comma)
                .map(|attribute| attribute.pos);
            if let Some(attribute_pos) = missing {
                self.notify_error(
                    attribute_pos,
                    ErrorCode::CommasRequired,
                    "if commas are used, they must be used to separate all attributes for a tag",
                );
                return;
            }
        }

        let open_tag_only = self.is_open_tag_only(&tag_name);
        let expected = if source_name.is_empty() {
            tag_name.clone()
        } else {
            source_name
        };

        let tag = self.current_tag_mut();
        tag.expected_close_tag_name.clone_from(&expected);
        tag.open_tag_only = open_tag_only;
        tag.self_closed = self_closed;
        tag.end_pos = end_pos;
        self.expected_close_tag_name = Some(expected.clone());
        self.within_open_tag = false;

        let Some(Block::Tag(tag)) = self.blocks.last() else {
            panic!("illegal state: no open tag to finish");
        };
        let mode = self.listener.on_open_tag(tag);

        if self_closed || (open_tag_only && !concise) {
            self.close_tag(&expected, end_pos, end_pos);
            if !self.errored {
                self.enter_content_state();
            }
            return;
        }

        let body = match mode {
            BodyMode::Default => parse_options
                .body
                .filter(|body| *body != BodyMode::Default)
                .or_else(|| matches!(tag_name.as_str(), "script" | "style").then_some(BodyMode::ParsedText)),
            chosen => Some(chosen),
        };
        match body {
            Some(BodyMode::ParsedText) => self.enter_text_body(BodyMode::ParsedText, State::ParsedTextContent),
            Some(BodyMode::StaticText) => self.enter_text_body(BodyMode::StaticText, State::StaticTextContent),
            _ => self.enter_content_state(),
        }
    }

    /// Scan the body of the current tag as text.
    ///
    /// Concise tags only record the mode; their body lines are HTML blocks.
    fn enter_text_body(&mut self, body: BodyMode, state: State) {
        self.current_tag_mut().body = Some(body);
        if self.is_concise {
            self.enter_concise_html_content_state();
        } else {
            self.enter_state(state);
        }
    }

    /// End of input inside an open tag.
    pub(crate) fn open_tag_eof(&mut self) {
        if !self.is_concise {
            self.malformed_open_tag("EOF reached while parsing open tag");
        } else if self.current_tag().within_attr_group {
            self.malformed_open_tag("EOF reached while within an attribute group (e.g. \"[ ... ]\").");
        } else {
            self.finish_open_tag(false);
            if !self.errored {
                self.html_eof();
            }
        }
    }
}

// =============================================================================
// Tag Name
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Whether `ch` ends a tag name or shorthand fragment.
    fn is_tag_name_terminator(&self, ch: char) -> bool {
        match ch {
            '(' | '=' | '/' => true,
            '>' => !self.is_concise,
            ';' | '[' => self.is_concise,
            _ => is_whitespace(ch),
        }
    }

    pub(crate) fn handle_tag_name_state(&mut self, input: Input) {
        match input {
            Input::Eol(_) => {
                self.end_tag_name();
                self.enter_state(State::WithinOpenTag);
                self.reconsume();
            }
            Input::Eof => {
                self.end_tag_name();
                self.open_tag_eof();
            }
            Input::Char('$') if self.placeholder_marker_len().is_some() => self.begin_placeholder(),
            Input::Char('#' | '.') => {
                self.end_tag_name();
                let kind = PartKind::TagNameShorthand(ShorthandPart::default());
                self.begin_part(kind, "", State::TagNameShorthand);
                self.reconsume();
            }
            Input::Char(ch) if is_whitespace(ch) => {
                self.end_tag_name();
                self.enter_state(State::WithinOpenTag);
            }
            Input::Char(ch) if self.is_tag_name_terminator(ch) => {
                self.end_tag_name();
                self.enter_state(State::WithinOpenTag);
                self.reconsume();
            }
            Input::Char(ch) => {
                let tag = self.current_tag_mut();
                tag.tag_name.push(ch);
                tag.tag_name_text.push(ch);
            }
        }
    }

    fn end_tag_name(&mut self) {
        let pos = self.pos;
        let tag = self.current_tag_mut();
        if tag.tag_name_end.is_none() {
            tag.tag_name_end = Some(pos);
        }
    }

    pub(crate) fn handle_tag_name_shorthand_state(&mut self, input: Input) {
        match input {
            Input::Eol(_) => {
                self.end_tag_name_shorthand();
                self.reconsume();
            }
            Input::Eof => {
                self.end_tag_name_shorthand();
                self.redispatch_eof();
            }
            Input::Char(ch @ ('#' | '.')) => {
                let kind = if ch == '#' {
                    ShorthandKind::Id
                } else {
                    ShorthandKind::Class
                };
                self.begin_shorthand_fragment(kind);
            }
            Input::Char('$') if self.placeholder_marker_len().is_some() => self.begin_placeholder(),
            Input::Char(ch) if self.is_tag_name_terminator(ch) => {
                self.end_tag_name_shorthand();
                self.reconsume();
            }
            Input::Char(ch) => {
                let pos = self.pos;
                let shorthand = self.current_part_mut().shorthand_mut();
                if let Some(fragment) = shorthand.current.as_mut() {
                    if fragment.text.is_empty() {
                        fragment.text_start = pos;
                    }
                    fragment.text.push(ch);
                }
            }
        }
    }

    fn begin_shorthand_fragment(&mut self, kind: ShorthandKind) {
        self.end_shorthand_fragment();
        let pos = self.pos;
        let shorthand = self.current_part_mut().shorthand_mut();
        if kind == ShorthandKind::Id {
            if shorthand.has_id {
                self.notify_error(
                    pos,
                    ErrorCode::InvalidTagShorthand,
                    "Multiple shorthand ID parts are not allowed on the same tag",
                );
                return;
            }
            shorthand.has_id = true;
        }
        shorthand.current = Some(ShorthandFragmentBuilder::new(kind, pos + 1));
    }

    /// Attach the fragment being scanned to the tag.
    fn end_shorthand_fragment(&mut self) {
        let pos = self.pos;
        let Some(mut fragment) = self.current_part_mut().shorthand_mut().current.take() else {
            return;
        };
        fragment.end_text(pos);
        let value = if fragment.string_parts.is_empty() {
            "\"\"".to_string()
        } else {
            fragment.string_parts.join("+")
        };
        let shorthand = ShorthandFragment {
            value,
            raw_parts: fragment.raw_parts,
        };

        let tag = self.current_tag_mut();
        match fragment.kind {
            ShorthandKind::Id => tag.shorthand_id = Some(shorthand),
            ShorthandKind::Class => tag.shorthand_class_names.push(shorthand),
        }
    }

    /// Finish the shorthand and hand the terminator back to the tag name.
    fn end_tag_name_shorthand(&mut self) {
        self.end_shorthand_fragment();
        let _ = self.end_part();
    }

    /// A placeholder ended inside a shorthand fragment.
    pub(crate) fn shorthand_placeholder(&mut self, value: &str, pos: usize, marker_len: usize, end_pos: usize) {
        let shorthand = self.current_part_mut().shorthand_mut();
        if let Some(fragment) = shorthand.current.as_mut() {
            fragment.end_text(pos);
            fragment.string_parts.push(format!("({value})"));
            fragment.raw_parts.push(RawPart::Expression {
                expression: value.to_string(),
                pos: pos + marker_len,
                end_pos: end_pos - 1,
            });
        }
    }
}

// =============================================================================
// Attributes
// =============================================================================

impl<L: Listener> Scanner<L> {
    pub(crate) fn handle_within_open_tag_state(&mut self, input: Input) {
        let concise = self.is_concise;
        let within_attr_group = self.current_tag().within_attr_group;
        match input {
            Input::Eol(_) => {
                if concise && !within_attr_group {
                    self.finish_open_tag(false);
                }
            }
            Input::Eof => self.open_tag_eof(),
            Input::Char(']') if concise && within_attr_group => {
                self.current_tag_mut().within_attr_group = false;
            }
            Input::Char('[') if concise => {
                if within_attr_group {
                    self.malformed_open_tag("Unexpected \"[\" character within open tag.");
                } else {
                    self.current_tag_mut().within_attr_group = true;
                }
            }
            Input::Char('>') if !concise => self.finish_open_tag(false),
            Input::Char('/') if !concise && self.peek(1) == Some('>') => {
                self.finish_open_tag(true);
                self.skip(1);
            }
            Input::Char('/') if self.peek(1) == Some('/') => self.begin_js_comment(false),
            Input::Char('/') if self.peek(1) == Some('*') => self.begin_js_comment(true),
            Input::Char(';') if concise => {
                self.finish_open_tag(false);
                if !self.errored {
                    self.begin_check_trailing_whitespace(TrailingWhitespace::SemicolonAfterTag);
                }
            }
            Input::Char('-') if concise && !within_attr_group && self.peek(1) == Some('-') => {
                self.open_tag_html_block();
            }
            Input::Char('$') if self.placeholder_marker_len().is_some() => {
                let pos = self.pos;
                let mut attribute = Attribute::new(pos);
                attribute.spread = true;
                self.current_tag_mut().attributes.push(attribute);
                self.begin_placeholder();
            }
            Input::Char('(') => self.begin_tag_argument(),
            Input::Char(',') => {
                let tag = self.current_tag_mut();
                if let Some(attribute) = tag.attributes.last_mut() {
                    attribute.ended_with_comma = true;
                    tag.requires_commas = true;
                }
            }
            Input::Char(ch) if is_whitespace(ch) => {}
            Input::Char('<') => {
                let pos = self.pos;
                self.notify_error(
                    pos,
                    ErrorCode::InvalidAttributeName,
                    "Invalid attribute name. Attribute name cannot begin with the \"<\" character.",
                );
            }
            Input::Char(_) => {
                let pos = self.pos;
                self.current_tag_mut().attributes.push(Attribute::new(pos));
                self.within_attribute = true;
                self.enter_state(State::AttributeName);
                self.reconsume();
            }
        }
    }

    /// `--` after the attributes of a concise tag.
    fn open_tag_html_block(&mut self) {
        let indent = self.current_tag().indent.clone();
        let rest = self.rest();
        let count = rest.len() - rest.trim_start_matches('-').len();
        let after = self.pos + count;

        self.finish_open_tag(false);
        if self.errored {
            return;
        }

        if self.only_whitespace_remains_on_line(after) {
            self.skip(count - 1);
            self.begin_check_trailing_whitespace(TrailingWhitespace::DelimiterStart {
                delimiter: "-".repeat(count),
                indent,
            });
        } else {
            let whitespace = self.inline_whitespace_len(after);
            self.begin_html_block(indent, None, true);
            self.skip(count - 1 + whitespace);
        }
    }

    fn begin_tag_argument(&mut self) {
        let tag = self.current_tag();
        if tag.argument.is_some() || !tag.attributes.is_empty() {
            let message = if tag.argument.is_some() {
                "A tag can only have one argument"
            } else {
                "A tag argument must directly follow the tag name"
            };
            let pos = self.pos;
            self.notify_error(pos, ErrorCode::IllegalTagArgument, message);
            return;
        }
        self.begin_expression(true);
        self.reconsume();
    }

    fn is_attribute_name_terminator(&self, ch: char) -> bool {
        let concise = self.is_concise;
        match ch {
            ',' => true,
            '>' => !concise,
            '/' => match self.peek(1) {
                Some('>') => !concise,
                Some('/' | '*') => true,
                _ => false,
            },
            ';' | '[' => concise,
            ']' => concise && self.current_tag().within_attr_group,
            _ => is_whitespace(ch),
        }
    }

    pub(crate) fn handle_attribute_name_state(&mut self, input: Input) {
        match input {
            Input::Eol(_) => {
                let pos = self.pos;
                self.end_attribute(pos);
                self.reconsume();
            }
            Input::Eof => {
                let pos = self.pos;
                self.end_attribute(pos);
                self.redispatch_eof();
            }
            Input::Char('=') => {
                let pos = self.pos;
                self.enter_state(State::AttributeValue);
                self.begin_expression(false);
                self.current_part_mut().pos = pos + 1;
            }
            Input::Char('(') => {
                self.begin_expression(true);
                self.reconsume();
            }
            Input::Char(ch) if self.is_attribute_name_terminator(ch) => {
                let pos = self.pos;
                self.end_attribute(pos);
                self.reconsume();
            }
            Input::Char(ch) => self.current_tag_mut().last_attribute_mut().name.push(ch),
        }
    }

    pub(crate) fn end_attribute(&mut self, end_pos: usize) {
        self.current_tag_mut().last_attribute_mut().end_pos = end_pos;
        self.within_attribute = false;
        self.enter_within_open_tag_state();
    }

    /// Store a completed open-tag expression where it belongs.
    pub(crate) fn open_tag_expression(&mut self, expression: Expression) {
        self.listener.on_expression(&expression);
        let tag = self.current_tag_mut();
        match expression.context {
            ExpressionContext::AttributeValue => {
                let attribute = tag.last_attribute_mut();
                attribute.value = Some(expression.value);
                attribute.is_string_literal = expression.is_string_literal;
                self.end_attribute(expression.end_pos);
            }
            ExpressionContext::AttributeArgument => {
                tag.last_attribute_mut().argument = Some(Argument {
                    value: expression.value,
                    pos: expression.pos,
                    end_pos: expression.end_pos,
                });
            }
            ExpressionContext::AttributeMethod => {
                tag.last_attribute_mut().method = Some(Method {
                    value: expression.value,
                    pos: expression.pos,
                    end_pos: expression.end_pos,
                });
            }
            ExpressionContext::TagArgument => {
                tag.argument = Some(Argument {
                    value: expression.value,
                    pos: expression.pos,
                    end_pos: expression.end_pos,
                });
            }
        }
    }
}

// =============================================================================
// Closing Tag
// =============================================================================

impl<L: Listener> Scanner<L> {
    pub(crate) fn handle_close_tag_state(&mut self, input: Input) {
        match input {
            Input::Eol(_) => {}
            Input::Eof => {
                let pos = self.close_tag_pos;
                self.notify_error(
                    pos,
                    ErrorCode::MalformedCloseTag,
                    "EOF reached while parsing closing tag",
                );
            }
            Input::Char('>') => {
                let mut name = core::mem::take(&mut self.close_tag_name);
                if name.is_empty() {
                    name = self.expected_close_tag_name.clone().unwrap_or_default();
                }
                let (pos, end_pos) = (self.close_tag_pos, self.pos + 1);
                if name.is_empty() {
                    self.notify_error(
                        pos,
                        ErrorCode::ExtraClosingTag,
                        "The closing tag was not expected",
                    );
                    return;
                }
                self.close_tag(&name, pos, end_pos);
                if !self.errored {
                    self.enter_state(State::HtmlContent);
                }
            }
            Input::Char(ch) if is_whitespace(ch) => {}
            Input::Char(ch) => self.close_tag_name.push(ch),
        }
    }
}
