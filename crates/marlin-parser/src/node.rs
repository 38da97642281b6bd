//! Tags and attributes as they are assembled during a scan.

use serde::Serialize;

use crate::options::BodyMode;

/// A parenthesized argument, e.g. `x` in `if(x)`.
///
/// Positions cover the text between the parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    /// Source text between the parentheses.
    pub value: String,
    /// Offset just after `(`.
    pub pos: usize,
    /// Offset of `)`.
    pub end_pos: usize,
}

/// An attribute method such as `on-click(event) { go(event) }`.
///
/// The value is rewritten as a function expression, `function(event) { go(event) }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Function expression source.
    pub value: String,
    /// Offset of `(`.
    pub pos: usize,
    /// Offset after the closing `}`.
    pub end_pos: usize,
}

/// One attribute of an open tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// Attribute name; empty for spread attributes.
    pub name: String,
    /// Value expression, if `=value` was present.
    pub value: Option<String>,
    /// The value is a single string literal with no placeholders.
    pub is_string_literal: bool,
    /// Argument, e.g. `handler` in `on-click(handler)`.
    pub argument: Option<Argument>,
    /// Method body following the argument.
    pub method: Option<Method>,
    /// Spread attribute written as `${expr}` inside the open tag.
    pub spread: bool,
    /// Start offset.
    pub pos: usize,
    /// End offset.
    pub end_pos: usize,
    #[serde(skip)]
    pub(crate) ended_with_comma: bool,
}

impl Attribute {
    pub(crate) const fn new(pos: usize) -> Self {
        Self {
            name: String::new(),
            value: None,
            is_string_literal: false,
            argument: None,
            method: None,
            spread: false,
            pos,
            end_pos: pos,
            ended_with_comma: false,
        }
    }
}

/// Source piece of a shorthand id or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawPart {
    /// Literal text.
    #[serde(rename_all = "camelCase")]
    Text {
        /// The text.
        text: String,
        /// Start offset.
        pos: usize,
        /// End offset.
        end_pos: usize,
    },
    /// A placeholder's expression source.
    #[serde(rename_all = "camelCase")]
    Expression {
        /// Expression source between `${` and `}`.
        expression: String,
        /// Start offset of the expression.
        pos: usize,
        /// End offset of the expression.
        end_pos: usize,
    },
}

/// A `#id` or `.class` suffix on a tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShorthandFragment {
    /// `+`-joined expression of JSON-quoted text and `(placeholder)` parts.
    pub value: String,
    /// The pieces the value was built from, in source order.
    pub raw_parts: Vec<RawPart>,
}

/// An open tag.
///
/// Public fields describe the tag as reported to listeners; the crate-private
/// ones are scanning bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Tag {
    /// Literal tag name (`div` when the source name is empty).
    pub tag_name: String,
    /// Name expression when the name contains placeholders.
    pub tag_name_expression: Option<String>,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Tag argument, e.g. `x` in `<if(x)>`.
    pub argument: Option<Argument>,
    /// `#id` shorthand.
    pub shorthand_id: Option<ShorthandFragment>,
    /// `.class` shorthands.
    pub shorthand_class_names: Vec<ShorthandFragment>,
    /// Opened in the concise dialect.
    pub concise: bool,
    /// Written as `<tag/>`.
    pub self_closed: bool,
    /// Cannot have a body.
    pub open_tag_only: bool,
    /// Indentation of the line the tag was opened on (concise only).
    pub indent: String,
    /// Name a closing tag must use.
    pub expected_close_tag_name: String,
    /// Start offset.
    pub pos: usize,
    /// End offset of the open tag.
    pub end_pos: usize,

    #[serde(skip)]
    pub(crate) tag_name_start: usize,
    #[serde(skip)]
    pub(crate) tag_name_end: Option<usize>,
    #[serde(skip)]
    pub(crate) tag_name_text: String,
    #[serde(skip)]
    pub(crate) tag_name_parts: Vec<String>,
    #[serde(skip)]
    pub(crate) nested_indent: Option<String>,
    #[serde(skip)]
    pub(crate) body: Option<BodyMode>,
    #[serde(skip)]
    pub(crate) begin_mixed_mode: bool,
    #[serde(skip)]
    pub(crate) within_attr_group: bool,
    #[serde(skip)]
    pub(crate) requires_commas: bool,
}

impl Tag {
    pub(crate) fn new(pos: usize, indent: String, concise: bool) -> Self {
        Self {
            tag_name: String::new(),
            tag_name_expression: None,
            attributes: Vec::new(),
            argument: None,
            shorthand_id: None,
            shorthand_class_names: Vec::new(),
            concise,
            self_closed: false,
            open_tag_only: false,
            indent,
            expected_close_tag_name: String::new(),
            pos,
            end_pos: pos,
            tag_name_start: pos,
            tag_name_end: None,
            tag_name_text: String::new(),
            tag_name_parts: Vec::new(),
            nested_indent: None,
            body: None,
            begin_mixed_mode: false,
            within_attr_group: false,
            requires_commas: false,
        }
    }

    /// Flush the pending literal run of a dynamic tag name.
    pub(crate) fn flush_tag_name_text(&mut self) {
        if !self.tag_name_text.is_empty() {
            let text = core::mem::take(&mut self.tag_name_text);
            self.tag_name_parts.push(json_quote(&text));
        }
    }

    /// The attribute being scanned.
    ///
    /// # Panics
    ///
    /// Panics if the tag has no attributes.
    pub(crate) fn last_attribute_mut(&mut self) -> &mut Attribute {
        match self.attributes.last_mut() {
            Some(attribute) => attribute,
            None => panic!("illegal state: tag has no current attribute"),
        }
    }
}

/// Quote `text` as a JSON string literal.
pub(crate) fn json_quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_quote_escapes() {
        assert_eq!(json_quote("foo"), "\"foo\"");
        assert_eq!(json_quote("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_dynamic_name_parts() {
        let mut tag = Tag::new(0, String::new(), false);
        tag.tag_name_text.push_str("my-");
        tag.flush_tag_name_text();
        tag.tag_name_parts.push("(name)".to_string());
        tag.flush_tag_name_text();
        assert_eq!(tag.tag_name_parts.join("+"), "\"my-\"+(name)");
    }
}
