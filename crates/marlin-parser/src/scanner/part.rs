//! Parts: nested sub-scans with their own buffer and a state to resume.

use strum_macros::IntoStaticStr;

use super::core::State;
use crate::node::RawPart;

/// One frame of the part stack.
#[derive(Debug)]
pub(crate) struct Part {
    /// Offset where the part starts.
    pub pos: usize,
    /// State entered again when the part ends.
    pub resume: State,
    /// Accumulated text.
    pub value: String,
    pub kind: PartKind,
}

/// Variant-specific data of a part.
#[derive(Debug, IntoStaticStr)]
pub(crate) enum PartKind {
    String(StringPart),
    Placeholder(PlaceholderPart),
    Expression(ExpressionPart),
    TemplateString,
    RegularExpression { in_char_set: bool },
    Scriptlet { quote: Option<char> },
    InlineScript(InlineScriptPart),
    HtmlComment,
    Cdata,
    DocumentType,
    Declaration,
    JsComment { block: bool },
    TrailingWhitespace(TrailingWhitespace),
    TagNameShorthand(ShorthandPart),
}

#[derive(Debug)]
pub(crate) struct StringPart {
    pub quote: char,
    pub segments: Vec<StringSegment>,
    pub current_text: String,
    pub is_literal: bool,
}

#[derive(Debug)]
pub(crate) enum StringSegment {
    Text(String),
    Placeholder(String),
}

#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct PlaceholderPart {
    pub escape: bool,
    pub depth: usize,
    pub within_body: bool,
    pub within_attribute: bool,
    pub within_string: bool,
    pub within_template_string: bool,
    pub within_open_tag: bool,
    pub within_tag_name: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ExpressionPart {
    /// Closing characters still expected, innermost last.
    pub group_stack: Vec<char>,
    pub end_after_group: bool,
    /// An attribute argument continued into a `{ ... }` body.
    pub method: bool,
    pub has_unenclosed_whitespace: bool,
    pub is_string_literal: Option<bool>,
}

#[derive(Debug, Default)]
pub(crate) struct InlineScriptPart {
    pub string_quote: Option<char>,
    pub end_match: Option<char>,
    pub end_matches: Vec<char>,
}

/// What to do once the rest of a line has been checked for whitespace.
#[derive(Debug, Clone)]
pub(crate) enum TrailingWhitespace {
    /// After the closing delimiter of a multi-line HTML block.
    HtmlBlockDelimiterEnd { delimiter: String },
    /// After the opening delimiter of a multi-line HTML block.
    DelimiterStart { delimiter: String, indent: String },
    /// After a block comment that started a concise line.
    ConciseBlockComment,
    /// After `;` ended a concise open tag.
    SemicolonAfterTag,
}

/// How a whitespace check ended.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TrailingOutcome {
    Char(char),
    Eol(&'static str),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShorthandKind {
    Id,
    Class,
}

/// One `#id` or `.class` fragment being scanned.
#[derive(Debug)]
pub(crate) struct ShorthandFragmentBuilder {
    pub kind: ShorthandKind,
    pub string_parts: Vec<String>,
    pub raw_parts: Vec<RawPart>,
    pub text: String,
    pub text_start: usize,
}

#[derive(Debug, Default)]
pub(crate) struct ShorthandPart {
    pub has_id: bool,
    pub current: Option<ShorthandFragmentBuilder>,
}

impl ShorthandFragmentBuilder {
    pub(crate) const fn new(kind: ShorthandKind, text_start: usize) -> Self {
        Self {
            kind,
            string_parts: Vec::new(),
            raw_parts: Vec::new(),
            text: String::new(),
            text_start,
        }
    }

    /// Move buffered text into the parts, ending at `end_pos`.
    pub(crate) fn end_text(&mut self, end_pos: usize) {
        if self.text.is_empty() {
            return;
        }
        let text = core::mem::take(&mut self.text);
        self.string_parts.push(crate::node::json_quote(&text));
        self.raw_parts.push(RawPart::Text {
            text,
            pos: self.text_start,
            end_pos,
        });
    }
}

macro_rules! part_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        /// # Panics
        ///
        /// Panics if the part is of a different kind.
        pub(crate) fn $name(&mut self) -> &mut $ty {
            match &mut self.kind {
                PartKind::$variant(inner) => inner,
                other => panic!(
                    "illegal state: expected {} part, found {}",
                    stringify!($variant),
                    <&'static str>::from(&*other)
                ),
            }
        }
    };
}

impl Part {
    part_accessor!(string_mut, String, StringPart);
    part_accessor!(placeholder_mut, Placeholder, PlaceholderPart);
    part_accessor!(expression_mut, Expression, ExpressionPart);
    part_accessor!(inline_script_mut, InlineScript, InlineScriptPart);
    part_accessor!(shorthand_mut, TagNameShorthand, ShorthandPart);

    /// Kind name for logs.
    pub(crate) fn kind_name(&self) -> &'static str {
        (&self.kind).into()
    }
}
