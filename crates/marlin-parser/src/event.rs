//! Events delivered to listeners, in source order.

use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::node::Tag;

/// Which content mode produced a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextMode {
    /// Regular markup content.
    Html,
    /// Body of a parsed-text tag such as `script`.
    ParsedText,
    /// Body of a static-text tag.
    StaticText,
}

/// A run of body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    /// The text, with placeholder escapes normalized.
    pub value: String,
    /// Content mode the text was scanned in.
    pub mode: TextMode,
    /// Start offset.
    pub pos: usize,
    /// End offset.
    pub end_pos: usize,
}

/// A `${expr}` or `$!{expr}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Placeholder {
    /// Expression between the braces.
    pub value: String,
    /// `false` for the unescaped `$!{...}` form.
    pub escape: bool,
    /// Found in tag body content.
    pub within_body: bool,
    /// Found inside an attribute value.
    pub within_attribute: bool,
    /// Found inside a string literal.
    pub within_string: bool,
    /// Found directly inside an open tag (a spread attribute).
    pub within_open_tag: bool,
    /// Found inside a tag name or shorthand.
    pub within_tag_name: bool,
    /// Start offset (the `$`).
    pub pos: usize,
    /// End offset (after `}`).
    pub end_pos: usize,
}

/// A completed string literal, rewritten as an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringLiteral {
    /// `+`-joined expression of quoted text and `(placeholder)` parts.
    pub value: String,
    /// No placeholders were found.
    pub is_string_literal: bool,
    /// Offset of the opening quote.
    pub pos: usize,
    /// Offset after the closing quote.
    pub end_pos: usize,
}

/// Where an embedded expression was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpressionContext {
    /// Attribute value after `=`.
    AttributeValue,
    /// Attribute argument, `name(...)`.
    AttributeArgument,
    /// Tag argument, `tag(...)`.
    TagArgument,
    /// Attribute method, `name(params) { body }`.
    AttributeMethod,
}

/// An embedded expression that ended inside an open tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    /// Expression source (attribute values with unenclosed whitespace are parenthesized).
    pub value: String,
    /// Where the expression appeared.
    pub context: ExpressionContext,
    /// The expression is a single string literal.
    pub is_string_literal: bool,
    /// Start offset.
    pub pos: usize,
    /// End offset.
    pub end_pos: usize,
}

/// A closing tag, explicit or implied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTag {
    /// Name of the tag being closed.
    pub tag_name: String,
    /// Start offset; equal to `end_pos` for implied closes.
    pub pos: usize,
    /// End offset.
    pub end_pos: usize,
}

/// Flavor of an embedded script fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptletKind {
    /// `<% ... %>`.
    Tag,
    /// `$ statement` running to end of line.
    Line,
    /// `$ { ... }` braced block.
    Block,
}

/// An embedded script fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scriptlet {
    /// Script source (without braces for blocks).
    pub value: String,
    /// Fragment flavor.
    pub kind: ScriptletKind,
    /// Start offset.
    pub pos: usize,
    /// End offset.
    pub end_pos: usize,
}

/// Flavor of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CommentKind {
    /// `<!-- ... -->`.
    Html,
    /// `// ...` in concise content.
    Line,
    /// `/* ... */` in concise content.
    Block,
}

/// A comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment text without delimiters.
    pub value: String,
    /// Comment flavor.
    pub kind: CommentKind,
    /// Start offset.
    pub pos: usize,
    /// End offset.
    pub end_pos: usize,
}

/// A CDATA section, document type or declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Literal {
    /// Content between the delimiters.
    pub value: String,
    /// Start offset.
    pub pos: usize,
    /// End offset.
    pub end_pos: usize,
}

/// Every notification a scan can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Event {
    /// Body text.
    Text(Text),
    /// Placeholder.
    Placeholder(Placeholder),
    /// String literal.
    String(StringLiteral),
    /// Open-tag expression.
    Expression(Expression),
    /// Open tag.
    OpenTag(Tag),
    /// Close tag.
    CloseTag(CloseTag),
    /// Scriptlet or inline script.
    Scriptlet(Scriptlet),
    /// Comment.
    Comment(Comment),
    /// CDATA section.
    Cdata(Literal),
    /// Document type, e.g. `<!DOCTYPE html>`.
    DocumentType(Literal),
    /// Declaration, e.g. `<?xml version="1.0"?>`.
    Declaration(Literal),
    /// Diagnostic; the scan stopped here.
    Error(Diagnostic),
    /// End of the scan.
    Finish,
}

impl Event {
    /// Source range of the event, if it has one.
    #[must_use]
    pub const fn span(&self) -> Option<(usize, usize)> {
        match self {
            Self::Text(Text { pos, end_pos, .. })
            | Self::Placeholder(Placeholder { pos, end_pos, .. })
            | Self::String(StringLiteral { pos, end_pos, .. })
            | Self::Expression(Expression { pos, end_pos, .. })
            | Self::OpenTag(Tag { pos, end_pos, .. })
            | Self::CloseTag(CloseTag { pos, end_pos, .. })
            | Self::Scriptlet(Scriptlet { pos, end_pos, .. })
            | Self::Comment(Comment { pos, end_pos, .. })
            | Self::Cdata(Literal { pos, end_pos, .. })
            | Self::DocumentType(Literal { pos, end_pos, .. })
            | Self::Declaration(Literal { pos, end_pos, .. })
            | Self::Error(Diagnostic { pos, end_pos, .. }) => Some((*pos, *end_pos)),
            Self::Finish => None,
        }
    }

    /// Short lowercase name of the event kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Placeholder(_) => "placeholder",
            Self::String(_) => "string",
            Self::Expression(_) => "expression",
            Self::OpenTag(_) => "openTag",
            Self::CloseTag(_) => "closeTag",
            Self::Scriptlet(_) => "scriptlet",
            Self::Comment(_) => "comment",
            Self::Cdata(_) => "cdata",
            Self::DocumentType(_) => "documentType",
            Self::Declaration(_) => "declaration",
            Self::Error(_) => "error",
            Self::Finish => "finish",
        }
    }
}
