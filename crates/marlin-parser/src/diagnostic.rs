//! Diagnostics reported for malformed templates.

use serde::Serialize;
use strum_macros::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// The closed set of error codes the scanner reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// End of input inside an open tag.
    MalformedOpenTag,
    /// End of input inside a closing tag.
    MalformedCloseTag,
    /// End of input inside `<!...>`.
    MalformedDocumentType,
    /// End of input inside `<?...?>`.
    MalformedDeclaration,
    /// End of input inside a scriptlet or an unterminated inline script group.
    MalformedScriptlet,
    /// End of input inside an HTML or script comment.
    MalformedComment,
    /// End of input inside `<![CDATA[...]]>`.
    MalformedCdata,
    /// End of input inside `${...}`.
    MalformedPlaceholder,
    /// End of input inside a string literal.
    InvalidString,
    /// End of input inside a template literal.
    InvalidTemplateString,
    /// Unterminated regular expression literal.
    InvalidRegularExpression,
    /// Unbalanced brackets inside an embedded expression.
    InvalidExpression,
    /// A closing tag with no open tag to close.
    ExtraClosingTag,
    /// A closing tag whose name disagrees with the innermost open tag.
    MismatchedClosingTag,
    /// An open tag that was never closed.
    MissingEndTag,
    /// Commas used to separate some, but not all, attributes.
    CommasRequired,
    /// Non-whitespace where only whitespace may follow.
    InvalidCharacter,
    /// More than one `#id` shorthand on a tag.
    InvalidTagShorthand,
    /// An attribute name starting with `<`.
    InvalidAttributeName,
    /// A second argument on one tag.
    IllegalTagArgument,
    /// A concise line indented differently from its siblings.
    BadIndentation,
    /// A concise line starting with a character that cannot begin a line.
    IllegalLineStart,
}

/// A malformed-input report.
///
/// Diagnostics are delivered to [`Listener::on_error`](crate::Listener::on_error)
/// rather than returned, and the scan stops after the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{code}: {message}")]
pub struct Diagnostic {
    /// Symbolic error code.
    pub code: ErrorCode,
    /// Human-readable explanation.
    pub message: String,
    /// Byte offset where the offending construct starts.
    pub pos: usize,
    /// Byte offset where scanning stopped.
    pub end_pos: usize,
}
