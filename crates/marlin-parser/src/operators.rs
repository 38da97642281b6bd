//! Operators that let an unenclosed expression continue past whitespace.
//!
//! An attribute value such as `x=a + b` or a concise value split across lines
//! keeps going when whitespace is followed by a binary operator (forward
//! match) or preceded by one (backward match).

/// Binary operators, recognized when followed by whitespace.
pub const BINARY_OPERATORS: &[&str] = &[
    ">>>=", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "==", "!=", "<=", ">=",
    "<<", ">>", "&&", "||", "??", "**", "+=", "-=", "*=", "/=", "%=", "&=", "^=", "|=", "*", "/",
    "%", "+", "-", "&", "^", "|", "?", ":", "=", "<", ">", "instanceof", "in",
];

/// Prefix keywords that continue an expression when they end it.
pub const UNARY_KEYWORDS: &[&str] = &["typeof", "void", "delete", "new", "await"];

/// Length of the whitespace plus operator that continues the expression at
/// the start of `rest`, or `None`.
///
/// Operators containing `>` are not continuations in tag syntax, where `>`
/// ends the open tag. `-` is not a continuation in legacy mode.
#[must_use]
pub fn match_forward(rest: &str, tag_syntax: bool, legacy_compatibility: bool) -> Option<usize> {
    let after = rest.trim_start_matches(is_whitespace);
    let whitespace = rest.len() - after.len();

    let operator = BINARY_OPERATORS
        .iter()
        .filter(|op| after.starts_with(**op))
        .max_by_key(|op| op.len())?;

    let next = after[operator.len()..].chars().next()?;
    if !is_whitespace(next) {
        return None;
    }
    if tag_syntax && operator.contains('>') {
        return None;
    }
    if legacy_compatibility && *operator == "-" {
        return None;
    }
    Some(whitespace + operator.len())
}

/// Whether `value` ends with an operator that expects another operand.
///
/// Postfix `++` and `--` do not count.
#[must_use]
pub fn ends_with_operator(value: &str) -> bool {
    let trimmed = value.trim_end_matches(is_whitespace);
    if trimmed.ends_with("++") || trimmed.ends_with("--") {
        return false;
    }

    BINARY_OPERATORS
        .iter()
        .chain(UNARY_KEYWORDS)
        .any(|op| {
            let Some(before) = trimmed.strip_suffix(*op) else {
                return false;
            };
            // keywords need a word boundary and must not be a property
            !op.starts_with(|c: char| c.is_ascii_alphabetic())
                || !before.ends_with(|c: char| is_identifier_char(c) || c == '.')
        })
}

/// Whitespace for scanning purposes: any control character or space.
#[must_use]
pub const fn is_whitespace(ch: char) -> bool {
    ch as u32 <= 32
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
