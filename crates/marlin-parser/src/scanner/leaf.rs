//! Accumulate-until-terminator states: scriptlets, markup declarations and
//! script comments, plus the trailing whitespace check.

use super::core::{Input, Scanner, State};
use super::part::{InlineScriptPart, PartKind, TrailingOutcome, TrailingWhitespace};
use crate::diagnostic::ErrorCode;
use crate::event::{Comment, CommentKind, Literal, Scriptlet, ScriptletKind, TextMode};
use crate::listener::Listener;

// =============================================================================
// Scriptlets
// =============================================================================

impl<L: Listener> Scanner<L> {
    pub(crate) fn handle_scriptlet_state(&mut self, input: Input) {
        let at_end_marker = self.peek(1) == Some('>');
        let part = self.current_part_mut();
        let PartKind::Scriptlet { quote } = &mut part.kind else {
            panic!("illegal state: expected a scriptlet part");
        };
        match input {
            Input::Eol(newline) => part.value.push_str(newline),
            Input::Eof => {
                let pos = part.pos;
                self.notify_error(pos, ErrorCode::MalformedScriptlet, "EOF reached while parsing scriptlet");
            }
            Input::Char('\\') => {
                let (escape, len) = self.escape_sequence();
                self.append_to_part(&escape);
                self.skip(len);
            }
            Input::Char(ch) if quote.is_some() => {
                if *quote == Some(ch) {
                    *quote = None;
                }
                part.value.push(ch);
            }
            Input::Char(ch @ ('"' | '\'' | '`')) => {
                *quote = Some(ch);
                part.value.push(ch);
            }
            Input::Char('%') if at_end_marker => {
                let end_pos = self.pos + 2;
                self.skip(1);
                let part = self.end_part();
                self.listener.on_scriptlet(&Scriptlet {
                    value: part.value,
                    kind: ScriptletKind::Tag,
                    pos: part.pos,
                    end_pos,
                });
            }
            Input::Char(ch) => part.value.push(ch),
        }
    }

    /// Start a `$ ` inline script; the cursor is on `$`.
    pub(crate) fn begin_inline_script(&mut self) {
        self.end_text();
        let kind = PartKind::InlineScript(InlineScriptPart::default());
        self.begin_part(kind, "", State::InlineScript);
        self.skip(1);
    }

    pub(crate) fn handle_inline_script_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => {
                let script = self.current_part_mut().inline_script_mut();
                if script.end_match.is_some() || script.string_quote == Some('`') {
                    self.append_to_part(newline);
                } else {
                    let pos = self.pos;
                    self.end_inline_script(pos);
                    self.reconsume();
                }
            }
            Input::Eof => {
                let script = self.current_part_mut().inline_script_mut();
                if script.end_match.is_some() || script.string_quote.is_some() {
                    let pos = self.current_part().pos;
                    self.notify_error(
                        pos,
                        ErrorCode::MalformedScriptlet,
                        "EOF reached while parsing inline script",
                    );
                } else {
                    let pos = self.pos;
                    self.end_inline_script(pos);
                    self.redispatch_eof();
                }
            }
            Input::Char(ch) => self.inline_script_char(ch),
        }
    }

    fn inline_script_char(&mut self, ch: char) {
        let next = self.peek(1);
        // a closing tag ends a script written inside tag syntax
        let at_closing_tag = ch == '<'
            && self.current_part().resume == State::HtmlContent
            && self.match_closing_tag().is_some();
        let script = self.current_part_mut().inline_script_mut();

        if let Some(quote) = script.string_quote {
            if ch == quote {
                script.string_quote = None;
            }
            if ch == '\\' {
                let (escape, len) = self.escape_sequence();
                self.append_to_part(&escape);
                self.skip(len);
            } else {
                self.append_char_to_part(ch);
            }
            return;
        }

        match ch {
            '\\' => {
                let (escape, len) = self.escape_sequence();
                self.append_to_part(&escape);
                self.skip(len);
            }
            '/' if next == Some('/') => self.begin_js_comment(false),
            '/' if next == Some('*') => self.begin_js_comment(true),
            '<' if at_closing_tag && script.end_match.is_none() => {
                let pos = self.pos;
                self.end_inline_script(pos);
                self.reconsume();
            }
            '"' | '\'' | '`' => {
                script.string_quote = Some(ch);
                self.append_char_to_part(ch);
            }
            '(' | '[' | '{' => {
                if let Some(end_match) = script.end_match.take() {
                    script.end_matches.push(end_match);
                }
                script.end_match = Some(match ch {
                    '(' => ')',
                    '[' => ']',
                    _ => '}',
                });
                self.append_char_to_part(ch);
            }
            _ => {
                if script.end_match == Some(ch) {
                    script.end_match = script.end_matches.pop();
                }
                self.append_char_to_part(ch);
            }
        }
    }

    fn end_inline_script(&mut self, end_pos: usize) {
        let part = self.end_part();
        let trimmed = part.value.trim();
        let (value, kind) = match trimmed.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            Some(block) => (block.to_string(), ScriptletKind::Block),
            None => (trimmed.to_string(), ScriptletKind::Line),
        };
        self.listener.on_scriptlet(&Scriptlet {
            value,
            kind,
            pos: part.pos,
            end_pos,
        });
    }
}

// =============================================================================
// Markup Declarations
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Pop the current part and report it as a literal spanning to `end_pos`.
    fn end_literal(&mut self, end_pos: usize) -> Literal {
        let part = self.end_part();
        Literal {
            value: part.value,
            pos: part.pos,
            end_pos,
        }
    }

    pub(crate) fn handle_cdata_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.append_to_part(newline),
            Input::Eof => {
                let pos = self.current_part().pos;
                self.notify_error(pos, ErrorCode::MalformedCdata, "EOF reached while parsing CDATA");
            }
            Input::Char(']') if self.look_ahead_for("]]>", self.pos) => {
                let end_pos = self.pos + 3;
                self.skip(2);
                let cdata = self.end_literal(end_pos);
                self.listener.on_cdata(&cdata);
            }
            Input::Char(ch) => self.append_char_to_part(ch),
        }
    }

    pub(crate) fn handle_html_comment_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.append_to_part(newline),
            Input::Eof => {
                let pos = self.current_part().pos;
                self.notify_error(pos, ErrorCode::MalformedComment, "EOF reached while parsing comment");
            }
            Input::Char('-') if self.look_ahead_for("-->", self.pos) => {
                let end_pos = self.pos + 3;
                self.skip(2);
                let literal = self.end_literal(end_pos);
                self.listener.on_comment(&Comment {
                    value: literal.value,
                    kind: CommentKind::Html,
                    pos: literal.pos,
                    end_pos,
                });
            }
            Input::Char(ch) => self.append_char_to_part(ch),
        }
    }

    pub(crate) fn handle_document_type_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.append_to_part(newline),
            Input::Eof => {
                let pos = self.current_part().pos;
                self.notify_error(
                    pos,
                    ErrorCode::MalformedDocumentType,
                    "EOF reached while parsing document type",
                );
            }
            Input::Char('>') => {
                let end_pos = self.pos + 1;
                let document_type = self.end_literal(end_pos);
                self.listener.on_document_type(&document_type);
            }
            Input::Char(ch) => self.append_char_to_part(ch),
        }
    }

    pub(crate) fn handle_declaration_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.append_to_part(newline),
            Input::Eof => {
                let pos = self.current_part().pos;
                self.notify_error(
                    pos,
                    ErrorCode::MalformedDeclaration,
                    "EOF reached while parsing declaration",
                );
            }
            Input::Char('?') if self.peek(1) == Some('>') => {
                let end_pos = self.pos + 2;
                self.skip(1);
                let declaration = self.end_literal(end_pos);
                self.listener.on_declaration(&declaration);
            }
            Input::Char('>') => {
                let end_pos = self.pos + 1;
                let declaration = self.end_literal(end_pos);
                self.listener.on_declaration(&declaration);
            }
            Input::Char(ch) => self.append_char_to_part(ch),
        }
    }
}

// =============================================================================
// Script Comments
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Start a `//` or `/*` comment; the cursor is on the first `/`.
    pub(crate) fn begin_js_comment(&mut self, block: bool) {
        let state = if block {
            State::JsCommentBlock
        } else {
            State::JsCommentLine
        };
        self.begin_part(PartKind::JsComment { block }, "", state);
        self.skip(1);
    }

    pub(crate) fn handle_js_comment_line_state(&mut self, input: Input) {
        match input {
            Input::Eol(_) => {
                let pos = self.pos;
                self.end_js_comment(pos);
                self.reconsume();
            }
            Input::Eof => {
                let pos = self.pos;
                self.end_js_comment(pos);
                self.redispatch_eof();
            }
            Input::Char('<')
                if self.current_part().resume == State::ParsedTextContent
                    && self.check_for_closing_tag() => {}
            Input::Char(ch) => self.append_char_to_part(ch),
        }
    }

    pub(crate) fn handle_js_comment_block_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.append_to_part(newline),
            Input::Eof => {
                let pos = self.current_part().pos;
                self.notify_error(
                    pos,
                    ErrorCode::MalformedComment,
                    "EOF reached while parsing multi-line JavaScript comment",
                );
            }
            Input::Char('*') if self.peek(1) == Some('/') => {
                let end_pos = self.pos + 2;
                self.skip(1);
                self.end_js_comment(end_pos);
            }
            Input::Char(ch) => self.append_char_to_part(ch),
        }
    }

    /// Pop the comment and hand it to the state it interrupted.
    pub(crate) fn end_js_comment(&mut self, end_pos: usize) {
        let part = self.end_part();
        let PartKind::JsComment { block } = part.kind else {
            panic!("illegal state: ended a {} part as a comment", part.kind_name());
        };
        let raw = if block {
            format!("/*{}*/", part.value)
        } else {
            format!("//{}", part.value)
        };

        match part.resume {
            State::ConciseHtmlContent => {
                self.listener.on_comment(&Comment {
                    value: part.value,
                    kind: if block { CommentKind::Block } else { CommentKind::Line },
                    pos: part.pos,
                    end_pos,
                });
                if block {
                    self.begin_check_trailing_whitespace(TrailingWhitespace::ConciseBlockComment);
                }
            }
            State::Expression | State::InlineScript => self.append_to_part(&raw),
            State::ParsedTextContent => {
                if self.text.is_empty() {
                    self.text_pos = part.pos;
                    self.text_mode = TextMode::ParsedText;
                }
                self.text.push_str(&raw);
                self.text_end_pos = end_pos;
            }
            State::WithinOpenTag => {}
            other => panic!("illegal state: comment ended into {other}"),
        }
    }
}

// =============================================================================
// Trailing Whitespace
// =============================================================================

impl<L: Listener> Scanner<L> {
    pub(crate) fn handle_check_trailing_whitespace_state(&mut self, input: Input) {
        let outcome = match input {
            Input::Char(' ' | '\t') => return,
            Input::Char(ch) => TrailingOutcome::Char(ch),
            Input::Eol(newline) => TrailingOutcome::Eol(newline),
            Input::Eof => TrailingOutcome::Eof,
        };

        let part = self.end_part();
        let PartKind::TrailingWhitespace(handler) = part.kind else {
            panic!("illegal state: ended a {} part as a whitespace check", part.kind_name());
        };
        self.trailing_whitespace_checked(handler, outcome);

        if matches!(outcome, TrailingOutcome::Eof) {
            self.redispatch_eof();
        }
    }

    fn trailing_whitespace_checked(&mut self, handler: TrailingWhitespace, outcome: TrailingOutcome) {
        let pos = self.pos;
        if let TrailingOutcome::Char(ch) = outcome {
            let message = match &handler {
                TrailingWhitespace::HtmlBlockDelimiterEnd { delimiter } => format!(
                    "A non-whitespace of \"{ch}\" was found on the same line as the ending delimiter (\"{delimiter}\") for a multiline HTML block"
                ),
                TrailingWhitespace::DelimiterStart { delimiter, .. } => format!(
                    "A non-whitespace of \"{ch}\" was found after the starting delimiter (\"{delimiter}\") of a multiline HTML block"
                ),
                TrailingWhitespace::ConciseBlockComment => format!(
                    "A non-whitespace of \"{ch}\" was found after a JavaScript block comment"
                ),
                TrailingWhitespace::SemicolonAfterTag => format!(
                    "A non-whitespace of \"{ch}\" was found after the \";\" that ended an open tag"
                ),
            };
            self.notify_error(pos, ErrorCode::InvalidCharacter, message);
            return;
        }

        match (handler, outcome) {
            (TrailingWhitespace::HtmlBlockDelimiterEnd { .. }, _) => self.end_html_block(),
            (TrailingWhitespace::DelimiterStart { delimiter, indent }, TrailingOutcome::Eol(newline)) => {
                self.begin_delimited_html_block(indent, delimiter, newline);
            }
            _ => {}
        }
    }
}
