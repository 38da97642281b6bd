//! Body content states of both dialects.

use super::block::Block;
use super::core::{Input, Scanner, State};
use super::part::{PartKind, TrailingWhitespace};
use crate::diagnostic::ErrorCode;
use crate::listener::Listener;
use crate::operators::is_whitespace;
use crate::options::BodyMode;

// =============================================================================
// Tag Syntax Content
// =============================================================================

impl<L: Listener> Scanner<L> {
    pub(crate) fn handle_html_content_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.html_content_eol(newline),
            Input::Eof => self.html_eof(),
            Input::Char('<') => self.html_content_less_than(),
            Input::Char('\\') if self.escaped_placeholder() => {}
            Input::Char('$') if self.placeholder_marker_len().is_some() => {
                self.end_text();
                self.begin_placeholder();
            }
            // `$ ` at the start of a line runs a statement to end of line
            Input::Char('$')
                if matches!(self.peek(1), Some(' ' | '\t')) && self.is_beginning_of_line() =>
            {
                self.begin_inline_script();
            }
            Input::Char(ch) => self.push_char(ch),
        }
    }

    /// Dispatch on the construct a `<` opens.
    fn html_content_less_than(&mut self) {
        let rest = self.rest();
        if rest.starts_with("<![CDATA[") {
            self.end_text();
            self.begin_part(PartKind::Cdata, "", State::Cdata);
            self.skip(8);
        } else if rest.starts_with("<!--") {
            self.end_text();
            self.begin_part(PartKind::HtmlComment, "", State::HtmlComment);
            self.skip(3);
        } else if rest.starts_with("<!") {
            self.end_text();
            self.begin_part(PartKind::DocumentType, "", State::DocumentType);
            self.skip(1);
        } else if rest.starts_with("<?") {
            self.end_text();
            self.begin_part(PartKind::Declaration, "", State::Declaration);
            self.skip(1);
        } else if rest.starts_with("<%") {
            self.end_text();
            self.begin_part(PartKind::Scriptlet { quote: None }, "", State::Scriptlet);
            self.skip(1);
        } else if rest.starts_with("</") {
            self.end_text();
            self.close_tag_pos = self.pos;
            self.close_tag_name.clear();
            self.skip(1);
            self.enter_state(State::CloseTag);
        } else if self
            .peek(1)
            .is_none_or(|next| next == '>' || next == '<' || is_whitespace(next))
        {
            self.push_text("<", 1);
        } else {
            self.begin_open_tag();
        }
    }

    /// Handle `\${` and `\\${` at the cursor. Returns whether it matched.
    fn escaped_placeholder(&mut self) -> bool {
        let pos = self.pos;
        if self.look_ahead_for("\\\\${", pos) {
            // the escaped backslash stays, the placeholder is still recognized
            self.push_text("\\", 2);
            self.skip(1);
            true
        } else if self.look_ahead_for("\\${", pos) {
            self.push_text("$", 2);
            self.skip(1);
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Text Content
// =============================================================================

impl<L: Listener> Scanner<L> {
    pub(crate) fn handle_parsed_text_content_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.html_content_eol(newline),
            Input::Eof => self.html_eof(),
            Input::Char('<') if self.check_for_closing_tag() => {}
            Input::Char('/') if self.peek(1) == Some('/') => self.begin_js_comment(false),
            Input::Char('/') if self.peek(1) == Some('*') => self.begin_js_comment(true),
            Input::Char('\\') if self.escaped_placeholder() => {}
            Input::Char('$') if self.placeholder_marker_len().is_some() => {
                self.end_text();
                self.begin_placeholder();
            }
            Input::Char(ch) => self.push_char(ch),
        }
    }

    pub(crate) fn handle_static_text_content_state(&mut self, input: Input) {
        match input {
            Input::Eol(newline) => self.html_content_eol(newline),
            Input::Eof => self.html_eof(),
            Input::Char('<') if self.check_for_closing_tag() => {}
            Input::Char(ch) => self.push_char(ch),
        }
    }

    /// The closing tag at the cursor that ends a text body, as the name to
    /// close with and the number of bytes after `<` it spans.
    pub(crate) fn match_closing_tag(&self) -> Option<(String, usize)> {
        let tag = self.top_tag()?;
        let start = self.pos + 1;
        if self.look_ahead_for("/>", start) {
            return Some((tag.expected_close_tag_name.clone(), 2));
        }
        [&tag.tag_name, &tag.expected_close_tag_name]
            .into_iter()
            .find(|name| !name.is_empty() && self.look_ahead_for(&format!("/{name}>"), start))
            .map(|name| (name.clone(), name.len() + 2))
    }

    /// Close the current text-body tag if its closing tag is at the cursor.
    pub(crate) fn check_for_closing_tag(&mut self) -> bool {
        let Some((name, len)) = self.match_closing_tag() else {
            return false;
        };

        if self.state == State::JsCommentLine {
            let pos = self.pos;
            self.end_js_comment(pos);
        }
        self.end_text();

        let pos = self.pos;
        self.close_tag(&name, pos, pos + 1 + len);
        self.skip(len);
        if !self.errored {
            self.enter_html_content_state();
        }
        true
    }
}

// =============================================================================
// Concise Content
// =============================================================================

impl<L: Listener> Scanner<L> {
    pub(crate) fn handle_concise_html_content_state(&mut self, input: Input) {
        match input {
            Input::Eol(_) => self.indent.clear(),
            Input::Eof => self.html_eof(),
            Input::Char(ch) if is_whitespace(ch) => self.indent.push(ch),
            Input::Char(ch) => self.concise_line_start(ch),
        }
    }

    /// First non-whitespace character of a concise line.
    fn concise_line_start(&mut self, ch: char) {
        let indent = self.indent.clone();

        // tags at this indentation or deeper are done
        let pos = self.pos;
        while let Some(tag) = self.top_tag() {
            if tag.indent.len() < indent.len() {
                break;
            }
            let name = tag.expected_close_tag_name.clone();
            self.close_tag(&name, pos, pos);
            if self.errored {
                return;
            }
        }

        let mut bad_indent = false;
        let text_only = if let Some(Block::Tag(parent)) = self.blocks.last_mut() {
            // the first child line fixes the indentation of its siblings
            if parent.nested_indent.is_none() {
                parent.nested_indent = Some(indent.clone());
            }
            bad_indent = parent.nested_indent.as_ref() != Some(&indent);
            matches!(parent.body, Some(BodyMode::ParsedText | BodyMode::StaticText))
        } else {
            false
        };
        if bad_indent {
            self.notify_error(
                pos,
                ErrorCode::BadIndentation,
                "Line indentation does not match indentation of previous line",
            );
            return;
        }

        match ch {
            '-' => self.concise_dashes(indent),
            '/' if self.peek(1) == Some('/') => self.begin_js_comment(false),
            '/' if self.peek(1) == Some('*') => self.begin_js_comment(true),
            _ if text_only => self.notify_error(
                pos,
                ErrorCode::IllegalLineStart,
                "A line within a tag that only allows text content must begin with a \"-\" character",
            ),
            '/' => self.notify_error(
                pos,
                ErrorCode::IllegalLineStart,
                "A line in concise mode cannot start with a single \"/\" character",
            ),
            // a line of tag syntax
            '<' => self.begin_mixed_mode_line(indent),
            '$' if self.placeholder_marker_len().is_some() => self.begin_mixed_mode_line(indent),
            '$' if matches!(self.peek(1), Some(' ' | '\t')) => self.begin_inline_script(),
            _ => {
                self.begin_open_tag();
                self.reconsume();
            }
        }
    }

    fn begin_mixed_mode_line(&mut self, indent: String) {
        self.begin_mixed_mode = true;
        self.begin_html_block(indent, None, false);
        self.reconsume();
    }

    /// A line starting with `-`: an HTML block, delimited or single-line.
    fn concise_dashes(&mut self, indent: String) {
        let rest = self.rest();
        let count = rest.len() - rest.trim_start_matches('-').len();
        let after = self.pos + count;

        if count == 1 {
            self.warn_deprecated(
                "The usage of a single hyphen at the start of a concise line is deprecated. Use \"--\" instead.",
            );
        }

        if count >= 2 && self.only_whitespace_remains_on_line(after) {
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
}
