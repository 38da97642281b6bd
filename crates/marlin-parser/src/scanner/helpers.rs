//! Helper functions for the scanner.
//!
//! This module contains the primitives states are built from:
//! - Cursor movement and lookahead
//! - State transitions
//! - The part stack
//! - Text buffering
//! - Diagnostics and deprecation warnings

use marlin_common::location::LineIndex;
use marlin_common::warning::warn_at;

use super::core::{Input, Scanner, State};
use super::part::{Part, PartKind};
use crate::diagnostic::{Diagnostic, ErrorCode};
use crate::event::{Text, TextMode};
use crate::listener::Listener;
use crate::operators::is_whitespace;

// =============================================================================
// Cursor Helpers
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Move the cursor forward by `len` bytes on top of the current input.
    pub(crate) const fn skip(&mut self, len: usize) {
        self.pos += len;
    }

    /// Hand the current input to the next state again.
    pub(crate) const fn reconsume(&mut self) {
        self.reconsume = true;
    }

    /// Force the cursor past the end so the scan loop stops.
    pub(crate) fn end(&mut self) {
        self.pos = self.data.len();
    }

    /// Whether `target` occurs at byte offset `start`.
    pub(crate) fn look_ahead_for(&self, target: &str, start: usize) -> bool {
        self.data
            .get(start..)
            .is_some_and(|rest| rest.starts_with(target))
    }

    /// The character `offset` bytes after the cursor.
    pub(crate) fn peek(&self, offset: usize) -> Option<char> {
        self.data.get(self.pos + offset..)?.chars().next()
    }

    /// Source text from the cursor on.
    pub(crate) fn rest(&self) -> &str {
        self.data.get(self.pos..).unwrap_or_default()
    }

    /// The last non-whitespace character before the cursor.
    pub(crate) fn previous_non_whitespace_char(&self) -> Option<char> {
        self.data[..self.pos]
            .chars()
            .rev()
            .find(|&ch| !is_whitespace(ch))
    }

    /// Number of bytes of spaces and tabs starting at `start`.
    pub(crate) fn inline_whitespace_len(&self, start: usize) -> usize {
        self.data.get(start..).map_or(0, |rest| {
            rest.len() - rest.trim_start_matches([' ', '\t']).len()
        })
    }

    /// Whether the line containing `start` holds only whitespace from there on.
    pub(crate) fn only_whitespace_remains_on_line(&self, start: usize) -> bool {
        self.data.get(start..).is_none_or(|rest| {
            rest.split('\n')
                .next()
                .is_none_or(|line| line.chars().all(is_whitespace))
        })
    }

    /// Whether only spaces and tabs precede the cursor on its line.
    pub(crate) fn is_beginning_of_line(&self) -> bool {
        self.data[..self.pos]
            .trim_end_matches([' ', '\t'])
            .chars()
            .next_back()
            .is_none_or(|ch| ch == '\n')
    }

    /// A backslash escape at the cursor and the number of bytes after the
    /// backslash it covers. Line terminators are never escaped.
    pub(crate) fn escape_sequence(&self) -> (String, usize) {
        match self.peek(1) {
            Some(next) if next != '\n' && next != '\r' => (format!("\\{next}"), next.len_utf8()),
            _ => ("\\".to_string(), 0),
        }
    }

    /// Whether `${` or `$!{` starts at the cursor. Returns the marker length.
    pub(crate) fn placeholder_marker_len(&self) -> Option<usize> {
        let rest = self.rest();
        if rest.starts_with("${") {
            Some(2)
        } else if rest.starts_with("$!{") {
            Some(3)
        } else {
            None
        }
    }
}

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Make `state` the active state.
    ///
    /// # Panics
    ///
    /// Panics when `state` is already active: a handler that re-enters its
    /// own state would loop forever.
    pub(crate) fn enter_state(&mut self, state: State) {
        assert!(
            self.state != state,
            "illegal state: re-entering the current state {state}"
        );
        tracing::trace!(target: "marlin::scanner", from = %self.state, to = %state, pos = self.pos, "enter state");
        self.state = state;
        match state {
            State::HtmlContent => self.is_concise = false,
            State::ConciseHtmlContent => {
                self.is_concise = true;
                self.indent.clear();
            }
            _ => {}
        }
    }

    pub(crate) fn enter_html_content_state(&mut self) {
        if self.state != State::HtmlContent {
            self.enter_state(State::HtmlContent);
        }
    }

    /// Enter concise content, starting a fresh line even if already there.
    pub(crate) fn enter_concise_html_content_state(&mut self) {
        if self.state == State::ConciseHtmlContent {
            self.is_concise = true;
            self.indent.clear();
        } else {
            self.enter_state(State::ConciseHtmlContent);
        }
    }

    pub(crate) fn enter_within_open_tag_state(&mut self) {
        if self.state != State::WithinOpenTag {
            self.enter_state(State::WithinOpenTag);
        }
    }

    /// Forward end of input to the state that is now active.
    pub(crate) fn redispatch_eof(&mut self) {
        if !self.errored {
            self.dispatch(Input::Eof);
        }
    }

    /// Enter the content state of the current dialect.
    pub(crate) fn enter_content_state(&mut self) {
        if self.is_concise {
            self.enter_concise_html_content_state();
        } else {
            self.enter_html_content_state();
        }
    }
}

// =============================================================================
// Part Stack Helpers
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Push a part that resumes the active state, then enter `state`.
    pub(crate) fn begin_part(&mut self, kind: PartKind, value: &str, state: State) {
        let part = Part {
            pos: self.pos,
            resume: self.state,
            value: value.to_string(),
            kind,
        };
        tracing::trace!(target: "marlin::scanner", part = part.kind_name(), pos = self.pos, depth = self.parts.len() + 1, "begin part");
        self.parts.push(part);
        self.enter_state(state);
    }

    /// Pop the current part and return to the state it interrupted.
    ///
    /// # Panics
    ///
    /// Panics if the part stack is empty.
    pub(crate) fn end_part(&mut self) -> Part {
        let Some(part) = self.parts.pop() else {
            panic!("illegal state: no part to end");
        };
        tracing::trace!(target: "marlin::scanner", part = part.kind_name(), pos = self.pos, "end part");
        self.enter_state(part.resume);
        part
    }

    /// The part on top of the stack.
    ///
    /// # Panics
    ///
    /// Panics if the part stack is empty.
    pub(crate) fn current_part_mut(&mut self) -> &mut Part {
        match self.parts.last_mut() {
            Some(part) => part,
            None => panic!("illegal state: no current part"),
        }
    }

    /// Append source text to the current part.
    pub(crate) fn append_to_part(&mut self, text: &str) {
        self.current_part_mut().value.push_str(text);
    }

    pub(crate) fn append_char_to_part(&mut self, ch: char) {
        self.current_part_mut().value.push(ch);
    }

    /// The part on top of the stack.
    ///
    /// # Panics
    ///
    /// Panics if the part stack is empty.
    pub(crate) fn current_part(&self) -> &Part {
        match self.parts.last() {
            Some(part) => part,
            None => panic!("illegal state: no current part"),
        }
    }
}

// =============================================================================
// Text Helpers
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Buffer body text that covers `raw_len` source bytes at the cursor.
    pub(crate) fn push_text(&mut self, text: &str, raw_len: usize) {
        if self.text.is_empty() {
            self.text_pos = self.pos;
            self.text_mode = match self.state {
                State::ParsedTextContent | State::JsCommentLine | State::JsCommentBlock => {
                    TextMode::ParsedText
                }
                State::StaticTextContent => TextMode::StaticText,
                _ => TextMode::Html,
            };
        }
        self.text.push_str(text);
        self.text_end_pos = self.pos + raw_len;
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        self.push_text(ch.encode_utf8(&mut [0; 4]), ch.len_utf8());
    }

    /// Drop one trailing line terminator from the buffered text.
    pub(crate) fn trim_trailing_newline(&mut self) {
        let len = if self.text.ends_with("\r\n") {
            2
        } else if self.text.ends_with('\n') {
            1
        } else {
            0
        };
        self.text.truncate(self.text.len() - len);
        self.text_end_pos -= len;
    }

    /// Report buffered text, if any, and clear the buffer.
    pub(crate) fn end_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = Text {
            value: core::mem::take(&mut self.text),
            mode: self.text_mode,
            pos: self.text_pos,
            end_pos: self.text_end_pos,
        };
        self.listener.on_text(&text);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl<L: Listener> Scanner<L> {
    /// Report a diagnostic and stop scanning.
    ///
    /// Only the first diagnostic of a scan is reported.
    pub(crate) fn notify_error(&mut self, pos: usize, code: ErrorCode, message: impl Into<String>) {
        if self.errored {
            return;
        }
        self.errored = true;
        let diagnostic = Diagnostic {
            code,
            message: message.into(),
            pos,
            end_pos: self.pos.clamp(pos, self.data.len().max(pos)),
        };
        tracing::debug!(target: "marlin::scanner", code = %code, pos, state = %self.state, "{}", diagnostic.message);
        self.end();
        self.listener.on_error(&diagnostic);
    }

    /// Print a deprecation warning located at the cursor.
    pub(crate) fn warn_deprecated(&self, message: &str) {
        let location = LineIndex::new(&self.data).location(self.pos);
        let _ = warn_at("Scanner", self.options.filename.as_deref(), location, message);
    }

    /// Report end of input inside an open tag.
    pub(crate) fn malformed_open_tag(&mut self, message: &str) {
        let pos = self.current_tag().pos;
        self.notify_error(pos, ErrorCode::MalformedOpenTag, message);
    }
}
