//! The block stack: open tags and verbatim HTML regions inside concise content.

use super::core::{Scanner, State};
use super::part::{PartKind, TrailingWhitespace};
use crate::diagnostic::ErrorCode;
use crate::event::CloseTag;
use crate::listener::Listener;
use crate::node::Tag;
use crate::options::BodyMode;

/// An entry of the block stack.
#[derive(Debug)]
pub(crate) enum Block {
    /// An open tag.
    Tag(Tag),
    /// A region of tag-syntax content nested in concise content.
    Html {
        delimiter: Option<String>,
        indent: String,
    },
}

impl<L: Listener> Scanner<L> {
    /// The tag being opened or, outside an open tag, the innermost open tag.
    ///
    /// # Panics
    ///
    /// Panics if the top of the block stack is not a tag.
    pub(crate) fn current_tag_mut(&mut self) -> &mut Tag {
        match self.blocks.last_mut() {
            Some(Block::Tag(tag)) => tag,
            _ => panic!("illegal state: no open tag on the block stack"),
        }
    }

    /// See [`Scanner::current_tag_mut`].
    ///
    /// # Panics
    ///
    /// Panics if the top of the block stack is not a tag.
    pub(crate) fn current_tag(&self) -> &Tag {
        match self.blocks.last() {
            Some(Block::Tag(tag)) => tag,
            _ => panic!("illegal state: no open tag on the block stack"),
        }
    }

    /// The innermost open tag, if the top block is a tag.
    pub(crate) fn top_tag(&self) -> Option<&Tag> {
        match self.blocks.last() {
            Some(Block::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    /// Make the expected close tag name follow the new top of the stack.
    fn restore_expected_close_tag_name(&mut self) {
        self.expected_close_tag_name = self
            .top_tag()
            .map(|tag| tag.expected_close_tag_name.clone());
    }

    /// Pop the innermost tag, which `tag_name` must name.
    ///
    /// # Panics
    ///
    /// Panics if `tag_name` is empty.
    pub(crate) fn close_tag(&mut self, tag_name: &str, pos: usize, end_pos: usize) {
        assert!(!tag_name.is_empty(), "illegal state: closing a tag without a tag name");

        let tag = match self.blocks.pop() {
            Some(Block::Tag(tag)) => tag,
            _ => {
                self.notify_error(
                    pos,
                    ErrorCode::ExtraClosingTag,
                    format!("The closing \"{tag_name}\" tag was not expected"),
                );
                return;
            }
        };

        if tag.expected_close_tag_name != tag_name && tag.tag_name != tag_name {
            self.notify_error(
                pos,
                ErrorCode::MismatchedClosingTag,
                format!(
                    "The closing \"{tag_name}\" tag does not match the corresponding opening \"{}\" tag",
                    tag.expected_close_tag_name
                ),
            );
            return;
        }

        // dynamic names report the name as written
        let tag_name = if tag.tag_name.is_empty() {
            tag.expected_close_tag_name
        } else {
            tag.tag_name
        };
        self.listener.on_close_tag(&CloseTag {
            tag_name,
            pos,
            end_pos,
        });

        if tag.begin_mixed_mode {
            self.ending_mixed_mode_at_eol = true;
        }
        self.close_tag_name.clear();
        self.restore_expected_close_tag_name();
    }

    /// Close what is still open at end of input.
    ///
    /// Concise tags close silently; a tag-syntax tag is a missing end tag.
    pub(crate) fn html_eof(&mut self) {
        self.end_text();
        let pos = self.pos;
        loop {
            match self.blocks.last() {
                Some(Block::Tag(tag)) if tag.concise => {
                    let name = tag.expected_close_tag_name.clone();
                    self.close_tag(&name, pos, pos);
                    if self.errored {
                        return;
                    }
                }
                Some(Block::Tag(tag)) => {
                    let (tag_pos, message) =
                        (tag.pos, format!("Missing ending \"{}\" tag", tag.tag_name));
                    self.notify_error(tag_pos, ErrorCode::MissingEndTag, message);
                    return;
                }
                Some(Block::Html { .. }) => {
                    let _ = self.blocks.pop();
                }
                None => return,
            }
        }
    }

    /// Delimiter and indentation of the innermost HTML region.
    fn html_block(&self) -> Option<(Option<&str>, &str)> {
        self.blocks.iter().rev().find_map(|block| match block {
            Block::Html { delimiter, indent } => Some((delimiter.as_deref(), indent.as_str())),
            Block::Tag(_) => None,
        })
    }

    /// Start a region of tag-syntax content inside concise content.
    pub(crate) fn begin_html_block(&mut self, indent: String, delimiter: Option<String>, single_line: bool) {
        let body = self.top_tag().and_then(|tag| tag.body);

        self.within_single_line_html_block = single_line;
        self.blocks.push(Block::Html { delimiter, indent });

        match body {
            Some(BodyMode::ParsedText) => self.enter_state(State::ParsedTextContent),
            Some(BodyMode::StaticText) => self.enter_state(State::StaticTextContent),
            _ => self.enter_state(State::HtmlContent),
        }
    }

    /// End the current HTML region and return to concise content.
    pub(crate) fn end_html_block(&mut self) {
        // the line terminator that ended the region is not part of it
        self.trim_trailing_newline();
        self.end_text();

        match self.blocks.last() {
            Some(Block::Html { .. }) => {
                let _ = self.blocks.pop();
            }
            Some(Block::Tag(tag)) => {
                let (tag_pos, message) =
                    (tag.pos, format!("Missing ending \"{}\" tag", tag.tag_name));
                self.notify_error(tag_pos, ErrorCode::MissingEndTag, message);
                return;
            }
            None => {}
        }

        self.within_single_line_html_block = false;
        self.restore_expected_close_tag_name();
        self.enter_concise_html_content_state();
    }

    /// End of line inside any HTML content state.
    pub(crate) fn html_content_eol(&mut self, newline: &'static str) {
        self.push_text(newline, newline.len());

        if self.begin_mixed_mode {
            self.begin_mixed_mode = false;
            self.end_html_block();
        } else if self.ending_mixed_mode_at_eol {
            self.ending_mixed_mode_at_eol = false;
            self.end_html_block();
        } else if self.within_single_line_html_block {
            self.end_html_block();
        } else if self.html_block().is_some_and(|(delimiter, _)| delimiter.is_some()) {
            self.handle_delimited_block_eol(newline);
        }
    }

    /// Decide whether the line after `newline` continues a delimited region.
    fn handle_delimited_block_eol(&mut self, newline: &str) {
        let Some((Some(delimiter), indent)) = self.html_block() else {
            return;
        };
        let (delimiter, indent) = (delimiter.to_string(), indent.to_string());
        let next_line = self.pos + newline.len();

        if self.look_ahead_for(&format!("{indent}{delimiter}"), next_line) {
            self.skip(indent.len() + delimiter.len());
            self.enter_state(State::ConciseHtmlContent);
            self.begin_check_trailing_whitespace(TrailingWhitespace::HtmlBlockDelimiterEnd {
                delimiter,
            });
        } else if self.look_ahead_for(&indent, next_line) {
            self.skip(indent.len());
        } else if !indent.is_empty() && !self.only_whitespace_remains_on_line(next_line) {
            // a non-blank line with less indentation ends the region
            self.end_html_block();
        }
    }

    /// Begin a region that starts after a `--` delimiter line.
    ///
    /// Called at the end of the delimiter line, before its terminator.
    pub(crate) fn begin_delimited_html_block(&mut self, indent: String, delimiter: String, newline: &'static str) {
        self.begin_html_block(indent, Some(delimiter), false);
        self.handle_delimited_block_eol(newline);
    }

    pub(crate) fn begin_check_trailing_whitespace(&mut self, handler: TrailingWhitespace) {
        self.begin_part(
            PartKind::TrailingWhitespace(handler),
            "",
            State::CheckTrailingWhitespace,
        );
    }
}
