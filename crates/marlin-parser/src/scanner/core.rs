use strum_macros::Display;

use super::block::Block;
use super::part::Part;
use crate::event::TextMode;
use crate::listener::Listener;
use crate::options::ScanOptions;

/// The lexical states of the scanner. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum State {
    /// Tag-syntax body content.
    HtmlContent,
    /// Concise-syntax content, one line at a time.
    ConciseHtmlContent,
    /// Text with placeholders and script comments, e.g. a `script` body.
    ParsedTextContent,
    /// Text where only the closing tag is recognized.
    StaticTextContent,
    /// Between attributes of an open tag.
    WithinOpenTag,
    /// Scanning a tag name.
    TagName,
    /// Scanning `#id` / `.class` suffixes of a tag name.
    TagNameShorthand,
    /// Scanning an attribute name.
    AttributeName,
    /// Waiting for an attribute value expression to complete.
    AttributeValue,
    /// Scanning the name of a closing tag.
    CloseTag,
    /// Inside a quoted string literal.
    String,
    /// Inside a template literal.
    TemplateString,
    /// Inside a regular expression literal.
    RegularExpression,
    /// Inside an embedded expression.
    Expression,
    /// Inside `${...}`.
    Placeholder,
    /// Inside `<% ... %>`.
    Scriptlet,
    /// Inside a `$ ...` line.
    InlineScript,
    /// Inside `<![CDATA[...]]>`.
    Cdata,
    /// Inside `<!...>`.
    DocumentType,
    /// Inside `<?...?>`.
    Declaration,
    /// Inside `<!--...-->`.
    HtmlComment,
    /// Inside a `//` comment.
    JsCommentLine,
    /// Inside a `/* */` comment.
    JsCommentBlock,
    /// Requiring only whitespace until the end of the line.
    CheckTrailingWhitespace,
}

/// One unit of input handed to the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Input {
    Char(char),
    /// `\n` or `\r\n`.
    Eol(&'static str),
    Eof,
}

/// The scanning engine.
///
/// A scanner owns its cursor, stacks and listener for one input and is
/// consumed by [`Scanner::scan`].
#[allow(clippy::struct_excessive_bools)]
pub struct Scanner<L: Listener> {
    pub(crate) listener: L,
    pub(crate) options: ScanOptions,
    pub(crate) data: String,
    pub(crate) pos: usize,
    /// Byte length of the input being dispatched.
    pub(crate) event_len: usize,
    // When true, the run loop dispatches the current input again instead of advancing.
    pub(crate) reconsume: bool,
    pub(crate) state: State,
    pub(crate) is_concise: bool,
    pub(crate) errored: bool,

    pub(crate) parts: Vec<Part>,
    pub(crate) blocks: Vec<Block>,

    pub(crate) text: String,
    pub(crate) text_pos: usize,
    pub(crate) text_end_pos: usize,
    pub(crate) text_mode: TextMode,

    /// Indentation of the current concise line.
    pub(crate) indent: String,
    pub(crate) within_single_line_html_block: bool,
    pub(crate) begin_mixed_mode: bool,
    pub(crate) ending_mixed_mode_at_eol: bool,

    pub(crate) expected_close_tag_name: Option<String>,
    pub(crate) close_tag_name: String,
    pub(crate) close_tag_pos: usize,
    pub(crate) within_open_tag: bool,
    pub(crate) within_attribute: bool,
    pub(crate) placeholder_depth: usize,
}

impl<L: Listener> Scanner<L> {
    /// Create a scanner that reports to `listener`.
    #[must_use]
    pub fn new(listener: L, options: ScanOptions) -> Self {
        let is_concise = options.concise;
        Self {
            listener,
            options,
            data: String::new(),
            pos: 0,
            event_len: 0,
            reconsume: false,
            state: if is_concise {
                State::ConciseHtmlContent
            } else {
                State::HtmlContent
            },
            is_concise,
            errored: false,
            parts: Vec::new(),
            blocks: Vec::new(),
            text: String::new(),
            text_pos: 0,
            text_end_pos: 0,
            text_mode: TextMode::Html,
            indent: String::new(),
            within_single_line_html_block: false,
            begin_mixed_mode: false,
            ending_mixed_mode_at_eol: false,
            expected_close_tag_name: None,
            close_tag_name: String::new(),
            close_tag_pos: 0,
            within_open_tag: false,
            within_attribute: false,
            placeholder_depth: 0,
        }
    }

    /// The state currently receiving input.
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Scan the concatenation of `chunks` and return the listener.
    ///
    /// A leading byte order mark is skipped; reported offsets still count it.
    pub fn scan<I, S>(mut self, chunks: I) -> L
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for chunk in chunks {
            self.data.push_str(chunk.as_ref());
        }
        self.pos = if self.data.starts_with('\u{FEFF}') {
            '\u{FEFF}'.len_utf8()
        } else {
            0
        };
        tracing::trace!(target: "marlin::scanner", len = self.data.len(), state = %self.state, "scan started");
        self.run();
        self.listener
    }

    /// Dispatch every character, then end of input, to the active state.
    fn run(&mut self) {
        while self.pos < self.data.len() {
            let rest = &self.data[self.pos..];
            let input = if rest.starts_with('\n') {
                Input::Eol("\n")
            } else if rest.starts_with("\r\n") {
                Input::Eol("\r\n")
            } else {
                match rest.chars().next() {
                    Some(ch) => Input::Char(ch),
                    None => break,
                }
            };
            self.event_len = match input {
                Input::Char(ch) => ch.len_utf8(),
                Input::Eol(nl) => nl.len(),
                Input::Eof => 0,
            };
            self.dispatch(input);
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.pos += self.event_len;
            }
        }

        if !self.errored {
            self.event_len = 0;
            self.dispatch(Input::Eof);
        }
        self.listener.on_finish();
    }

    /// Hand one input to the handler of the active state.
    pub(crate) fn dispatch(&mut self, input: Input) {
        match self.state {
            State::HtmlContent => self.handle_html_content_state(input),
            State::ConciseHtmlContent => self.handle_concise_html_content_state(input),
            State::ParsedTextContent => self.handle_parsed_text_content_state(input),
            State::StaticTextContent => self.handle_static_text_content_state(input),
            State::WithinOpenTag => self.handle_within_open_tag_state(input),
            State::TagName => self.handle_tag_name_state(input),
            State::TagNameShorthand => self.handle_tag_name_shorthand_state(input),
            State::AttributeName => self.handle_attribute_name_state(input),
            State::AttributeValue => {
                panic!("illegal state: attribute value received {input:?} outside an expression")
            }
            State::CloseTag => self.handle_close_tag_state(input),
            State::String => self.handle_string_state(input),
            State::TemplateString => self.handle_template_string_state(input),
            State::RegularExpression => self.handle_regular_expression_state(input),
            State::Expression => self.handle_expression_state(input),
            State::Placeholder => self.handle_placeholder_state(input),
            State::Scriptlet => self.handle_scriptlet_state(input),
            State::InlineScript => self.handle_inline_script_state(input),
            State::Cdata => self.handle_cdata_state(input),
            State::DocumentType => self.handle_document_type_state(input),
            State::Declaration => self.handle_declaration_state(input),
            State::HtmlComment => self.handle_html_comment_state(input),
            State::JsCommentLine => self.handle_js_comment_line_state(input),
            State::JsCommentBlock => self.handle_js_comment_block_state(input),
            State::CheckTrailingWhitespace => self.handle_check_trailing_whitespace_state(input),
        }
    }
}
