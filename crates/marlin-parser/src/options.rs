//! Scanner configuration.

use core::fmt;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Predicate deciding whether a tag name is open-tag-only.
///
/// Returning `None` defers to the built-in void element table.
pub type OpenTagOnlyFn = Rc<dyn Fn(&str) -> Option<bool>>;

/// How the body of a tag is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyMode {
    /// Let the built-in rules decide (`script` and `style` get parsed text).
    #[default]
    Default,
    /// Regular markup content, even for `script` and `style`.
    Html,
    /// Text with placeholders and script comments; tags are not recognized.
    ParsedText,
    /// Text where only the closing tag is recognized.
    StaticText,
}

/// Per-tag scanning overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagParseOptions {
    /// Drop every attribute of the tag.
    pub ignore_attributes: bool,
    /// Do not report mixed comma usage between attributes.
    pub relax_require_commas: bool,
    /// Body mode applied when the listener does not pick one.
    pub body: Option<BodyMode>,
}

/// Options recognized by [`Scanner`](crate::Scanner).
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanOptions {
    /// Start in the indentation-based concise dialect.
    pub concise: bool,
    /// Do not treat `-` as an expression continuation operator.
    pub legacy_compatibility: bool,
    /// Never recognize `${...}` inside string literals.
    pub ignore_placeholders: bool,
    /// Same as `ignore_placeholders`, but escapes are normalized as usual.
    pub ignore_nonstandard_string_placeholders: bool,
    /// Template file name used in deprecation warnings.
    pub filename: Option<String>,
    /// Overrides keyed by tag name.
    pub tag_parse_options: HashMap<String, TagParseOptions>,
    /// Overrides the void element table.
    #[serde(skip)]
    pub open_tag_only: Option<OpenTagOnlyFn>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concise: true,
            legacy_compatibility: false,
            ignore_placeholders: false,
            ignore_nonstandard_string_placeholders: false,
            filename: None,
            tag_parse_options: HashMap::new(),
            open_tag_only: None,
        }
    }
}

impl fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanOptions")
            .field("concise", &self.concise)
            .field("legacy_compatibility", &self.legacy_compatibility)
            .field("ignore_placeholders", &self.ignore_placeholders)
            .field(
                "ignore_nonstandard_string_placeholders",
                &self.ignore_nonstandard_string_placeholders,
            )
            .field("filename", &self.filename)
            .field("tag_parse_options", &self.tag_parse_options)
            .field("open_tag_only", &self.open_tag_only.is_some())
            .finish()
    }
}

impl ScanOptions {
    /// Options for the tag-delimited dialect.
    #[must_use]
    pub fn html() -> Self {
        Self {
            concise: false,
            ..Self::default()
        }
    }

    /// Set the initial dialect.
    #[must_use]
    pub fn with_concise(mut self, concise: bool) -> Self {
        self.concise = concise;
        self
    }

    /// Enable legacy operator handling.
    #[must_use]
    pub fn with_legacy_compatibility(mut self, legacy: bool) -> Self {
        self.legacy_compatibility = legacy;
        self
    }

    /// Disable placeholders inside strings.
    #[must_use]
    pub fn with_ignore_placeholders(mut self, ignore: bool) -> Self {
        self.ignore_placeholders = ignore;
        self
    }

    /// Disable placeholders inside strings but keep normalizing their escapes.
    #[must_use]
    pub fn with_ignore_nonstandard_string_placeholders(mut self, ignore: bool) -> Self {
        self.ignore_nonstandard_string_placeholders = ignore;
        self
    }

    /// Set the file name used in warnings.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Register scanning overrides for one tag.
    #[must_use]
    pub fn with_tag_parse_options(mut self, tag_name: impl Into<String>, options: TagParseOptions) -> Self {
        let _ = self.tag_parse_options.insert(tag_name.into(), options);
        self
    }

    /// Install an open-tag-only predicate.
    #[must_use]
    pub fn with_open_tag_only(mut self, predicate: impl Fn(&str) -> Option<bool> + 'static) -> Self {
        self.open_tag_only = Some(Rc::new(predicate));
        self
    }
}
