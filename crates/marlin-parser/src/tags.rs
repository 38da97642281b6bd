//! Tag names that never carry a body.

/// Elements that are implicitly self-closing ("open tag only").
pub const OPEN_TAG_ONLY: &[&str] = &[
    "base", "br", "col", "hr", "embed", "img", "input", "keygen", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether `tag_name` is an open-tag-only element.
///
/// The comparison is ASCII case-insensitive, so `<IMG>` and `<img>` agree.
#[must_use]
pub fn is_open_tag_only(tag_name: &str) -> bool {
    OPEN_TAG_ONLY
        .iter()
        .any(|name| name.eq_ignore_ascii_case(tag_name))
}
