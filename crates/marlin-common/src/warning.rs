//! Scanner warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the scanner to report deprecated template syntax.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

use crate::location::SourceLocation;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a deprecated or unsupported construct (prints once per unique message).
///
/// Returns `true` if the warning was printed, `false` if it had already been
/// reported.
///
/// # Example
/// ```ignore
/// warn_once("Scanner", "the \"-\" text prefix is deprecated");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[marlin {component}] ⚠ {message}").yellow());
    }
    should_print
}

/// Warn about a construct at a known source location.
///
/// The location is rendered as `file:line:column`, using `(unknown file)` when
/// no file name is available.
pub fn warn_at(component: &str, filename: Option<&str>, location: SourceLocation, message: &str) -> bool {
    let file = filename.unwrap_or("(unknown file)");
    warn_once(component, &format!("{file}:{location} {message}"))
}

/// Clear all recorded warnings (call before scanning a new batch of templates)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
