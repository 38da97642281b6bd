//! Common utilities for the marlin template scanner.
//!
//! This crate provides shared infrastructure used by the scanner and the CLI:
//! - **Warning System** - colored, deduplicated terminal output for deprecations
//! - **Source Locations** - byte offset to line/column conversion for diagnostics

pub mod location;
pub mod warning;

pub use location::{LineIndex, SourceLocation};
