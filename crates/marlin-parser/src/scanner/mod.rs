//! The scanning engine.
//!
//! [`Scanner`] walks the source once. Each character, line terminator and
//! the final end of input is handed to the active [`State`]; nested
//! constructs (strings, placeholders, expressions, comments) are scanned as
//! parts that resume the interrupted state when they end.

mod block;
mod content;
mod core;
mod expression;
mod helpers;
mod leaf;
mod part;
mod string;
mod tag;

pub use self::core::{Scanner, State};
