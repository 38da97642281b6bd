//! Line and column computation for scanner diagnostics.
//!
//! The scanner reports positions as byte offsets into the source text. This
//! module turns those offsets into 1-based line/column pairs for humans.

use core::fmt;

use serde::Serialize;

/// A 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Precomputed line start offsets for a source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Index the line starts of `source`. Both `\n` and `\r\n` end a line.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset into a line/column pair.
    ///
    /// Offsets past the end clamp to the end of the source; offsets that fall
    /// inside a multi-byte character resolve to that character's column.
    #[must_use]
    pub fn location(&self, pos: usize) -> SourceLocation {
        let pos = pos.min(self.source.len());
        let line = match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self.source[start..]
            .char_indices()
            .take_while(|&(i, _)| start + i < pos)
            .count();
        SourceLocation {
            line: line + 1,
            column: column + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        let index = LineIndex::new("div\nspan");
        assert_eq!(index.location(0), SourceLocation { line: 1, column: 1 });
        assert_eq!(index.location(2), SourceLocation { line: 1, column: 3 });
    }

    #[test]
    fn test_after_newline() {
        let index = LineIndex::new("div\nspan\r\np");
        assert_eq!(index.location(4), SourceLocation { line: 2, column: 1 });
        assert_eq!(index.location(10), SourceLocation { line: 3, column: 1 });
    }

    #[test]
    fn test_multibyte_columns() {
        let index = LineIndex::new("é${x}");
        // "é" is two bytes but one column
        assert_eq!(index.location(2), SourceLocation { line: 1, column: 2 });
    }

    #[test]
    fn test_past_end_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.location(99), SourceLocation { line: 1, column: 3 });
        assert_eq!(index.location(99).to_string(), "1:3");
    }
}
