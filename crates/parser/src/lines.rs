//! Byte offset to line/column translation.
//!
//! Lines are separated by `\n` only, as in Go's `token.File`; a `\r` is
//! ordinary whitespace. Lines and columns are 1-based, columns count bytes.

use std::fmt;

use memchr::memchr_iter;

use crate::ast::Span;

/// 1-based line and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Inclusive range of lines covered by a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    #[inline]
    pub const fn contains(&self, line: u32) -> bool {
        line >= self.start && line <= self.end
    }
}

/// Offsets of every line start in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(src: &str) -> Self {
        Self::from_bytes(src.as_bytes())
    }

    pub fn from_bytes(src: &[u8]) -> Self {
        let mut starts = Vec::with_capacity(src.len() / 32 + 1);
        starts.push(0);
        starts.extend(memchr_iter(b'\n', src).map(|nl| clamp(nl + 1)));
        Self {
            starts,
            len: clamp(src.len()),
        }
    }

    /// Number of lines (a trailing newline opens a final, empty line).
    #[inline]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Line containing `offset`; offsets past the end map to the last line.
    #[inline]
    pub fn line_of(&self, offset: u32) -> u32 {
        let offset = offset.min(self.len);
        self.starts.partition_point(|&start| start <= offset) as u32
    }

    pub fn position(&self, offset: u32) -> Position {
        let line = self.line_of(offset);
        let start = self.starts[line as usize - 1];
        Position {
            line,
            column: offset.min(self.len) - start + 1,
        }
    }

    /// Lines from the first byte of `span` to its (exclusive) end offset,
    /// matching `Pos()`/`End()` in Go's positions.
    #[inline]
    pub fn lines_of(&self, span: Span) -> LineRange {
        LineRange {
            start: self.line_of(span.start),
            end: self.line_of(span.end),
        }
    }
}

#[inline]
fn clamp(x: usize) -> u32 {
    u32::try_from(x).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_one_based() {
        let idx = LineIndex::new("package p\n\ntype T int\n");
        assert_eq!(idx.line_count(), 4);
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(9), 1); // the '\n' belongs to its line
        assert_eq!(idx.line_of(10), 2);
        assert_eq!(idx.line_of(11), 3);
        assert_eq!(idx.position(16), Position { line: 3, column: 6 });
    }

    #[test]
    fn carriage_return_is_not_a_line_break() {
        let idx = LineIndex::new("a\r\nb\rc");
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.line_of(5), 2);
    }

    #[test]
    fn end_offset_stays_on_last_line() {
        let src = "type T struct {\n}";
        let idx = LineIndex::new(src);
        let range = idx.lines_of(Span::new(5, src.len()));
        assert_eq!(range, LineRange { start: 1, end: 2 });
        assert!(range.contains(2));
        assert!(!range.contains(3));
        assert_eq!(idx.line_of(10_000), 2);
    }
}
