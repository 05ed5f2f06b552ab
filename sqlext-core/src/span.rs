//! Source positions and spans.
//!
//! Every token and every parse-tree node records the region of the input it was built
//! from. Lines are 1-based, columns are 0-based character offsets within the line, and
//! `offset` is the UTF-8 byte offset into the original text.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourcePosition {
    /// Line number (1-based)
    pub line: u32,
    /// Character offset within the line (0-based)
    pub column: u32,
    /// Byte offset from the start of the input
    pub offset: usize,
}

impl SourcePosition {
    /// Position of the first character of any input.
    pub const START: Self = Self {
        line: 1,
        column: 0,
        offset: 0,
    };

    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::START
    }
}

impl PartialOrd for SourcePosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourcePosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .cmp(&other.offset)
            .then(self.line.cmp(&other.line))
            .then(self.column.cmp(&other.column))
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, pos {}", self.line, self.column)
    }
}

/// A half-open region `[start, end)` of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl Span {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `position`.
    pub fn point(position: SourcePosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// The text this span covers in `source`, if the span lies inside it.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start.offset..self.end.offset)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(
                f,
                "{}:{}-{}:{}",
                self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_covers_both() {
        let a = Span::new(SourcePosition::new(1, 0, 0), SourcePosition::new(1, 3, 3));
        let b = Span::new(SourcePosition::new(1, 7, 7), SourcePosition::new(2, 1, 12));
        let merged = a.merge(b);
        assert_eq!(merged.start, a.start);
        assert_eq!(merged.end, b.end);
        assert_eq!(b.merge(a), merged);
    }

    #[test]
    fn test_point_is_empty() {
        let span = Span::point(SourcePosition::new(3, 4, 20));
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn test_slice() {
        let source = "LOAD DATA";
        let span = Span::new(SourcePosition::new(1, 5, 5), SourcePosition::new(1, 9, 9));
        assert_eq!(span.slice(source), Some("DATA"));
    }

    #[test]
    fn test_display() {
        let span = Span::new(SourcePosition::new(2, 4, 10), SourcePosition::new(2, 9, 15));
        assert_eq!(span.to_string(), "2:4-9");
        assert_eq!(span.start.to_string(), "line 2, pos 4");
    }
}
