//! Byte spans, line lookup and source locations.

use crate::Name;
use std::fmt;

/// Byte range into a source file.
///
/// Layout: 8 bytes total
/// - start: u32 - byte offset from file start
/// - end: u32 - byte offset (exclusive)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for synthesized nodes.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    /// Create a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Convert to a `std::ops::Range` for slicing source text.
    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Source location carried by every message node.
///
/// Unlike [`Span`], which is a byte range, a `SourceLoc` is the
/// human-facing file/line/position triple that survives structural copies
/// and feeds stack traces and the layout-reconstructing renderer.
///
/// Lines are 1-based; `position` is the 0-based column on that line. The
/// synthesized fallback terminator sits at line 0, position 0.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SourceLoc {
    pub file: Name,
    pub line: u32,
    pub position: u32,
}

impl SourceLoc {
    /// Location for synthesized nodes (line 0, position 0).
    #[inline]
    pub const fn synthetic(file: Name) -> Self {
        SourceLoc {
            file,
            line: 0,
            position: 0,
        }
    }

    /// Create a new location.
    #[inline]
    pub const fn new(file: Name, line: u32, position: u32) -> Self {
        SourceLoc {
            file,
            line,
            position,
        }
    }
}

impl fmt::Debug for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}:{}", self.file, self.line, self.position)
    }
}

/// Precomputed table of line start offsets for a source buffer.
///
/// Converts byte offsets (from [`Span`]s) into (line, column) pairs
/// without rescanning the source per token.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Build the index for a source buffer.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                // Offsets fit in u32; sources over 4 GiB are not supported.
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "source length is bounded by u32 span offsets"
                )]
                line_starts.push(i as u32 + 1);
            }
        }
        LineIndex { line_starts }
    }

    /// Number of lines in the indexed source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Map a byte offset to a (1-based line, 0-based column) pair.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        // line_starts[0] == 0, so at least one start is <= offset.
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "line count is bounded by u32 source length"
        )]
        let line_number = line as u32 + 1;
        (line_number, offset - self.line_starts[line])
    }
}

// Size assertions to prevent accidental regressions
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{SourceLoc, Span};
    crate::static_assert_size!(Span, 8);
    crate::static_assert_size!(SourceLoc, 12);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert_eq!(span.to_range(), 10..20);
        assert!(Span::DUMMY.is_empty());
    }

    #[test]
    fn line_index_single_line() {
        let index = LineIndex::new("foo bar");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(0), (1, 0));
        assert_eq!(index.line_col(4), (1, 4));
    }

    #[test]
    fn line_index_multi_line() {
        let index = LineIndex::new("foo\nbar\nbaz");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(0), (1, 0));
        assert_eq!(index.line_col(4), (2, 0));
        assert_eq!(index.line_col(6), (2, 2));
        assert_eq!(index.line_col(8), (3, 0));
    }

    #[test]
    fn line_index_offset_at_newline() {
        let index = LineIndex::new("a\nb");
        // The newline byte itself still belongs to line 1.
        assert_eq!(index.line_col(1), (1, 1));
        assert_eq!(index.line_col(2), (2, 0));
    }

    #[test]
    fn synthetic_location() {
        let loc = SourceLoc::synthetic(Name::EMPTY);
        assert_eq!(loc.line, 0);
        assert_eq!(loc.position, 0);
    }
}
