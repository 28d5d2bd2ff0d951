// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// A line/column position. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

/// Represents a continuous range in the source text. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Starting position (line and column).
    pub start: SourcePos,

    /// Position just past the last character.
    pub end: SourcePos,
}

impl Span {
    pub fn new(start: SourcePos, end: SourcePos) -> Self {
        Self { start, end }
    }

    /// Span covering `len` characters on a single line.
    pub fn single_line(line: usize, column: usize, len: usize) -> Self {
        Self {
            start: SourcePos { line, column },
            end: SourcePos { line, column: column + len },
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Self {
        let start = if (other.start.line, other.start.column) < (self.start.line, self.start.column) {
            other.start
        } else {
            self.start
        };
        let end = if (other.end.line, other.end.column) > (self.end.line, self.end.column) {
            other.end
        } else {
            self.end
        };
        Self { start, end }
    }
}
