#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Source coordinates for the qspec toolchain.
//!
//! Three types, all shared between the lexer, the parser and editor tooling:
//! - [`Position`]: where a character sits (1-based line/column, byte offset)
//! - [`Span`]: a start/end pair of positions
//! - [`LineCol`]: a bare 1-based cursor coordinate used by position queries
//!
//! Columns count Unicode scalar values, not bytes. Editor protocols speak
//! 0-based coordinates; [`LineCol::from_zero_based`] is the only place where
//! that translation happens.

use std::fmt;

mod invariants;


/// A location in source text.
///
/// `line` and `column` are 1-based, `offset` is the 0-based byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    /// Position of the first character of a document.
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };

    pub const fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Moves past `ch`. A newline starts the next line at column 1.
    #[inline]
    pub fn advance(&mut self, ch: char) {
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Moves past every character of `text`.
    pub fn advance_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.advance(ch);
        }
    }

    /// The position after `text`, starting from `self`.
    pub fn after(mut self, text: &str) -> Self {
        self.advance_str(text);
        self
    }

    pub const fn line_col(&self) -> LineCol {
        LineCol {
            line: self.line,
            column: self.column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A 1-based line/column pair without a byte offset.
///
/// This is what a cursor looks like when it comes from outside: the
/// position query layer compares it against token and node positions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Converts a 0-based editor coordinate (as used by LSP) into a 1-based one.
    pub const fn from_zero_based(line: u32, character: u32) -> Self {
        Self {
            line: line + 1,
            column: character + 1,
        }
    }

    /// The inverse of [`from_zero_based`](Self::from_zero_based).
    pub const fn to_zero_based(self) -> (u32, u32) {
        (self.line.saturating_sub(1), self.column.saturating_sub(1))
    }
}

impl From<Position> for LineCol {
    fn from(position: Position) -> Self {
        position.line_col()
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start and end of a token or node. `end` is exclusive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        let span = Self { start, end };
        span.ensure_ordered();
        span
    }

    /// Zero-width span at `at`.
    pub const fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    /// Byte range into the source text.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }

    /// Half-open containment: `start <= at < end`.
    pub fn contains(&self, at: LineCol) -> bool {
        self.start.line_col() <= at && at < self.end.line_col()
    }

    /// Closed containment: `start <= at <= end`.
    ///
    /// A cursor placed right after the last character of a construct is
    /// still considered inside it.
    pub fn touches(&self, at: LineCol) -> bool {
        self.start.line_col() <= at && at <= self.end.line_col()
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
