//! Parse error types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source position in the template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Byte offset from start of input
    pub offset: u32,
    /// 1-indexed line number
    pub line: u32,
    /// 1-indexed column number
    pub column: u32,
}

impl Position {
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Compute the position of a byte offset within `source`
    pub fn at(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source.as_bytes()[..offset];
        let line = before.iter().filter(|b| **b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |i| i + 1);
        Self::new(offset as u32, line as u32, (offset - line_start + 1) as u32)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Parse error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    EofInTag,
    EofInComment,
    MissingEndTagName,
    MissingEndTag,
    InvalidEndTag,
    DuplicateAttribute,
}

impl ErrorCode {
    pub fn message(self) -> &'static str {
        match self {
            Self::EofInTag => "Unexpected EOF in tag.",
            Self::EofInComment => "Unexpected EOF in comment.",
            Self::MissingEndTagName => "End tag name was expected.",
            Self::MissingEndTag => "Element is missing end tag.",
            Self::InvalidEndTag => "Invalid end tag.",
            Self::DuplicateAttribute => "Duplicate attribute.",
        }
    }
}

/// A recoverable parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} ({})", .code.message(), .position)]
pub struct ParseError {
    pub code: ErrorCode,
    pub position: Position,
}

impl ParseError {
    pub fn new(code: ErrorCode, position: Position) -> Self {
        Self { code, position }
    }
}
