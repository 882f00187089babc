//! Error types for path expression parsing.

use thiserror::Error;

/// Errors that can occur while splitting a path expression into segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Unexpected character at a specific position.
    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },
    /// A segment with no characters, as in `a..b` or `a.`.
    #[error("Empty path segment at position {position}")]
    EmptySegment { position: usize },
    /// A backslash followed by something other than a known escape.
    #[error("Invalid escape sequence at position {position}")]
    InvalidEscape { position: usize },
}
