//! Parse errors.
//!
//! Parsing is all-or-nothing: the first malformed construct aborts the file
//! with a [`ParseError`]. Error codes follow `P{category}{number}`:
//! - P01xx: Lexical errors (strings, comments)
//! - P02xx: Structural errors (braces, parentheses, brackets)
//! - P03xx: Statement errors (rules, declarations)

use std::fmt;

use text_size::TextRange;
use thiserror::Error;

/// Error codes for parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // P01xx: Lexical errors
    // =========================================================================
    /// Unterminated string literal
    P0101,
    /// Unterminated block comment
    P0102,
    /// Character the tokenizer cannot classify
    P0103,

    // =========================================================================
    // P02xx: Structural errors
    // =========================================================================
    /// Unclosed brace `{`
    P0201,
    /// Unexpected closing brace `}`
    P0202,
    /// Unclosed parenthesis `(`
    P0203,
    /// Unexpected closing parenthesis `)`
    P0204,
    /// Unclosed bracket `[`
    P0205,
    /// Unexpected closing bracket `]`
    P0206,

    // =========================================================================
    // P03xx: Statement errors
    // =========================================================================
    /// A word where neither a rule nor a declaration can start
    P0301,
    /// Declaration with an empty property name
    P0302,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "P0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P0101 => "P0101",
            Self::P0102 => "P0102",
            Self::P0103 => "P0103",
            Self::P0201 => "P0201",
            Self::P0202 => "P0202",
            Self::P0203 => "P0203",
            Self::P0204 => "P0204",
            Self::P0205 => "P0205",
            Self::P0206 => "P0206",
            Self::P0301 => "P0301",
            Self::P0302 => "P0302",
        }
    }

    /// Get the default message for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::P0101 => "unterminated string",
            Self::P0102 => "unterminated comment",
            Self::P0103 => "unexpected character",
            Self::P0201 => "unclosed block",
            Self::P0202 => "unexpected }",
            Self::P0203 => "unclosed parenthesis",
            Self::P0204 => "unexpected )",
            Self::P0205 => "unclosed bracket",
            Self::P0206 => "unexpected ]",
            Self::P0301 => "unknown word",
            Self::P0302 => "missing property name",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fatal parse error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub range: TextRange,
}

impl ParseError {
    pub fn new(code: ErrorCode, range: TextRange) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            range,
        }
    }

    /// Attach the offending word to the default message.
    pub fn with_word(mut self, word: &str) -> Self {
        self.message = format!("{} \"{}\"", self.code.default_message(), word);
        self
    }
}
