//! Diagnostics — recoverable analysis and transform problems.
//!
//! Every compiler stage reports through a [`Diagnostics`] collector. Codes are
//! `&'static str` constants owned by the feature that reports them; the
//! [`registry`] module gathers all of them and rejects duplicates at compile time.

pub mod registry;

use std::path::{Path, PathBuf};

use crate::base::{LineIndex, Span, TextRange};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: Option<PathBuf>,
    /// Byte range of the offending node.
    pub range: TextRange,
    /// Line/column span of the offending node.
    pub span: Span,
    /// Severity level.
    pub severity: Severity,
    /// Stable diagnostic code (e.g., "ST0101").
    pub code: &'static str,
    /// The diagnostic message.
    pub message: String,
    /// The word within the node the diagnostic points at, if narrower than the node.
    pub word: Option<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            file: None,
            range: TextRange::default(),
            span: Span::default(),
            severity,
            code,
            message: message.into(),
            word: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create a new informational diagnostic.
    pub fn info(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Set the byte range (the span is filled in by the collector).
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    /// Set the offending word.
    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let location = match &self.file {
            Some(file) => format!(
                "{}:{}:{}",
                file.display(),
                self.span.start.line + 1,
                self.span.start.column + 1
            ),
            None => format!("{}:{}", self.span.start.line + 1, self.span.start.column + 1),
        };
        format!(
            "{location}: {} [{}] {}",
            self.severity.as_str(),
            self.code,
            self.message
        )
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics for one file during analysis or transformation.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    file: Option<PathBuf>,
    line_index: Option<LineIndex>,
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collector with no source location information.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector that stamps diagnostics with `file` and resolves
    /// line/column spans against `source`.
    pub fn for_file(file: &Path, source: &str) -> Self {
        Self {
            file: Some(file.to_path_buf()),
            line_index: Some(LineIndex::new(source)),
            diagnostics: Vec::new(),
        }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Add a diagnostic, filling in file and span.
    pub fn add(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.file.is_none() {
            diagnostic.file = self.file.clone();
        }
        if let Some(index) = &self.line_index {
            diagnostic.span = index.span(diagnostic.range);
        }
        tracing::trace!(code = diagnostic.code, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, code: &'static str, range: TextRange, message: impl Into<String>) {
        self.add(Diagnostic::error(code, message).with_range(range));
    }

    pub fn warning(&mut self, code: &'static str, range: TextRange, message: impl Into<String>) {
        self.add(Diagnostic::warning(code, message).with_range(range));
    }

    pub fn info(&mut self, code: &'static str, range: TextRange, message: impl Into<String>) {
        self.add(Diagnostic::info(code, message).with_range(range));
    }

    /// Append every diagnostic of another collector, keeping their locations.
    pub fn extend(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics carrying a given code.
    pub fn with_code(&self, code: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.code == code).collect()
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{Position, TextSize};

    #[test]
    fn test_collector_fills_span_from_source() {
        let mut diagnostics = Diagnostics::for_file(Path::new("/a.st.css"), ".a {}\n.b {}");
        diagnostics.warning(
            "ST9999",
            TextRange::new(TextSize::new(6), TextSize::new(8)),
            "test",
        );
        let diagnostic = &diagnostics.diagnostics()[0];
        assert_eq!(diagnostic.span.start, Position::new(1, 0));
        assert_eq!(diagnostic.file.as_deref(), Some(Path::new("/a.st.css")));
    }

    #[test]
    fn test_error_and_warning_counts() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error("ST9998", TextRange::default(), "e");
        diagnostics.warning("ST9999", TextRange::default(), "w");
        diagnostics.info("ST9997", TextRange::default(), "i");
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.take().len(), 3);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_format_includes_code_and_location() {
        let mut diagnostics = Diagnostics::for_file(Path::new("a.st.css"), "x");
        diagnostics.error("ST9998", TextRange::default(), "broken");
        assert_eq!(
            diagnostics.diagnostics()[0].format(),
            "a.st.css:1:1: error [ST9998] broken"
        );
    }
}
