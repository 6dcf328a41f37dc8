//! Parse diagnostic system.
//!
//! Non-fatal issues encountered while decoding or encoding a record are
//! collected as [`Diagnostic`] items rather than being silently dropped or
//! causing hard errors.  DXF consumers must tolerate malformed input from
//! third-party writers, so illegal values are reset to documented defaults
//! and the reset is recorded here.
//!
//! Diagnostics never drive control flow: the `Result` of a decode/encode
//! call is the sole contract surface.  After an operation the caller can
//! inspect the [`DiagnosticSink`] to see what was encountered.

use std::fmt;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Informational (e.g. an echoed code-999 comment, an empty free_list).
    Note,
    /// A group code this codec does not understand was skipped.
    /// Files from newer format revisions may carry such fields.
    UnknownGroupCode,
    /// A code-100 subclass marker did not match an expected marker string.
    UnexpectedSubclass,
    /// An empty required string was replaced by its documented default.
    DefaultedField,
    /// An illegal or out-of-range numeric value was reset to its fallback.
    IllegalValueReset,
    /// A separately-encoded count field disagreed with the populated nodes.
    CountMismatch,
    /// An entity was written to a version below its minimum with strict
    /// version rules disabled.
    VersionDowngrade,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note => write!(f, "Note"),
            Self::UnknownGroupCode => write!(f, "UnknownGroupCode"),
            Self::UnexpectedSubclass => write!(f, "UnexpectedSubclass"),
            Self::DefaultedField => write!(f, "DefaultedField"),
            Self::IllegalValueReset => write!(f, "IllegalValueReset"),
            Self::CountMismatch => write!(f, "CountMismatch"),
            Self::VersionDowngrade => write!(f, "VersionDowngrade"),
        }
    }
}

/// Position in the source stream a diagnostic refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file name, when the stream came from a named file.
    pub file: Option<String>,
    /// 1-based line number; 0 when the diagnostic arose while writing.
    pub line: usize,
}

impl SourceLocation {
    /// Location inside a named file.
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: Some(file.into()),
            line,
        }
    }

    /// Location with a line number but no file name (in-memory streams).
    pub fn at_line(line: usize) -> Self {
        Self { file: None, line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), 0) => write!(f, "{}", file),
            (Some(file), line) => write!(f, "{}:{}", file, line),
            (None, 0) => write!(f, "<output>"),
            (None, line) => write!(f, "line {}", line),
        }
    }
}

/// A single diagnostic produced during decoding or encoding.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The category.
    pub kind: DiagnosticKind,
    /// A human-readable description of the issue.
    pub message: String,
    /// Where in the stream the issue was seen.
    pub location: SourceLocation,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.kind, self.message, self.location)
    }
}

/// Collects diagnostics during a decode/encode operation.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    items: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a diagnostic.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        location: SourceLocation,
    ) {
        self.items.push(Diagnostic::new(kind, message, location));
    }

    /// Check if there are any diagnostics.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Get all diagnostics of a specific kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.items.iter().filter(|d| d.kind == kind).collect()
    }

    /// Check whether any diagnostic of the given kind exists.
    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.items.iter().any(|d| d.kind == kind)
    }

    /// Consume the sink into a `Vec`.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for DiagnosticSink {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticSink {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let d = Diagnostic::new(
            DiagnosticKind::DefaultedField,
            "empty layer replaced by \"0\"",
            SourceLocation::new("a.dxf", 12),
        );
        assert_eq!(d.kind, DiagnosticKind::DefaultedField);
        assert_eq!(d.location.line, 12);
    }

    #[test]
    fn test_sink_basics() {
        let mut sink = DiagnosticSink::new();
        assert!(sink.is_empty());

        sink.report(
            DiagnosticKind::UnknownGroupCode,
            "code 1071 skipped",
            SourceLocation::at_line(3),
        );
        sink.report(
            DiagnosticKind::CountMismatch,
            "72 says 4, got 3 vertices",
            SourceLocation::at_line(9),
        );
        sink.report(
            DiagnosticKind::UnknownGroupCode,
            "code 1001 skipped",
            SourceLocation::at_line(15),
        );

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.of_kind(DiagnosticKind::UnknownGroupCode).len(), 2);
        assert!(sink.has_kind(DiagnosticKind::CountMismatch));
        assert!(!sink.has_kind(DiagnosticKind::VersionDowngrade));
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::new(
            DiagnosticKind::UnexpectedSubclass,
            "expected AcDbMline, got AcDbLine",
            SourceLocation::new("bad.dxf", 7),
        );
        assert_eq!(
            format!("{}", d),
            "[UnexpectedSubclass] expected AcDbMline, got AcDbLine (bad.dxf:7)"
        );
    }

    #[test]
    fn test_location_display_without_file() {
        assert_eq!(format!("{}", SourceLocation::at_line(5)), "line 5");
        assert_eq!(format!("{}", SourceLocation::default()), "<output>");
    }
}
