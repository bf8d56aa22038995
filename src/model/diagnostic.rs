//! Non-fatal findings recorded while validating a document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of suspected extraction problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A content line is longer than the configured threshold
    /// (possibly a failed paragraph merge)
    LongLine,
    /// A token without whitespace is abnormally long
    /// (possibly a scan or extraction artifact)
    UnbrokenToken,
    /// Replacement characters or private-use glyphs in the text
    SuspectedCorruption,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::LongLine => "long line",
            DiagnosticKind::UnbrokenToken => "unbroken token",
            DiagnosticKind::SuspectedCorruption => "suspected corruption",
        };
        f.write_str(name)
    }
}

/// A flagged content line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What was detected
    pub kind: DiagnosticKind,
    /// Chapter index (0-based)
    pub chapter: usize,
    /// Content line index within the chapter (0-based)
    pub line: usize,
    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(
        kind: DiagnosticKind,
        chapter: usize,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            chapter,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in chapter {}, line {}: {}",
            self.kind,
            self.chapter + 1,
            self.line + 1,
            self.message
        )
    }
}
