//! Document-level types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Block, Paragraph, Section};
use crate::assemble::AssemblyStats;

/// An assembled document, ready to hand to a document writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledDocument {
    /// Document metadata
    pub metadata: Metadata,

    /// Top-level sections in template order
    pub sections: Vec<Section>,

    /// Non-fatal problems met during assembly
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,

    /// Counters collected during assembly
    #[serde(default)]
    pub stats: AssemblyStats,
}

impl AssembledDocument {
    /// Create an empty document.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            sections: Vec::new(),
            diagnostics: Vec::new(),
            stats: AssemblyStats::default(),
        }
    }

    /// Stamp the generation time.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.metadata.generated_at = Some(at);
        self
    }

    /// Check if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Check if any placeholder failed to resolve.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of error-marker runs in the output.
    pub fn error_count(&self) -> usize {
        self.paragraphs().iter().map(|p| p.error_count()).sum()
    }

    /// Every paragraph in document order, including headings, list items and cells.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.sections
            .iter()
            .flat_map(|s| &s.blocks)
            .flat_map(Block::paragraphs)
            .collect()
    }

    /// Diagnostics of one kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Whether the writer should print page numbers
    pub page_numbers: bool,

    /// Generation time, stamped by the caller
    pub generated_at: Option<DateTime<Utc>>,
}

/// Category of a non-fatal assembly problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A placeholder named an unregistered namespace
    UnknownSource,
    /// A placeholder path was missing from its namespace
    PathResolution,
    /// A placeholder resolved to a mapping or sequence
    NonScalarResolution,
    /// An unknown style name fell back to the base style
    StyleFallback,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnknownSource => "UnknownSource",
            DiagnosticKind::PathResolution => "PathResolution",
            DiagnosticKind::NonScalarResolution => "NonScalarResolution",
            DiagnosticKind::StyleFallback => "StyleFallback",
        };
        f.write_str(name)
    }
}

/// A non-fatal problem and where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Problem category
    pub kind: DiagnosticKind,
    /// Location in the template, e.g. `sections[1].children[3].runs[0]`
    pub location: String,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(kind: DiagnosticKind, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Orientation, PageSetup, TextRun};
    use crate::style::StyleSheet;

    #[test]
    fn test_error_count_and_text() {
        let style = StyleSheet::builtin().base().clone();
        let mut p = Paragraph::with_text("Date: ", style);
        p.add_run(TextRun::marker(DiagnosticKind::PathResolution, "user_input.letter_details.date"));

        let mut section = Section::new(Orientation::Portrait, PageSetup::default());
        section.add_block(Block::Paragraph(p));

        let mut doc = AssembledDocument::new(Metadata::default());
        doc.sections.push(section);

        assert!(doc.has_errors());
        assert_eq!(doc.error_count(), 1);
        assert_eq!(
            doc.plain_text(),
            "Date: [[PathResolution: user_input.letter_details.date]]"
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(
            DiagnosticKind::StyleFallback,
            "sections[0].children[1]",
            "unknown paragraph style 'fancy', using 'document'",
        );
        assert_eq!(
            d.to_string(),
            "StyleFallback at sections[0].children[1]: unknown paragraph style 'fancy', using 'document'"
        );
    }
}
