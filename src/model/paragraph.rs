//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

use super::DiagnosticKind;
use crate::style::ResolvedStyle;

/// A resolved paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in order
    pub runs: Vec<TextRun>,

    /// Fully-inherited paragraph style
    pub style: ResolvedStyle,
}

impl Paragraph {
    /// Create an empty paragraph with the given style.
    pub fn new(style: ResolvedStyle) -> Self {
        Self {
            runs: Vec::new(),
            style,
        }
    }

    /// Create a paragraph holding one run of plain text.
    pub fn with_text(text: impl Into<String>, style: ResolvedStyle) -> Self {
        let mut p = Self::new(style);
        p.add_run(TextRun::new(text));
        p
    }

    /// Add a run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.trim().is_empty())
    }

    /// Number of runs carrying an unresolved-placeholder marker.
    pub fn error_count(&self) -> usize {
        self.runs.iter().filter(|run| run.is_error()).count()
    }
}

/// A run of resolved text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Literal text with every placeholder substituted
    pub text: String,

    /// Run style when it differs from the paragraph style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ResolvedStyle>,

    /// Set when `text` is an error marker for a failed placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DiagnosticKind>,
}

impl TextRun {
    /// Create a plain run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
            error: None,
        }
    }

    /// Create an error-marker run for a placeholder that could not be resolved.
    pub fn marker(kind: DiagnosticKind, reference: &str) -> Self {
        Self {
            text: format!("[[{}: {}]]", kind, reference),
            style: None,
            error: Some(kind),
        }
    }

    /// Set the run style.
    pub fn with_style(mut self, style: ResolvedStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Check if this run is an error marker.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
