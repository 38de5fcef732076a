//! Resolved output model.
//!
//! The assembled document has the same shape as the template, but every
//! placeholder has been replaced by its value (or a flagged error marker)
//! and every style name by its fully-inherited attribute set. This is the
//! artifact handed to an external document writer.

mod document;
mod paragraph;
mod section;
mod table;

pub use document::{AssembledDocument, Diagnostic, DiagnosticKind, Metadata};
pub use paragraph::{Paragraph, TextRun};
pub use section::{Block, Orientation, PageSetup, Section};
pub use table::{Table, TableCell, TableRow};
