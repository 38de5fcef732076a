//! Table types.

use serde::{Deserialize, Serialize};

use super::Block;
use crate::style::ResolvedTableStyle;

/// A resolved table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table, header rows first
    pub rows: Vec<TableRow>,

    /// Number of header rows (0 = no header)
    pub header_rows: usize,

    /// Column widths in centimetres (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<f32>>,

    /// Fully-inherited table style
    pub style: ResolvedTableStyle,
}

impl Table {
    /// Create a new empty table.
    pub fn new(style: ResolvedTableStyle) -> Self {
        Self {
            rows: Vec::new(),
            header_rows: 0,
            column_widths: None,
            style,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        if row.is_header {
            self.header_rows += 1;
        }
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row, counting spans).
    pub fn column_count(&self) -> usize {
        self.rows
            .first()
            .map(|r| r.cells.iter().map(|c| c.colspan as usize).sum())
            .unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get header rows.
    pub fn header(&self) -> &[TableRow] {
        &self.rows[..self.header_rows.min(self.rows.len())]
    }

    /// Get body rows (non-header).
    pub fn body(&self) -> &[TableRow] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }

    /// Rows materialized from data.
    pub fn generated_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|r| r.generated)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row
    pub is_header: bool,

    /// Whether this row was generated from a data sequence
    #[serde(default)]
    pub generated: bool,
}

impl TableRow {
    /// Create a body row.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
            generated: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
            generated: false,
        }
    }

    /// Create a row generated from one data element.
    pub fn generated(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
            generated: true,
        }
    }

    /// Get plain text representation, cells separated by tabs.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content blocks
    pub content: Vec<Block>,

    /// Number of rows this cell spans
    pub rowspan: u8,

    /// Number of columns this cell spans
    pub colspan: u8,
}

impl TableCell {
    /// Create a cell with content.
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            content,
            rowspan: 1,
            colspan: 1,
        }
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: u8) -> Self {
        self.colspan = span;
        self
    }

    /// Set rowspan and return self.
    pub fn rowspan(mut self, span: u8) -> Self {
        self.rowspan = span;
        self
    }

    /// Get plain text of the cell, blocks separated by spaces.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|b| b.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
