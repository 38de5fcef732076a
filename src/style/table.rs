//! Table-level style attributes.
//!
//! These live in their own namespace: a table style never inherits from,
//! or leaks into, paragraph attributes.

use serde::{Deserialize, Serialize};

use super::Alignment;
use crate::error::{Error, Result};

/// Vertical alignment for table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Top alignment
    #[default]
    #[serde(alias = "TOP")]
    Top,
    /// Middle alignment
    #[serde(alias = "CENTER", alias = "center", alias = "MIDDLE")]
    Middle,
    /// Bottom alignment
    #[serde(alias = "BOTTOM")]
    Bottom,
}

/// Border rule drawn around and between cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderRule {
    /// No borders
    None,
    /// Single line grid
    #[default]
    Single,
    /// Double line grid
    Double,
    /// Dotted grid
    Dotted,
}

/// A partial table style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyleDef {
    /// Header row background as hex, e.g. "3FDCC8"
    pub header_background: Option<String>,
    /// Border rule
    pub border: Option<BorderRule>,
    /// Border color as hex
    pub border_color: Option<String>,
    /// Border width in points
    pub border_width: Option<f32>,
    /// Vertical alignment of cell content
    pub vertical_alignment: Option<VerticalAlignment>,
    /// Horizontal placement of the table on the page
    pub table_alignment: Option<Alignment>,
    /// Rotate header text vertically
    pub header_vertical_text: Option<bool>,
    /// Let the writer size columns automatically
    pub autofit: Option<bool>,
}

impl TableStyleDef {
    /// Write every set attribute onto a concrete table style.
    pub fn apply_to(&self, style: &mut ResolvedTableStyle) {
        if let Some(ref background) = self.header_background {
            style.header_background = background.clone();
        }
        if let Some(border) = self.border {
            style.border = border;
        }
        if let Some(ref color) = self.border_color {
            style.border_color = color.clone();
        }
        if let Some(width) = self.border_width {
            style.border_width = width;
        }
        if let Some(valign) = self.vertical_alignment {
            style.vertical_alignment = valign;
        }
        if let Some(align) = self.table_alignment {
            style.table_alignment = align;
        }
        if let Some(vertical) = self.header_vertical_text {
            style.header_vertical_text = vertical;
        }
        if let Some(autofit) = self.autofit {
            style.autofit = autofit;
        }
    }

    /// Convert to a concrete table style, requiring every attribute.
    pub fn complete(&self, name: &str) -> Result<ResolvedTableStyle> {
        let missing = |attribute| Error::IncompleteBaseStyle {
            style: name.to_string(),
            attribute,
        };

        Ok(ResolvedTableStyle {
            header_background: self
                .header_background
                .clone()
                .ok_or_else(|| missing("header_background"))?,
            border: self.border.ok_or_else(|| missing("border"))?,
            border_color: self.border_color.clone().ok_or_else(|| missing("border_color"))?,
            border_width: self.border_width.ok_or_else(|| missing("border_width"))?,
            vertical_alignment: self
                .vertical_alignment
                .ok_or_else(|| missing("vertical_alignment"))?,
            table_alignment: self.table_alignment.ok_or_else(|| missing("table_alignment"))?,
            header_vertical_text: self
                .header_vertical_text
                .ok_or_else(|| missing("header_vertical_text"))?,
            autofit: self.autofit.ok_or_else(|| missing("autofit"))?,
        })
    }
}

/// A fully-inherited table style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTableStyle {
    /// Header row background as hex
    pub header_background: String,
    /// Border rule
    pub border: BorderRule,
    /// Border color as hex
    pub border_color: String,
    /// Border width in points
    pub border_width: f32,
    /// Vertical alignment of cell content
    pub vertical_alignment: VerticalAlignment,
    /// Horizontal placement of the table
    pub table_alignment: Alignment,
    /// Rotate header text vertically
    pub header_vertical_text: bool,
    /// Automatic column sizing
    pub autofit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_alignment_aliases() {
        let def: TableStyleDef =
            serde_json::from_str(r#"{"vertical_alignment": "CENTER", "border": "double"}"#)
                .unwrap();
        assert_eq!(def.vertical_alignment, Some(VerticalAlignment::Middle));
        assert_eq!(def.border, Some(BorderRule::Double));
    }

    #[test]
    fn test_incomplete_table_base() {
        let def = TableStyleDef {
            header_background: Some("3FDCC8".into()),
            ..Default::default()
        };
        assert!(matches!(
            def.complete("default"),
            Err(Error::IncompleteBaseStyle { attribute: "border", .. })
        ));
    }
}
