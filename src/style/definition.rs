//! Paragraph and run style attributes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    #[serde(alias = "LEFT")]
    Left,
    /// Center alignment
    #[serde(alias = "CENTER")]
    Center,
    /// Right alignment
    #[serde(alias = "RIGHT")]
    Right,
    /// Justified alignment
    #[serde(alias = "JUSTIFY")]
    Justify,
}

/// A partial style: only the attributes that are set override anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDef {
    /// Font family name
    pub font_family: Option<String>,
    /// Font size in points
    pub font_size: Option<f32>,
    /// Text color as hex without '#', e.g. "0F1E3C"
    pub font_color: Option<String>,
    /// Bold text
    pub bold: Option<bool>,
    /// Italic text
    pub italic: Option<bool>,
    /// Underlined text
    pub underline: Option<bool>,
    /// Paragraph alignment
    pub alignment: Option<Alignment>,
    /// Line spacing multiplier (1.0 = single)
    pub line_spacing: Option<f32>,
    /// Space before the paragraph in points
    pub space_before: Option<f32>,
    /// Space after the paragraph in points
    pub space_after: Option<f32>,
    /// Left indent in inches
    pub left_indent: Option<f32>,
    /// Hanging indent in inches
    pub hanging_indent: Option<f32>,
    /// Keep the paragraph on the same page as the next one
    pub keep_with_next: Option<bool>,
    /// Start the paragraph on a new page
    pub page_break_before: Option<bool>,
}

impl StyleDef {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the font color.
    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = Some(color.into());
        self
    }

    /// Set bold.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set italic.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Set alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set space before and after.
    pub fn with_spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = Some(before);
        self.space_after = Some(after);
        self
    }

    /// Set left and hanging indents.
    pub fn with_indent(mut self, left: f32, hanging: f32) -> Self {
        self.left_indent = Some(left);
        self.hanging_indent = Some(hanging);
        self
    }

    /// Set keep-with-next.
    pub fn with_keep_with_next(mut self, keep: bool) -> Self {
        self.keep_with_next = Some(keep);
        self
    }

    /// Set page-break-before.
    pub fn with_page_break_before(mut self, brk: bool) -> Self {
        self.page_break_before = Some(brk);
        self
    }

    /// Check if no attribute is set.
    pub fn is_empty(&self) -> bool {
        *self == StyleDef::default()
    }

    /// Write every set attribute onto a concrete style.
    pub fn apply_to(&self, style: &mut ResolvedStyle) {
        if let Some(ref family) = self.font_family {
            style.font_family = family.clone();
        }
        if let Some(size) = self.font_size {
            style.font_size = size;
        }
        if let Some(ref color) = self.font_color {
            style.font_color = color.clone();
        }
        if let Some(bold) = self.bold {
            style.bold = bold;
        }
        if let Some(italic) = self.italic {
            style.italic = italic;
        }
        if let Some(underline) = self.underline {
            style.underline = underline;
        }
        if let Some(alignment) = self.alignment {
            style.alignment = alignment;
        }
        if let Some(spacing) = self.line_spacing {
            style.line_spacing = spacing;
        }
        if let Some(before) = self.space_before {
            style.space_before = before;
        }
        if let Some(after) = self.space_after {
            style.space_after = after;
        }
        if let Some(left) = self.left_indent {
            style.left_indent = left;
        }
        if let Some(hanging) = self.hanging_indent {
            style.hanging_indent = hanging;
        }
        if let Some(keep) = self.keep_with_next {
            style.keep_with_next = keep;
        }
        if let Some(brk) = self.page_break_before {
            style.page_break_before = brk;
        }
    }

    /// Convert to a concrete style, requiring every attribute to be set.
    pub fn complete(&self, name: &str) -> Result<ResolvedStyle> {
        let missing = |attribute| Error::IncompleteBaseStyle {
            style: name.to_string(),
            attribute,
        };

        Ok(ResolvedStyle {
            font_family: self.font_family.clone().ok_or_else(|| missing("font_family"))?,
            font_size: self.font_size.ok_or_else(|| missing("font_size"))?,
            font_color: self.font_color.clone().ok_or_else(|| missing("font_color"))?,
            bold: self.bold.ok_or_else(|| missing("bold"))?,
            italic: self.italic.ok_or_else(|| missing("italic"))?,
            underline: self.underline.ok_or_else(|| missing("underline"))?,
            alignment: self.alignment.ok_or_else(|| missing("alignment"))?,
            line_spacing: self.line_spacing.ok_or_else(|| missing("line_spacing"))?,
            space_before: self.space_before.ok_or_else(|| missing("space_before"))?,
            space_after: self.space_after.ok_or_else(|| missing("space_after"))?,
            left_indent: self.left_indent.ok_or_else(|| missing("left_indent"))?,
            hanging_indent: self.hanging_indent.ok_or_else(|| missing("hanging_indent"))?,
            keep_with_next: self.keep_with_next.ok_or_else(|| missing("keep_with_next"))?,
            page_break_before: self
                .page_break_before
                .ok_or_else(|| missing("page_break_before"))?,
        })
    }
}

/// A fully-inherited style; every attribute has a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStyle {
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub font_size: f32,
    /// Text color as hex
    pub font_color: String,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Paragraph alignment
    pub alignment: Alignment,
    /// Line spacing multiplier
    pub line_spacing: f32,
    /// Space before in points
    pub space_before: f32,
    /// Space after in points
    pub space_after: f32,
    /// Left indent in inches
    pub left_indent: f32,
    /// Hanging indent in inches
    pub hanging_indent: f32,
    /// Keep with next paragraph
    pub keep_with_next: bool,
    /// Page break before
    pub page_break_before: bool,
}

impl ResolvedStyle {
    /// Turn this style into an overlay that sets every attribute.
    pub fn into_def(self) -> StyleDef {
        StyleDef {
            font_family: Some(self.font_family),
            font_size: Some(self.font_size),
            font_color: Some(self.font_color),
            bold: Some(self.bold),
            italic: Some(self.italic),
            underline: Some(self.underline),
            alignment: Some(self.alignment),
            line_spacing: Some(self.line_spacing),
            space_before: Some(self.space_before),
            space_after: Some(self.space_after),
            left_indent: Some(self.left_indent),
            hanging_indent: Some(self.hanging_indent),
            keep_with_next: Some(self.keep_with_next),
            page_break_before: Some(self.page_break_before),
        }
    }

    /// Return a copy with `overlay` applied.
    pub fn overlaid(&self, overlay: &StyleDef) -> ResolvedStyle {
        let mut style = self.clone();
        overlay.apply_to(&mut style);
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total() -> StyleDef {
        StyleDef {
            font_family: Some("Poppins".into()),
            font_size: Some(10.0),
            font_color: Some("000000".into()),
            bold: Some(false),
            italic: Some(false),
            underline: Some(false),
            alignment: Some(Alignment::Left),
            line_spacing: Some(1.0),
            space_before: Some(0.0),
            space_after: Some(0.0),
            left_indent: Some(0.0),
            hanging_indent: Some(0.0),
            keep_with_next: Some(false),
            page_break_before: Some(false),
        }
    }

    #[test]
    fn test_complete_total_style() {
        let style = total().complete("document").unwrap();
        assert_eq!(style.font_family, "Poppins");
        assert_eq!(style.font_size, 10.0);
    }

    #[test]
    fn test_complete_reports_first_missing() {
        let mut def = total();
        def.font_color = None;
        let err = def.complete("document").unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteBaseStyle { attribute: "font_color", .. }
        ));
    }

    #[test]
    fn test_overlay_only_touches_set_attributes() {
        let base = total().complete("document").unwrap();
        let styled = base.overlaid(&StyleDef::new().with_font_size(20.0));
        assert_eq!(styled.font_size, 20.0);
        assert_eq!(styled.font_family, "Poppins");
        assert!(!styled.bold);
    }

    #[test]
    fn test_alignment_accepts_uppercase() {
        let def: StyleDef = serde_json::from_str(r#"{"alignment": "CENTER"}"#).unwrap();
        assert_eq!(def.alignment, Some(Alignment::Center));
        let def: StyleDef = serde_json::from_str(r#"{"alignment": "justify"}"#).unwrap();
        assert_eq!(def.alignment, Some(Alignment::Justify));
    }

    #[test]
    fn test_unknown_attributes_ignored() {
        let def: StyleDef =
            serde_json::from_str(r#"{"font_size": 8, "vertical_alignment": "CENTER"}"#).unwrap();
        assert_eq!(def.font_size, Some(8.0));
    }
}
