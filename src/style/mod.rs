//! Style resolution.
//!
//! Styles form a two-level structure. The `document` style is the base and
//! must define every attribute; any other named style is a partial overlay
//! on top of it. Table styles follow the same shape in a separate namespace
//! whose base is named `default`.
//!
//! An unknown name never fails: it resolves to the base and is reported as
//! a [`StyleFallback`] so the caller can surface it as a diagnostic.

mod definition;
mod table;

pub use definition::{Alignment, ResolvedStyle, StyleDef};
pub use table::{BorderRule, ResolvedTableStyle, TableStyleDef, VerticalAlignment};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::error::Result;

/// Name of the base paragraph style.
pub const BASE_STYLE: &str = "document";

/// Name of the base table style.
pub const BASE_TABLE_STYLE: &str = "default";

/// Which style namespace a name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleNamespace {
    /// Paragraph and run styles
    Paragraph,
    /// Table styles
    Table,
}

impl fmt::Display for StyleNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleNamespace::Paragraph => write!(f, "paragraph"),
            StyleNamespace::Table => write!(f, "table"),
        }
    }
}

impl StyleNamespace {
    /// Name of the base style in this namespace.
    pub fn base(self) -> &'static str {
        match self {
            StyleNamespace::Paragraph => BASE_STYLE,
            StyleNamespace::Table => BASE_TABLE_STYLE,
        }
    }
}

/// A style name that was not defined and resolved to its base instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {namespace} style '{requested}', using '{}'", .namespace.base())]
pub struct StyleFallback {
    /// The name that was requested
    pub requested: String,
    /// Namespace it was looked up in
    pub namespace: StyleNamespace,
}

/// The full set of style definitions for one template.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    base: ResolvedStyle,
    named: HashMap<String, StyleDef>,
    table_base: ResolvedTableStyle,
    tables: HashMap<String, TableStyleDef>,
}

impl StyleSheet {
    /// Build a sheet from complete definitions.
    ///
    /// `document` and the `default` table style must both be total.
    pub fn new(
        mut named: HashMap<String, StyleDef>,
        mut tables: HashMap<String, TableStyleDef>,
    ) -> Result<Self> {
        let base = named
            .remove(BASE_STYLE)
            .unwrap_or_default()
            .complete(BASE_STYLE)?;
        let table_base = tables
            .remove(BASE_TABLE_STYLE)
            .unwrap_or_default()
            .complete(BASE_TABLE_STYLE)?;

        Ok(Self {
            base,
            named,
            table_base,
            tables,
        })
    }

    /// Built-in styles matching the house letter layout.
    pub fn builtin() -> Self {
        Self {
            base: ResolvedStyle {
                font_family: "Poppins".to_string(),
                font_size: 10.0,
                font_color: "000000".to_string(),
                bold: false,
                italic: false,
                underline: false,
                alignment: Alignment::Left,
                line_spacing: 1.0,
                space_before: 0.0,
                space_after: 0.0,
                left_indent: 0.0,
                hanging_indent: 0.0,
                keep_with_next: false,
                page_break_before: false,
            },
            named: builtin_named(),
            table_base: ResolvedTableStyle {
                header_background: "3FDCC8".to_string(),
                border: BorderRule::Single,
                border_color: "000000".to_string(),
                border_width: 0.5,
                vertical_alignment: VerticalAlignment::Middle,
                table_alignment: Alignment::Center,
                header_vertical_text: false,
                autofit: false,
            },
            tables: HashMap::new(),
        }
    }

    /// Layer template definitions over this sheet.
    ///
    /// `document` and the `default` table style are overlaid attribute by
    /// attribute so the bases stay total. Any other name replaces the entry
    /// of the same name, so its unset attributes come from the base.
    pub fn extended(
        mut self,
        named: &HashMap<String, StyleDef>,
        tables: &HashMap<String, TableStyleDef>,
    ) -> Self {
        for (name, def) in named {
            if name == BASE_STYLE {
                def.apply_to(&mut self.base);
            } else if self.named.insert(name.clone(), def.clone()).is_some() {
                log::debug!("Template style '{}' replaces the built-in definition", name);
            }
        }
        for (name, def) in tables {
            if name == BASE_TABLE_STYLE {
                def.apply_to(&mut self.table_base);
            } else if self.tables.insert(name.clone(), def.clone()).is_some() {
                log::debug!("Template table style '{}' replaces the built-in definition", name);
            }
        }
        self
    }

    /// The base paragraph style.
    pub fn base(&self) -> &ResolvedStyle {
        &self.base
    }

    /// The base table style.
    pub fn table_base(&self) -> &ResolvedTableStyle {
        &self.table_base
    }

    /// Check if a paragraph style name is defined.
    pub fn contains(&self, name: &str) -> bool {
        name == BASE_STYLE || self.named.contains_key(name)
    }

    /// Check if a table style name is defined.
    pub fn contains_table(&self, name: &str) -> bool {
        name == BASE_TABLE_STYLE || self.tables.contains_key(name)
    }

    /// Resolve a named style over the base.
    pub fn resolve_style(&self, name: &str) -> (ResolvedStyle, Option<StyleFallback>) {
        self.resolve_with(name, &[])
    }

    /// Resolve a named style, then apply `overlays` in order.
    pub fn resolve_with(
        &self,
        name: &str,
        overlays: &[&StyleDef],
    ) -> (ResolvedStyle, Option<StyleFallback>) {
        let mut style = self.base.clone();
        let mut fallback = None;

        if name != BASE_STYLE {
            match self.named.get(name) {
                Some(def) => def.apply_to(&mut style),
                None => {
                    log::warn!("Unknown style '{}', falling back to '{}'", name, BASE_STYLE);
                    fallback = Some(StyleFallback {
                        requested: name.to_string(),
                        namespace: StyleNamespace::Paragraph,
                    });
                }
            }
        }

        for overlay in overlays {
            overlay.apply_to(&mut style);
        }

        (style, fallback)
    }

    /// Resolve a table style; `None` means the base.
    pub fn resolve_table_style(
        &self,
        name: Option<&str>,
    ) -> (ResolvedTableStyle, Option<StyleFallback>) {
        let mut style = self.table_base.clone();
        let name = match name {
            Some(name) if name != BASE_TABLE_STYLE => name,
            _ => return (style, None),
        };

        match self.tables.get(name) {
            Some(def) => {
                def.apply_to(&mut style);
                (style, None)
            }
            None => {
                log::warn!(
                    "Unknown table style '{}', falling back to '{}'",
                    name,
                    BASE_TABLE_STYLE
                );
                (
                    style,
                    Some(StyleFallback {
                        requested: name.to_string(),
                        namespace: StyleNamespace::Table,
                    }),
                )
            }
        }
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::builtin()
    }
}

const NAVY: &str = "0F1E3C";

fn builtin_named() -> HashMap<String, StyleDef> {
    let mut named = HashMap::new();

    named.insert(
        "heading1".to_string(),
        StyleDef::new()
            .with_font_family("Noe Display SJP Bold")
            .with_font_size(20.0)
            .with_font_color(NAVY)
            .with_spacing(0.0, 6.0)
            .with_page_break_before(true)
            .with_keep_with_next(true),
    );
    named.insert(
        "heading2".to_string(),
        StyleDef::new()
            .with_font_family("Poppins SemiBold")
            .with_font_size(12.0)
            .with_font_color(NAVY)
            .with_spacing(6.0, 6.0)
            .with_keep_with_next(true),
    );
    named.insert(
        "heading3".to_string(),
        StyleDef::new()
            .with_font_family("Poppins SemiBold")
            .with_font_size(11.0)
            .with_font_color(NAVY)
            .with_keep_with_next(true),
    );
    named.insert(
        "bullet".to_string(),
        StyleDef::new().with_indent(0.4958, 0.2479),
    );
    named.insert(
        "table_header".to_string(),
        StyleDef::new()
            .with_font_size(8.0)
            .with_bold(true)
            .with_alignment(Alignment::Center),
    );
    named.insert(
        "table_cell".to_string(),
        StyleDef::new()
            .with_font_size(8.0)
            .with_alignment(Alignment::Center),
    );
    named.insert(
        "footnote".to_string(),
        StyleDef::new().with_font_size(9.0).with_italic(true),
    );
    named.insert("closing".to_string(), StyleDef::new());

    named
}
