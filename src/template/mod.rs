//! Template document tree.
//!
//! A [`Template`] is the structural description of a document: sections of
//! headings, paragraphs, lists, tables and images whose text may carry
//! `{source.path}` placeholders. It is loaded once, validated, and then
//! handed read-only to the assembler.

mod node;
mod walk;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::placeholder::{self, Segment};
use crate::style::{StyleDef, StyleSheet, TableStyleDef};

pub use node::{
    Cell, DynamicRows, Heading, Image, List, Node, PageSettings, Paragraph, Run, Section, Table,
};
pub use walk::{StyleContext, StyleFrame, Visit, Walk};

/// Document-level template settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateMetadata {
    /// Document title
    pub title: Option<String>,
    /// Ask the writer to print page numbers
    pub page_numbers: bool,
    /// Layer template styles over the built-in sheet rather than replacing it
    pub builtin_styles: bool,
}

impl Default for TemplateMetadata {
    fn default() -> Self {
        Self {
            title: None,
            page_numbers: true,
            builtin_styles: true,
        }
    }
}

/// A placeholder occurrence found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderRef {
    /// Location of the text run holding the token
    pub location: String,
    /// Full token text, braces included
    pub token: String,
    /// Namespace the token reads from
    pub source: String,
}

/// A parsed template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Document-level settings
    #[serde(default)]
    pub metadata: TemplateMetadata,

    /// Paragraph styles by name
    #[serde(default)]
    pub styles: HashMap<String, StyleDef>,

    /// Table styles by name
    #[serde(default)]
    pub table_styles: HashMap<String, TableStyleDef>,

    /// Top-level sections
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Template {
    /// Create an empty template using the built-in styles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a template from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a template from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Add a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Builder-style section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Set a paragraph style.
    pub fn with_style(mut self, name: impl Into<String>, def: StyleDef) -> Self {
        self.styles.insert(name.into(), def);
        self
    }

    /// Build the style sheet for this template.
    pub fn stylesheet(&self) -> Result<StyleSheet> {
        if self.metadata.builtin_styles {
            Ok(StyleSheet::builtin().extended(&self.styles, &self.table_styles))
        } else {
            StyleSheet::new(self.styles.clone(), self.table_styles.clone())
        }
    }

    /// Depth-first walk over every node.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.sections)
    }

    /// Check the template for authoring errors before any resolution.
    ///
    /// Fails with [`Error::MalformedToken`] on the first bad brace, or on a
    /// bare `{name}` outside dynamic row cells and item templates, and with
    /// [`Error::AssemblyAbort`] on structurally invalid nodes.
    pub fn validate(&self) -> Result<()> {
        for visit in self.walk() {
            let location = visit.location.as_str();
            for (suffix, text) in visit.node.texts() {
                let bindable = visit.bound || suffix == ".item_template";
                for segment in scan_checked(text, location, &suffix)? {
                    if let Segment::Token(token) = segment {
                        if token.is_bare() && !bindable {
                            return Err(located(token.bare_error(), location, &suffix));
                        }
                    }
                }
            }
            validate_node(visit.node, location)?;
        }
        Ok(())
    }

    /// List every placeholder in document order.
    pub fn placeholders(&self) -> Result<Vec<PlaceholderRef>> {
        let mut found = Vec::new();
        for visit in self.walk() {
            for (suffix, text) in visit.node.texts() {
                for segment in scan_checked(text, &visit.location, &suffix)? {
                    if let Segment::Token(token) = segment {
                        found.push(PlaceholderRef {
                            location: format!("{}{}", visit.location, suffix),
                            token: token.raw.to_string(),
                            source: token.source.to_string(),
                        });
                    }
                }
            }
        }
        Ok(found)
    }
}

fn scan_checked<'a>(text: &'a str, location: &str, suffix: &str) -> Result<Vec<Segment<'a>>> {
    placeholder::scan_all(text).map_err(|err| located(err, location, suffix))
}

fn located(err: Error, location: &str, suffix: &str) -> Error {
    match err {
        Error::MalformedToken { offset, reason } => Error::MalformedToken {
            offset,
            reason: format!("{} in {}{}", reason, location, suffix),
        },
        other => other,
    }
}

fn abort(location: &str, reason: impl Into<String>) -> Error {
    Error::AssemblyAbort {
        location: location.to_string(),
        reason: reason.into(),
    }
}

fn require_single_token(text: &str, location: &str) -> Result<()> {
    match placeholder::single_token(text)? {
        Some(token) if !token.is_bare() => Ok(()),
        _ => Err(abort(
            location,
            format!("'{}' must be a single placeholder token with a path", text),
        )),
    }
}

fn validate_node(node: &Node, location: &str) -> Result<()> {
    match node {
        Node::Heading(heading) => {
            if !(1..=6).contains(&heading.level) {
                return Err(abort(
                    location,
                    format!("heading level {} is outside 1-6", heading.level),
                ));
            }
        }
        Node::List(list) => {
            if let Some(ref source) = list.items_from {
                require_single_token(source, &format!("{}.items_from", location))?;
            } else if list.item_template.is_some() || list.keys.is_some() {
                return Err(abort(
                    location,
                    "item_template and keys require items_from",
                ));
            }
        }
        Node::Table(table) => {
            if let Some(ref dynamic) = table.dynamic {
                require_single_token(&dynamic.source, &format!("{}.dynamic.source", location))?;
                if dynamic.cells.is_empty() {
                    return Err(abort(location, "dynamic rows need at least one cell"));
                }
            }
            if table.column_count() == 0 {
                return Err(abort(location, "table has no columns"));
            }
        }
        Node::Image(image) => {
            if image.reference.trim().is_empty() {
                return Err(abort(location, "image reference is empty"));
            }
        }
        Node::Section(_) | Node::Paragraph(_) | Node::PageBreak => {}
    }
    Ok(())
}
