//! Template node types.

use serde::{Deserialize, Serialize};

use crate::model::{Orientation, PageSetup};
use crate::style::StyleDef;

/// A content node in the template tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A nested section
    Section(Section),

    /// A paragraph of runs
    Paragraph(Paragraph),

    /// A heading (level 1-6)
    Heading(Heading),

    /// An ordered or unordered list
    List(List),

    /// A table, optionally with data-driven rows
    Table(Table),

    /// An external image reference
    Image(Image),

    /// Forced page break
    PageBreak,
}

impl Node {
    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Section(_) => "section",
            Node::Paragraph(_) => "paragraph",
            Node::Heading(_) => "heading",
            Node::List(_) => "list",
            Node::Table(_) => "table",
            Node::Image(_) => "image",
            Node::PageBreak => "page_break",
        }
    }

    /// Text fields that may hold placeholders, with their location suffix.
    ///
    /// Table cell content is not included; cells hold nodes of their own.
    pub fn texts(&self) -> Vec<(String, &str)> {
        match self {
            Node::Paragraph(p) => p.texts(""),
            Node::Heading(h) => vec![(".text".to_string(), h.text.as_str())],
            Node::List(list) => {
                let mut texts = Vec::new();
                for (i, item) in list.items.iter().enumerate() {
                    texts.extend(item.texts(&format!(".items[{}]", i)));
                }
                if let Some(ref source) = list.items_from {
                    texts.push((".items_from".to_string(), source.as_str()));
                }
                if let Some(ref template) = list.item_template {
                    texts.push((".item_template".to_string(), template.as_str()));
                }
                texts
            }
            Node::Table(table) => table
                .dynamic
                .iter()
                .map(|d| (".dynamic.source".to_string(), d.source.as_str()))
                .collect(),
            Node::Section(_) | Node::Image(_) | Node::PageBreak => Vec::new(),
        }
    }
}

/// A section: a run of pages sharing orientation and page setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Page orientation; nested sections inherit their parent's
    #[serde(default)]
    pub orientation: Option<Orientation>,

    /// Default paragraph style for everything inside
    #[serde(default)]
    pub style: Option<String>,

    /// Attribute overrides applied to everything inside
    #[serde(default)]
    pub overrides: Option<StyleDef>,

    /// Page size and margin overrides
    #[serde(default)]
    pub page: Option<PageSettings>,

    /// Child nodes in order
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Section {
    /// Create an empty section.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation: Some(orientation),
            ..Default::default()
        }
    }

    /// Add a child node.
    pub fn add(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Builder-style child.
    pub fn with(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    /// Set the default style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Partial page settings; unset values come from the orientation default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    /// Page width in inches
    pub width: Option<f32>,
    /// Page height in inches
    pub height: Option<f32>,
    /// Top margin in centimetres
    pub top_margin: Option<f32>,
    /// Bottom margin in centimetres
    pub bottom_margin: Option<f32>,
    /// Left margin in centimetres
    pub left_margin: Option<f32>,
    /// Right margin in centimetres
    pub right_margin: Option<f32>,
}

impl PageSettings {
    /// Apply these settings over the default setup for `orientation`.
    pub fn resolve(&self, orientation: Orientation) -> PageSetup {
        let mut setup = PageSetup::for_orientation(orientation);
        if let Some(width) = self.width {
            setup.width = width;
        }
        if let Some(height) = self.height {
            setup.height = height;
        }
        if let Some(top) = self.top_margin {
            setup.top_margin = top;
        }
        if let Some(bottom) = self.bottom_margin {
            setup.bottom_margin = bottom;
        }
        if let Some(left) = self.left_margin {
            setup.left_margin = left;
        }
        if let Some(right) = self.right_margin {
            setup.right_margin = right;
        }
        setup
    }
}

/// A run of template text with optional styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RunRepr")]
pub struct Run {
    /// Text, possibly containing placeholders
    pub text: String,
    /// Named style for this run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Attribute overrides for this run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<StyleDef>,
}

impl Run {
    /// Create an unstyled run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
            overrides: None,
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            overrides: Some(StyleDef::new().with_bold(true)),
            ..Self::new(text)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RunRepr {
    Plain(String),
    Styled {
        text: String,
        #[serde(default)]
        style: Option<String>,
        #[serde(default)]
        overrides: Option<StyleDef>,
    },
}

impl From<RunRepr> for Run {
    fn from(repr: RunRepr) -> Self {
        match repr {
            RunRepr::Plain(text) => Run::new(text),
            RunRepr::Styled {
                text,
                style,
                overrides,
            } => Run {
                text,
                style,
                overrides,
            },
        }
    }
}

/// A paragraph: a sequence of runs sharing a paragraph style.
///
/// In JSON a paragraph may be a bare string, an object with a `text`
/// shorthand, an object with `runs`, or both (`text` comes first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParagraphRepr")]
pub struct Paragraph {
    /// Runs in order
    pub runs: Vec<Run>,
    /// Named paragraph style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Attribute overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<StyleDef>,
}

impl Paragraph {
    /// Create an empty paragraph (a blank line).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::new(text)],
            ..Default::default()
        }
    }

    /// Add a run.
    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Set the named style.
    pub fn styled(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    fn texts(&self, prefix: &str) -> Vec<(String, &str)> {
        self.runs
            .iter()
            .enumerate()
            .map(|(i, run)| (format!("{}.runs[{}]", prefix, i), run.text.as_str()))
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParagraphRepr {
    Plain(String),
    Full {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        runs: Vec<Run>,
        #[serde(default)]
        style: Option<String>,
        #[serde(default)]
        overrides: Option<StyleDef>,
    },
}

impl From<ParagraphRepr> for Paragraph {
    fn from(repr: ParagraphRepr) -> Self {
        match repr {
            ParagraphRepr::Plain(text) => Paragraph::with_text(text),
            ParagraphRepr::Full {
                text,
                runs,
                style,
                overrides,
            } => {
                let mut all = Vec::with_capacity(runs.len() + 1);
                if let Some(text) = text {
                    all.push(Run::new(text));
                }
                all.extend(runs);
                Paragraph {
                    runs: all,
                    style,
                    overrides,
                }
            }
        }
    }
}

/// A heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Level 1-6; selects the default style `heading<level>`
    pub level: u8,
    /// Heading text, possibly containing placeholders
    pub text: String,
    /// Named style replacing the level default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Attribute overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<StyleDef>,
}

impl Heading {
    /// Create a heading; the level is clamped to 1-6.
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            level: level.clamp(1, 6),
            text: text.into(),
            style: None,
            overrides: None,
        }
    }

    /// Name of the style used when none is given.
    pub fn default_style(&self) -> String {
        format!("heading{}", self.level.clamp(1, 6))
    }
}

/// A list of items, fixed in the template and/or driven by data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Numbered rather than bulleted
    #[serde(default)]
    pub ordered: bool,

    /// Fixed items
    #[serde(default)]
    pub items: Vec<Paragraph>,

    /// Single token naming a sequence (or mapping) to generate items from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_from: Option<String>,

    /// Text for each generated item, with the element bound to the item alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_template: Option<String>,

    /// When `items_from` is a mapping, the keys to take in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,

    /// Item style (defaults to `bullet`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Attribute overrides for every item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<StyleDef>,
}

/// A table cell: nested content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CellRepr")]
pub struct Cell {
    /// Content nodes (usually one paragraph)
    pub content: Vec<Node>,
    /// Columns spanned
    pub colspan: u8,
    /// Rows spanned
    pub rowspan: u8,
    /// Style replacing the row default for this cell's paragraphs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Cell {
    /// A cell holding one paragraph of text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Node::Paragraph(Paragraph::with_text(text))],
            colspan: 1,
            rowspan: 1,
            style: None,
        }
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: u8) -> Self {
        self.colspan = span.max(1);
        self
    }
}

fn one() -> u8 {
    1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Plain(String),
    Full {
        #[serde(default)]
        content: Vec<Node>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default = "one")]
        colspan: u8,
        #[serde(default = "one")]
        rowspan: u8,
        #[serde(default)]
        style: Option<String>,
    },
}

impl From<CellRepr> for Cell {
    fn from(repr: CellRepr) -> Self {
        match repr {
            CellRepr::Plain(text) => Cell::text(text),
            CellRepr::Full {
                content,
                text,
                colspan,
                rowspan,
                style,
            } => {
                let mut all = Vec::with_capacity(content.len() + 1);
                if let Some(text) = text {
                    all.push(Node::Paragraph(Paragraph::with_text(text)));
                }
                all.extend(content);
                Cell {
                    content: all,
                    colspan: colspan.max(1),
                    rowspan: rowspan.max(1),
                    style,
                }
            }
        }
    }
}

/// Rows generated at assembly time, one per element of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicRows {
    /// Single token naming the sequence, e.g. `{cyc.funds}`
    pub source: String,
    /// Name the current element is bound to (defaults to the configured row alias)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Cell templates for each generated row
    pub cells: Vec<Cell>,
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Header row cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<Cell>>,

    /// Fixed body rows
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,

    /// Data-driven body rows, appended after the fixed rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<DynamicRows>,

    /// Table style name (table namespace)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Paragraph style for header cells (defaults to `table_header`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_style: Option<String>,

    /// Paragraph style for body cells (defaults to `table_cell`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_style: Option<String>,

    /// Column widths in centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<f32>>,

    /// Rotate header text; overrides the table style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_vertical: Option<bool>,
}

impl Table {
    /// Paragraph style for header cells.
    pub fn header_cell_style(&self) -> &str {
        self.header_style.as_deref().unwrap_or("table_header")
    }

    /// Paragraph style for body cells.
    pub fn body_cell_style(&self) -> &str {
        self.cell_style.as_deref().unwrap_or("table_cell")
    }

    /// Number of columns implied by the header, first row or dynamic template.
    pub fn column_count(&self) -> usize {
        let width = |cells: &[Cell]| cells.iter().map(|c| c.colspan as usize).sum();
        self.header
            .as_deref()
            .map(width)
            .or_else(|| self.rows.first().map(|r| width(r)))
            .or_else(|| self.dynamic.as_ref().map(|d| width(&d.cells)))
            .unwrap_or(0)
    }
}

/// An external image, passed through by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Opaque reference (file path, asset id) handed to the writer
    pub reference: String,
    /// Width in inches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// Height in inches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Alternative text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}
