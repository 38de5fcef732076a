//! Section and block types.

use serde::{Deserialize, Serialize};

use super::{Paragraph, Table};

/// Page orientation of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide
    #[default]
    #[serde(alias = "PORTRAIT")]
    Portrait,
    /// Wider than tall
    #[serde(alias = "LANDSCAPE")]
    Landscape,
}

/// Physical page setup of a section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    /// Page width in inches
    pub width: f32,
    /// Page height in inches
    pub height: f32,
    /// Top margin in centimetres
    pub top_margin: f32,
    /// Bottom margin in centimetres
    pub bottom_margin: f32,
    /// Left margin in centimetres
    pub left_margin: f32,
    /// Right margin in centimetres
    pub right_margin: f32,
}

impl PageSetup {
    /// A4 portrait with 2.54cm margins.
    pub fn a4_portrait() -> Self {
        Self {
            width: 8.27,
            height: 11.69,
            top_margin: 2.54,
            bottom_margin: 2.54,
            left_margin: 2.54,
            right_margin: 2.54,
        }
    }

    /// A4 landscape with wide side margins for illustration tables.
    pub fn a4_landscape() -> Self {
        Self {
            width: 11.69,
            height: 8.27,
            top_margin: 2.54,
            bottom_margin: 1.27,
            left_margin: 5.0,
            right_margin: 5.0,
        }
    }

    /// Default setup for an orientation.
    pub fn for_orientation(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => Self::a4_portrait(),
            Orientation::Landscape => Self::a4_landscape(),
        }
    }

    /// Check if the page is wider than tall.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4_portrait()
    }
}

/// A resolved section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Page orientation, carried through from the template
    pub orientation: Orientation,

    /// Page size and margins
    pub page: PageSetup,

    /// Content blocks in order
    pub blocks: Vec<Block>,
}

impl Section {
    /// Create an empty section.
    pub fn new(orientation: Orientation, page: PageSetup) -> Self {
        Self {
            orientation,
            page,
            blocks: Vec::new(),
        }
    }

    /// Add a block.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the section has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the section.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A resolved content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A nested section
    Section(Section),

    /// A paragraph of text
    Paragraph(Paragraph),

    /// A heading
    Heading {
        /// Heading level (1-6)
        level: u8,
        /// Heading content
        paragraph: Paragraph,
    },

    /// A list
    List {
        /// Numbered rather than bulleted
        ordered: bool,
        /// List items
        items: Vec<Paragraph>,
    },

    /// A table
    Table(Table),

    /// An image reference, passed through untouched
    Image {
        /// Opaque reference handed to the writer
        reference: String,
        /// Width in inches
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f32>,
        /// Height in inches
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f32>,
        /// Alternative text
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },

    /// A page break marker
    PageBreak,
}

impl Block {
    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Section(s) => s.plain_text(),
            Block::Paragraph(p) => p.plain_text(),
            Block::Heading { paragraph, .. } => paragraph.plain_text(),
            Block::List { items, .. } => items
                .iter()
                .map(|p| p.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Table(t) => t.plain_text(),
            Block::Image { alt, .. } => alt.clone().unwrap_or_default(),
            Block::PageBreak => String::new(),
        }
    }

    /// Paragraphs directly held by this block and its descendants, in order.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        collect_paragraphs(self, &mut out);
        out
    }
}

fn collect_paragraphs<'a>(block: &'a Block, out: &mut Vec<&'a Paragraph>) {
    match block {
        Block::Section(s) => s.blocks.iter().for_each(|b| collect_paragraphs(b, out)),
        Block::Paragraph(p) => out.push(p),
        Block::Heading { paragraph, .. } => out.push(paragraph),
        Block::List { items, .. } => out.extend(items.iter()),
        Block::Table(t) => t
            .rows
            .iter()
            .flat_map(|r| &r.cells)
            .flat_map(|c| &c.content)
            .for_each(|b| collect_paragraphs(b, out)),
        Block::Image { .. } | Block::PageBreak => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_setup_defaults() {
        let portrait = PageSetup::for_orientation(Orientation::Portrait);
        assert!(!portrait.is_landscape());
        assert_eq!(portrait.left_margin, 2.54);

        let landscape = PageSetup::for_orientation(Orientation::Landscape);
        assert!(landscape.is_landscape());
        assert_eq!(landscape.bottom_margin, 1.27);
        assert_eq!(landscape.left_margin, 5.0);
    }

    #[test]
    fn test_orientation_serde() {
        let o: Orientation = serde_json::from_str("\"LANDSCAPE\"").unwrap();
        assert_eq!(o, Orientation::Landscape);
        assert_eq!(serde_json::to_string(&Orientation::Portrait).unwrap(), "\"portrait\"");
    }

    #[test]
    fn test_image_plain_text_is_alt() {
        let block = Block::Image {
            reference: "cover.png".into(),
            width: Some(8.27),
            height: None,
            alt: Some("Cover".into()),
        };
        assert_eq!(block.plain_text(), "Cover");
        assert!(block.paragraphs().is_empty());
    }
}
