//! Plain text preview of assembled documents.

use crate::error::Result;
use crate::model::{AssembledDocument, Block, Orientation, Paragraph, Section, Table};

/// Options for the plain text preview.
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Marker placed before unordered list items
    pub list_marker: char,

    /// Print a banner line when a section changes orientation
    pub section_banners: bool,

    /// Print the title at the top
    pub include_title: bool,
}

impl TextOptions {
    /// Create new text options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Enable or disable orientation banners.
    pub fn with_section_banners(mut self, banners: bool) -> Self {
        self.section_banners = banners;
        self
    }

    /// Enable or disable the title line.
    pub fn with_title(mut self, include: bool) -> Self {
        self.include_title = include;
        self
    }
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            list_marker: '•',
            section_banners: true,
            include_title: true,
        }
    }
}

/// Convert a document to a plain text preview.
pub fn to_text(doc: &AssembledDocument, options: &TextOptions) -> Result<String> {
    let mut output = String::new();

    if options.include_title {
        if let Some(ref title) = doc.metadata.title {
            output.push_str(title);
            output.push('\n');
            output.push_str(&"=".repeat(title.chars().count()));
            output.push_str("\n\n");
        }
    }

    let mut orientation = None;
    for section in &doc.sections {
        render_section(&mut output, section, &mut orientation, options);
    }

    Ok(output.trim().to_string())
}

fn render_section(
    output: &mut String,
    section: &Section,
    current: &mut Option<Orientation>,
    options: &TextOptions,
) {
    if options.section_banners && *current != Some(section.orientation) {
        let name = match section.orientation {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        };
        output.push_str(&format!("[{}]\n\n", name));
    }
    *current = Some(section.orientation);

    for block in &section.blocks {
        render_block(output, block, current, options);
    }
}

fn render_block(
    output: &mut String,
    block: &Block,
    orientation: &mut Option<Orientation>,
    options: &TextOptions,
) {
    match block {
        Block::Section(section) => render_section(output, section, orientation, options),
        Block::Paragraph(p) => push_paragraph(output, p),
        Block::Heading { level, paragraph } => {
            let text = paragraph.plain_text();
            output.push_str(&text);
            output.push('\n');
            let underline = if *level == 1 { '=' } else { '-' };
            output.push_str(&underline.to_string().repeat(text.chars().count()));
            output.push_str("\n\n");
        }
        Block::List { ordered, items } => {
            for (i, item) in items.iter().enumerate() {
                if *ordered {
                    output.push_str(&format!("{}. ", i + 1));
                } else {
                    output.push(options.list_marker);
                    output.push(' ');
                }
                output.push_str(&item.plain_text());
                output.push('\n');
            }
            output.push('\n');
        }
        Block::Table(table) => push_table(output, table),
        Block::Image { reference, alt, .. } => {
            let label = alt.as_deref().unwrap_or(reference);
            output.push_str(&format!("[image: {}]\n\n", label));
        }
        Block::PageBreak => output.push_str("\u{000C}\n"),
    }
}

fn push_paragraph(output: &mut String, p: &Paragraph) {
    output.push_str(&p.plain_text());
    output.push_str("\n\n");
}

fn push_table(output: &mut String, table: &Table) {
    for (i, row) in table.rows.iter().enumerate() {
        output.push_str(&row.plain_text());
        output.push('\n');
        if i + 1 == table.header_rows {
            output.push_str(&"-".repeat(row.plain_text().chars().count().max(3)));
            output.push('\n');
        }
    }
    output.push('\n');
}
