//! Document assembly.
//!
//! [`assemble`] walks a [`Template`] depth-first, substitutes every
//! placeholder from a [`SourceRegistry`], attaches fully-inherited styles and
//! emits an [`AssembledDocument`] with the same shape as the template.
//! Tables with `dynamic` rows and lists with `items_from` are the only places
//! where the output shape depends on data.

mod options;
mod scope;
mod stats;

pub use options::{AssembleOptions, UnresolvedPolicy};
pub use scope::Scope;
pub use stats::AssemblyStats;

use crate::data::{self, value_kind, SourceRegistry, Value};
use crate::error::{Error, Result};
use crate::model::{
    self, AssembledDocument, Block, Diagnostic, DiagnosticKind, Metadata, Orientation, PageSetup,
    TableCell, TableRow, TextRun,
};
use crate::placeholder::{self, Segment, Token};
use crate::style::{ResolvedStyle, StyleDef, StyleSheet, BASE_STYLE};
use crate::template::{self, Cell, DynamicRows, Node, StyleFrame, Template};

/// Assemble `template` against the sources in `registry`.
///
/// The template is validated first, so a malformed placeholder anywhere
/// aborts before any output is produced. Unresolved placeholders follow
/// [`AssembleOptions::unresolved`].
pub fn assemble(
    template: &Template,
    registry: &SourceRegistry,
    options: &AssembleOptions,
) -> Result<AssembledDocument> {
    template.validate()?;
    let sheet = template.stylesheet()?;

    let mut assembler = Assembler::new(&sheet, registry, options);
    let mut document = AssembledDocument::new(Metadata {
        title: template.metadata.title.clone(),
        page_numbers: template.metadata.page_numbers,
        generated_at: None,
    });

    for (i, section) in template.sections.iter().enumerate() {
        let location = format!("sections[{}]", i);
        let section = assembler.section(section, Orientation::default(), &location)?;
        document.sections.push(section);
    }

    log::debug!(
        "Assembled {} sections ({} placeholders resolved, {} unresolved)",
        document.sections.len(),
        assembler.stats.resolved_count,
        assembler.stats.unresolved_count
    );

    document.diagnostics = assembler.diagnostics;
    document.stats = assembler.stats;
    Ok(document)
}

struct Assembler<'a> {
    sheet: &'a StyleSheet,
    registry: &'a SourceRegistry,
    options: &'a AssembleOptions,
    scope: Scope<'a>,
    orientation: Orientation,
    diagnostics: Vec<Diagnostic>,
    stats: AssemblyStats,
}

impl<'a> Assembler<'a> {
    fn new(sheet: &'a StyleSheet, registry: &'a SourceRegistry, options: &'a AssembleOptions) -> Self {
        Self {
            sheet,
            registry,
            options,
            scope: Scope::new(),
            orientation: Orientation::default(),
            diagnostics: Vec::new(),
            stats: AssemblyStats::new(),
        }
    }

    fn section(
        &mut self,
        section: &'a template::Section,
        parent: Orientation,
        location: &str,
    ) -> Result<model::Section> {
        let orientation = section.orientation.unwrap_or(parent);
        let page = match section.page {
            Some(ref settings) => settings.resolve(orientation),
            None => PageSetup::for_orientation(orientation),
        };
        let mut out = model::Section::new(orientation, page);

        let outer = std::mem::replace(&mut self.orientation, orientation);
        self.scope.push_style(StyleFrame::section(section));
        let blocks = self.nodes(&section.children, &format!("{}.children", location));
        self.scope.pop_style();
        self.orientation = outer;

        out.blocks = blocks?;
        self.stats.add_section();
        Ok(out)
    }

    fn nodes(&mut self, nodes: &'a [Node], prefix: &str) -> Result<Vec<Block>> {
        nodes
            .iter()
            .enumerate()
            .map(|(i, node)| self.node(node, &format!("{}[{}]", prefix, i)))
            .collect()
    }

    fn node(&mut self, node: &'a Node, location: &str) -> Result<Block> {
        Ok(match node {
            Node::Section(section) => {
                Block::Section(self.section(section, self.orientation, location)?)
            }
            Node::Paragraph(p) => {
                let paragraph = self.paragraph(p, None, location)?;
                self.stats.add_paragraph();
                Block::Paragraph(paragraph)
            }
            Node::Heading(heading) => {
                let default = heading.default_style();
                let name = heading.style.as_deref().unwrap_or(&default);
                let style = self.style_for(name, &[heading.overrides.as_ref()], location);
                let mut paragraph = model::Paragraph::new(style);
                paragraph.runs = self.runs(&heading.text, None, &format!("{}.text", location))?;
                self.stats.add_heading();
                Block::Heading {
                    level: heading.level,
                    paragraph,
                }
            }
            Node::List(list) => self.list(list, location)?,
            Node::Table(table) => self.table(table, location)?,
            Node::Image(image) => {
                self.stats.add_image();
                Block::Image {
                    reference: image.reference.clone(),
                    width: image.width,
                    height: image.height,
                    alt: image.alt.clone(),
                }
            }
            Node::PageBreak => Block::PageBreak,
        })
    }

    /// Resolve a paragraph; `default_name` is the role style used when the
    /// paragraph names none, ahead of the inherited context style.
    fn paragraph(
        &mut self,
        p: &'a template::Paragraph,
        default_name: Option<&'a str>,
        location: &str,
    ) -> Result<model::Paragraph> {
        let name = p
            .style
            .as_deref()
            .or(default_name)
            .or(self.scope.styles().style_name())
            .unwrap_or(BASE_STYLE);
        let style = self.style_for(name, &[p.overrides.as_ref()], location);
        let mut out = model::Paragraph::new(style);

        for (i, run) in p.runs.iter().enumerate() {
            let run_location = format!("{}.runs[{}]", location, i);
            let run_style = if run.style.is_some() || run.overrides.is_some() {
                let run_name = run.style.as_deref().unwrap_or(name);
                let own = [p.overrides.as_ref(), run.overrides.as_ref()];
                Some(self.style_for(run_name, &own, &run_location))
            } else {
                None
            };
            out.runs
                .extend(self.runs(&run.text, run_style, &run_location)?);
        }

        Ok(out)
    }

    fn list(&mut self, list: &'a template::List, location: &str) -> Result<Block> {
        let role = list.style.as_deref().unwrap_or("bullet");

        self.scope.push_style(StyleFrame::list(list));
        let items = self.list_items(list, role, location);
        self.scope.pop_style();

        let items = items?;
        self.stats.add_list(items.len());
        Ok(Block::List {
            ordered: list.ordered,
            items,
        })
    }

    fn list_items(
        &mut self,
        list: &'a template::List,
        role: &'a str,
        location: &str,
    ) -> Result<Vec<model::Paragraph>> {
        let mut items = Vec::with_capacity(list.items.len());
        for (i, item) in list.items.iter().enumerate() {
            let item_location = format!("{}.items[{}]", location, i);
            items.push(self.paragraph(item, Some(role), &item_location)?);
        }

        let source = match list.items_from {
            Some(ref source) => source.as_str(),
            None => return Ok(items),
        };

        let source_location = format!("{}.items_from", location);
        let token = expect_token(source, &source_location)?;
        let style = self.style_for(role, &[], &source_location);

        let value = match self.lookup(&token) {
            Ok(value) => value,
            Err(err) => {
                let marker = self.recover(err, token.reference(), &source_location)?;
                let mut item = model::Paragraph::new(style);
                item.add_run(marker);
                items.push(item);
                return Ok(items);
            }
        };

        let elements: Vec<&'a Value> = match value {
            Value::Array(elements) => elements.iter().collect(),
            Value::Object(map) => match list.keys {
                Some(ref keys) => keys
                    .iter()
                    .filter_map(|key| {
                        let entry = map.get(key);
                        if entry.is_none() {
                            log::debug!("Key '{}' not present in {}, skipped", key, token.raw);
                        }
                        entry
                    })
                    .collect(),
                None => map.values().collect(),
            },
            other => {
                return Err(Error::AssemblyAbort {
                    location: source_location,
                    reason: format!(
                        "{} resolved to a {}, expected a sequence or mapping",
                        token.raw,
                        value_kind(other)
                    ),
                })
            }
        };

        let options = self.options;
        let alias = options.item_alias.as_str();
        let generated = elements.len();

        for (e, element) in elements.into_iter().enumerate() {
            let item_location = format!("{}[{}]", source_location, e);
            let runs = match (element, list.item_template.as_deref()) {
                (_, Some(text)) => {
                    self.scope.bind(alias, element, self.registry);
                    let runs = self.runs(text, None, &item_location);
                    self.scope.unbind();
                    runs?
                }
                (Value::Object(_) | Value::Array(_), None) => {
                    let err = Error::NonScalarResolution {
                        token: token.raw.to_string(),
                        kind: value_kind(element),
                    };
                    vec![self.recover(err, token.reference(), &item_location)?]
                }
                (scalar, _) => vec![TextRun::new(scalar_text(scalar))],
            };

            let mut item = model::Paragraph::new(style.clone());
            item.runs = runs;
            items.push(item);
        }

        log::debug!("Generated {} list items from {}", generated, token.raw);
        Ok(items)
    }

    fn table(&mut self, table: &'a template::Table, location: &str) -> Result<Block> {
        let (mut style, fallback) = self.sheet.resolve_table_style(table.style.as_deref());
        if let Some(fallback) = fallback {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::StyleFallback,
                location,
                fallback.to_string(),
            ));
        }
        if let Some(vertical) = table.header_vertical {
            style.header_vertical_text = vertical;
        }

        let mut out = model::Table::new(style);
        out.column_widths = table.column_widths.clone();

        if let Some(ref header) = table.header {
            let prefix = format!("{}.header", location);
            let cells = self.cells(header, table.header_cell_style(), &prefix)?;
            out.add_row(TableRow::header(cells));
            self.stats.add_row(false);
        }

        for (r, row) in table.rows.iter().enumerate() {
            let prefix = format!("{}.rows[{}]", location, r);
            let cells = self.cells(row, table.body_cell_style(), &prefix)?;
            out.add_row(TableRow::new(cells));
            self.stats.add_row(false);
        }

        if let Some(ref dynamic) = table.dynamic {
            self.dynamic_rows(table, dynamic, location, &mut out)?;
        }

        self.stats.add_table();
        Ok(Block::Table(out))
    }

    /// Materialize one row per element of the sequence named by `dynamic.source`.
    fn dynamic_rows(
        &mut self,
        table: &'a template::Table,
        dynamic: &'a DynamicRows,
        location: &str,
        out: &mut model::Table,
    ) -> Result<()> {
        let source_location = format!("{}.dynamic.source", location);
        let token = expect_token(&dynamic.source, &source_location)?;

        let value = match self.lookup(&token) {
            Ok(value) => value,
            Err(err) => {
                let marker = self.recover(err, token.reference(), &source_location)?;
                let style = self.style_for(table.body_cell_style(), &[], &source_location);
                let mut paragraph = model::Paragraph::new(style);
                paragraph.add_run(marker);

                let span = u8::try_from(table.column_count()).unwrap_or(u8::MAX).max(1);
                let cell = TableCell::new(vec![Block::Paragraph(paragraph)]).colspan(span);
                out.add_row(TableRow::new(vec![cell]));
                self.stats.add_row(false);
                return Ok(());
            }
        };

        let elements = value.as_array().ok_or_else(|| Error::AssemblyAbort {
            location: source_location.clone(),
            reason: format!(
                "{} resolved to a {}, expected a sequence",
                token.raw,
                value_kind(value)
            ),
        })?;

        let options = self.options;
        let alias = dynamic.alias.as_deref().unwrap_or(options.row_alias.as_str());

        for (r, element) in elements.iter().enumerate() {
            let prefix = format!("{}.dynamic[{}].cells", location, r);
            self.scope.bind(alias, element, self.registry);
            let cells = self.cells(&dynamic.cells, table.body_cell_style(), &prefix);
            self.scope.unbind();

            out.add_row(TableRow::generated(cells?));
            self.stats.add_row(true);
        }

        log::debug!("Generated {} rows from {}", elements.len(), token.raw);
        Ok(())
    }

    fn cells(&mut self, cells: &'a [Cell], role: &'a str, prefix: &str) -> Result<Vec<TableCell>> {
        let mut out = Vec::with_capacity(cells.len());
        for (c, cell) in cells.iter().enumerate() {
            self.scope.push_style(StyleFrame::cell(cell, role));
            let content = self.nodes(&cell.content, &format!("{}[{}].content", prefix, c));
            self.scope.pop_style();

            out.push(
                TableCell::new(content?)
                    .colspan(cell.colspan)
                    .rowspan(cell.rowspan),
            );
        }
        Ok(out)
    }

    /// Scan `text` and substitute every token.
    ///
    /// Literal text and resolved values merge into one run; each failed
    /// token becomes its own flagged marker run.
    fn runs(
        &mut self,
        text: &str,
        style: Option<ResolvedStyle>,
        location: &str,
    ) -> Result<Vec<TextRun>> {
        let mut runs = Vec::new();
        let mut buffer = String::new();

        for segment in placeholder::scan(text) {
            match segment? {
                Segment::Literal(literal) => buffer.push_str(&literal),
                Segment::Token(token) => match self.scalar(&token) {
                    Ok(value) => {
                        self.stats.add_placeholder(true);
                        buffer.push_str(&value);
                    }
                    Err(err) => {
                        let mut marker = self.recover(err, token.reference(), location)?;
                        marker.style = style.clone();
                        if !buffer.is_empty() {
                            runs.push(styled_run(std::mem::take(&mut buffer), &style));
                        }
                        runs.push(marker);
                    }
                },
            }
        }

        if !buffer.is_empty() {
            runs.push(styled_run(buffer, &style));
        }
        Ok(runs)
    }

    fn lookup(&self, token: &Token<'_>) -> Result<&'a Value> {
        if token.is_bare() {
            return self.scope.bound(token.source).ok_or_else(|| token.bare_error());
        }
        let root = self
            .scope
            .lookup(token.source, self.registry)
            .map_err(|_| Error::UnknownSource {
                source_name: token.source.to_string(),
                token: token.raw.to_string(),
            })?;
        data::resolve(root, &token.path).map_err(|error| Error::PathResolution {
            token: token.raw.to_string(),
            error,
        })
    }

    fn scalar(&self, token: &Token<'_>) -> Result<String> {
        match self.lookup(token)? {
            value @ (Value::Object(_) | Value::Array(_)) => Err(Error::NonScalarResolution {
                token: token.raw.to_string(),
                kind: value_kind(value),
            }),
            scalar => Ok(scalar_text(scalar)),
        }
    }

    /// Turn a recoverable resolution error into a marker run, or propagate it.
    fn recover(&mut self, err: Error, reference: &str, location: &str) -> Result<TextRun> {
        if self.options.is_strict() {
            return Err(err);
        }
        let kind = match err {
            Error::UnknownSource { .. } => DiagnosticKind::UnknownSource,
            Error::PathResolution { .. } => DiagnosticKind::PathResolution,
            Error::NonScalarResolution { .. } => DiagnosticKind::NonScalarResolution,
            other => return Err(other),
        };

        log::warn!("{} at {}", err, location);
        self.stats.add_placeholder(false);
        self.diagnostics
            .push(Diagnostic::new(kind, location, err.to_string()));
        Ok(TextRun::marker(kind, reference))
    }

    /// Resolve `name` under the current context, then apply `own` overrides.
    fn style_for(
        &mut self,
        name: &str,
        own: &[Option<&StyleDef>],
        location: &str,
    ) -> ResolvedStyle {
        let mut overlays: Vec<&StyleDef> = self.scope.styles().overrides().collect();
        overlays.extend(own.iter().flatten().copied());

        let (style, fallback) = self.sheet.resolve_with(name, &overlays);
        if let Some(fallback) = fallback {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::StyleFallback,
                location,
                fallback.to_string(),
            ));
        }
        style
    }
}

fn expect_token<'t>(text: &'t str, location: &str) -> Result<Token<'t>> {
    placeholder::single_token(text)?.ok_or_else(|| Error::AssemblyAbort {
        location: location.to_string(),
        reason: format!("'{}' must be a single placeholder token", text),
    })
}

fn styled_run(text: String, style: &Option<ResolvedStyle>) -> TextRun {
    TextRun {
        text,
        style: style.clone(),
        error: None,
    }
}

/// Literal rendering of a scalar; null renders as empty text.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(children: serde_json::Value) -> Template {
        Template::from_value(json!({"sections": [{"children": children}]})).unwrap()
    }

    fn first_paragraph(doc: &AssembledDocument) -> &model::Paragraph {
        doc.paragraphs()[0]
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!(null)), "");
        assert_eq!(scalar_text(&json!("Mr J Smith")), "Mr J Smith");
        assert_eq!(scalar_text(&json!(1500)), "1500");
        assert_eq!(scalar_text(&json!(2.5)), "2.5");
        assert_eq!(scalar_text(&json!(true)), "true");
    }

    #[test]
    fn test_substitution_merges_into_one_run() {
        let registry = SourceRegistry::new()
            .with_source("cfr", json!({"recipient": {"title_and_name": "Mr J Smith"}}));
        let doc = assemble(
            &template(json!([{"type": "paragraph", "text": "Dear {cfr.recipient.title_and_name},"}])),
            &registry,
            &AssembleOptions::default(),
        )
        .unwrap();

        let p = first_paragraph(&doc);
        assert_eq!(p.runs.len(), 1);
        assert_eq!(p.plain_text(), "Dear Mr J Smith,");
        assert_eq!(doc.stats.resolved_count, 1);
    }

    #[test]
    fn test_failed_token_splits_runs() {
        let registry = SourceRegistry::new().with_source("user_input", json!({}));
        let doc = assemble(
            &template(json!([{"type": "paragraph", "text": "Date: {user_input.letter_details.date}."}])),
            &registry,
            &AssembleOptions::default(),
        )
        .unwrap();

        let p = first_paragraph(&doc);
        assert_eq!(p.runs.len(), 3);
        assert_eq!(p.runs[0].text, "Date: ");
        assert_eq!(p.runs[1].error, Some(DiagnosticKind::PathResolution));
        assert_eq!(p.runs[2].text, ".");
        assert_eq!(doc.diagnostics[0].location, "sections[0].children[0].runs[0]");
    }

    #[test]
    fn test_context_style_applies_to_paragraphs_only() {
        let doc = assemble(
            &Template::from_value(json!({"sections": [{"style": "footnote", "children": [
                {"type": "paragraph", "text": "small"},
                {"type": "heading", "level": 1, "text": "big"}
            ]}]}))
            .unwrap(),
            &SourceRegistry::new(),
            &AssembleOptions::default(),
        )
        .unwrap();

        let sheet = StyleSheet::builtin();
        let paragraphs = doc.paragraphs();
        assert_eq!(paragraphs[0].style, sheet.resolve_style("footnote").0);
        assert_eq!(paragraphs[1].style, sheet.resolve_style("heading1").0);
    }

    #[test]
    fn test_run_overrides() {
        let doc = assemble(
            &template(json!([{"type": "paragraph", "runs": [
                "plain ",
                {"text": "bold", "overrides": {"bold": true}}
            ]}])),
            &SourceRegistry::new(),
            &AssembleOptions::default(),
        )
        .unwrap();

        let p = first_paragraph(&doc);
        assert!(p.runs[0].style.is_none());
        let bold = p.runs[1].style.as_ref().unwrap();
        assert!(bold.bold);
        assert!(!p.style.bold);
    }
}
