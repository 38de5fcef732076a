//! Depth-first traversal of the template tree.

use super::node::{Cell, List, Node, Section};
use crate::style::StyleDef;

/// One level of inherited styling.
///
/// Both [`Walk`] and the assembler open frames through these constructors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StyleFrame<'t> {
    /// Named style set at this level
    pub style: Option<&'t str>,
    /// Attribute overrides set at this level
    pub overrides: Option<&'t StyleDef>,
}

impl<'t> StyleFrame<'t> {
    /// Frame opened by a section.
    pub fn section(section: &'t Section) -> Self {
        Self {
            style: section.style.as_deref(),
            overrides: section.overrides.as_ref(),
        }
    }

    /// Frame opened by a list; items keep their role style.
    pub fn list(list: &'t List) -> Self {
        Self {
            style: None,
            overrides: list.overrides.as_ref(),
        }
    }

    /// Frame opened by a table cell: its own style, else the row role.
    pub fn cell(cell: &'t Cell, role: &'t str) -> Self {
        Self {
            style: Some(cell.style.as_deref().unwrap_or(role)),
            overrides: None,
        }
    }
}

/// The chain of style frames from the outermost section inwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleContext<'t> {
    frames: Vec<StyleFrame<'t>>,
}

impl<'t> StyleContext<'t> {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a styled scope.
    pub fn push(&mut self, frame: StyleFrame<'t>) {
        self.frames.push(frame);
    }

    /// Leave the innermost scope.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Number of frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The innermost named style, if any frame sets one.
    pub fn style_name(&self) -> Option<&'t str> {
        self.frames.iter().rev().find_map(|frame| frame.style)
    }

    /// Overrides from outermost to innermost.
    pub fn overrides(&self) -> impl Iterator<Item = &'t StyleDef> + '_ {
        self.frames.iter().filter_map(|frame| frame.overrides)
    }
}

/// A node reached during traversal.
#[derive(Debug, Clone)]
pub struct Visit<'t> {
    /// The node itself
    pub node: &'t Node,
    /// Location path, e.g. `sections[0].children[2].rows[1][0].content[0]`
    pub location: String,
    /// Nesting depth; top-level section children are depth 0
    pub depth: usize,
    /// Styling inherited from enclosing sections and table cells
    pub context: StyleContext<'t>,
    /// Inside dynamic row cells, where a bare `{alias}` names the element
    pub bound: bool,
}

/// Depth-first, document-order iterator over every node in a set of sections,
/// including nested sections and table cell content.
pub struct Walk<'t> {
    pending: Vec<Visit<'t>>,
}

impl<'t> Walk<'t> {
    pub(crate) fn new(sections: &'t [Section]) -> Self {
        let mut walk = Self {
            pending: Vec::new(),
        };
        for (s, section) in sections.iter().enumerate().rev() {
            let mut context = StyleContext::new();
            context.push(StyleFrame::section(section));
            let prefix = format!("sections[{}]", s);
            walk.push_nodes(&prefix, "children", &section.children, 0, &context, false);
        }
        walk
    }

    fn push_nodes(
        &mut self,
        prefix: &str,
        field: &str,
        nodes: &'t [Node],
        depth: usize,
        context: &StyleContext<'t>,
        bound: bool,
    ) {
        // Reversed so the stack yields document order.
        for (i, node) in nodes.iter().enumerate().rev() {
            self.pending.push(Visit {
                node,
                location: format!("{}.{}[{}]", prefix, field, i),
                depth,
                context: context.clone(),
                bound,
            });
        }
    }

    fn push_cells(
        &mut self,
        prefix: &str,
        cells: &'t [Cell],
        role_style: &'t str,
        depth: usize,
        context: &StyleContext<'t>,
        bound: bool,
    ) {
        for (c, cell) in cells.iter().enumerate().rev() {
            let mut inner = context.clone();
            inner.push(StyleFrame::cell(cell, role_style));
            let cell_prefix = format!("{}[{}]", prefix, c);
            self.push_nodes(&cell_prefix, "content", &cell.content, depth, &inner, bound);
        }
    }
}

impl<'t> Iterator for Walk<'t> {
    type Item = Visit<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.pending.pop()?;
        let depth = visit.depth + 1;
        let location = visit.location.as_str();
        let bound = visit.bound;

        match visit.node {
            Node::Section(section) => {
                let mut inner = visit.context.clone();
                inner.push(StyleFrame::section(section));
                self.push_nodes(location, "children", &section.children, depth, &inner, bound);
            }
            Node::Table(table) => {
                let context = &visit.context;
                if let Some(ref dynamic) = table.dynamic {
                    let prefix = format!("{}.dynamic.cells", location);
                    let role = table.body_cell_style();
                    self.push_cells(&prefix, &dynamic.cells, role, depth, context, true);
                }
                for (r, row) in table.rows.iter().enumerate().rev() {
                    let prefix = format!("{}.rows[{}]", location, r);
                    let role = table.body_cell_style();
                    self.push_cells(&prefix, row, role, depth, context, bound);
                }
                if let Some(ref header) = table.header {
                    let prefix = format!("{}.header", location);
                    let role = table.header_cell_style();
                    self.push_cells(&prefix, header, role, depth, context, bound);
                }
            }
            _ => {}
        }

        Some(visit)
    }
}
