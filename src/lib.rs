//! # docweave
//!
//! Template resolution and document assembly for Rust.
//!
//! This library merges a declarative JSON template (sections, headings,
//! paragraphs, lists, tables and images interleaved with `{source.path}`
//! placeholders) with values drawn from several named data sources, and
//! produces a fully-resolved, fully-styled document tree ready for an
//! external document writer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docweave::{load_template, render, AssembleOptions, SourceRegistry};
//!
//! fn main() -> docweave::Result<()> {
//!     let template = load_template("template.json")?;
//!     let registry = SourceRegistry::load_dir("data")?;
//!
//!     let doc = docweave::assemble(&template, &registry, &AssembleOptions::default())?;
//!     println!("{}", render::to_json(&doc, render::JsonFormat::Pretty)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Placeholders**: `{cfr.recipient.title_and_name}` with `{{`/`}}` escapes
//! - **Multiple namespaces**: each data source registered under a short name
//! - **Style inheritance**: a total `document` base with partial named overlays
//! - **Dynamic tables and lists**: rows and items generated from sequences
//! - **Visible failures**: unresolved fields become flagged markers, or abort
//! - **Parallel batches**: uses Rayon to assemble many documents at once

pub mod assemble;
pub mod data;
pub mod error;
pub mod load;
pub mod model;
pub mod placeholder;
pub mod render;
pub mod style;
pub mod template;

// Re-export commonly used types
pub use assemble::{assemble, AssembleOptions, AssemblyStats, UnresolvedPolicy};
pub use data::{resolve, ResolutionError, SourceNotFound, SourceRegistry, Value};
pub use error::{Error, Result};
pub use load::{load_source, load_template, DEFAULT_SOURCE_FILES};
pub use model::{
    AssembledDocument, Block, Diagnostic, DiagnosticKind, Metadata, Orientation, PageSetup,
    Paragraph, Table, TableCell, TableRow, TextRun,
};
pub use render::{JsonFormat, TextOptions};
pub use style::{Alignment, ResolvedStyle, StyleDef, StyleSheet, TableStyleDef};
pub use template::{PlaceholderRef, Template};

use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Assemble one document per registry, sharing a single template.
///
/// Each run is independent and reads its inputs only. With the `parallel`
/// feature and [`AssembleOptions::parallel`] set, runs execute on the Rayon
/// thread pool. Results are returned in registry order.
pub fn assemble_batch(
    template: &Template,
    registries: &[SourceRegistry],
    options: &AssembleOptions,
) -> Vec<Result<AssembledDocument>> {
    #[cfg(feature = "parallel")]
    if options.parallel {
        return registries
            .par_iter()
            .map(|registry| assemble(template, registry, options))
            .collect();
    }

    registries
        .iter()
        .map(|registry| assemble(template, registry, options))
        .collect()
}

/// Assemble a template file against the default data files in `data_dir`.
///
/// # Example
///
/// ```no_run
/// use docweave::assemble_file;
///
/// let doc = assemble_file("template.json", "data").unwrap();
/// println!("{} unresolved fields", doc.error_count());
/// ```
pub fn assemble_file<P: AsRef<Path>, D: AsRef<Path>>(
    template_path: P,
    data_dir: D,
) -> Result<AssembledDocument> {
    Docweave::new().with_data_dir(data_dir)?.assemble_file(template_path)
}

/// Assemble a template file and render the result as JSON.
///
/// # Example
///
/// ```no_run
/// use docweave::{to_json, JsonFormat};
///
/// let json = to_json("template.json", "data", JsonFormat::Pretty).unwrap();
/// std::fs::write("output.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>, D: AsRef<Path>>(
    template_path: P,
    data_dir: D,
    format: JsonFormat,
) -> Result<String> {
    let doc = assemble_file(template_path, data_dir)?;
    render::to_json(&doc, format)
}

/// Builder for assembling documents.
///
/// # Example
///
/// ```no_run
/// use docweave::{Docweave, Template};
/// use serde_json::json;
///
/// let template = Template::from_json_str(r#"{"sections": [{"children": [
///     {"type": "paragraph", "text": "Dear {cfr.recipient.title_and_name},"}
/// ]}]}"#)?;
///
/// let text = Docweave::new()
///     .with_source("cfr", json!({"recipient": {"title_and_name": "Mr J Smith"}}))
///     .strict()
///     .assemble(&template)?
///     .to_text()?;
/// # Ok::<(), docweave::Error>(())
/// ```
pub struct Docweave {
    registry: SourceRegistry,
    options: AssembleOptions,
}

impl Docweave {
    /// Create a new builder with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: SourceRegistry::new(),
            options: AssembleOptions::default(),
        }
    }

    /// Abort on the first unresolved placeholder.
    pub fn strict(mut self) -> Self {
        self.options = self.options.with_unresolved(UnresolvedPolicy::Abort);
        self
    }

    /// Disable parallel batch assembly.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.with_parallel(false);
        self
    }

    /// Register a data source.
    pub fn with_source(mut self, name: impl Into<String>, root: Value) -> Self {
        self.registry.register(name, root);
        self
    }

    /// Register the default data files found in `dir`.
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Result<Self> {
        let loaded = SourceRegistry::load_dir(dir)?;
        for name in loaded.names() {
            if let Ok(root) = loaded.lookup(name) {
                self.registry.register(name, root.clone());
            }
        }
        Ok(self)
    }

    /// Replace the whole registry.
    pub fn with_registry(mut self, registry: SourceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the assemble options.
    pub fn with_options(mut self, options: AssembleOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the dynamic row alias.
    pub fn with_row_alias(mut self, alias: impl Into<String>) -> Self {
        self.options = self.options.with_row_alias(alias);
        self
    }

    /// The registry that will be used.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Assemble a template.
    pub fn assemble(&self, template: &Template) -> Result<DocweaveResult> {
        let document = assemble(template, &self.registry, &self.options)?;
        Ok(DocweaveResult { document })
    }

    /// Load and assemble a template file.
    pub fn assemble_file<P: AsRef<Path>>(&self, path: P) -> Result<AssembledDocument> {
        let template = load_template(path)?;
        assemble(&template, &self.registry, &self.options)
    }
}

impl Default for Docweave {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of assembling a template.
pub struct DocweaveResult {
    /// The assembled document
    pub document: AssembledDocument,
}

impl DocweaveResult {
    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &TextOptions::default())
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text without headings or banners.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &AssembledDocument {
        &self.document
    }

    /// Take the document.
    pub fn into_document(self) -> AssembledDocument {
        self.document
    }
}
