//! docweave CLI - template-driven document assembly tool

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docweave::{
    assemble, assemble_batch, load_source, load_template, render, AssembleOptions,
    AssembledDocument, DiagnosticKind, JsonFormat, SourceRegistry, Template, TextOptions,
    UnresolvedPolicy,
};

#[derive(Parser)]
#[command(name = "docweave")]
#[command(version)]
#[command(about = "Assemble styled documents from JSON templates and data sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a template against data sources
    Assemble {
        /// Template JSON file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        #[command(flatten)]
        data: DataArgs,

        /// Abort on the first unresolved placeholder
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Write a timestamped file into this directory
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Validate a template and report unresolvable placeholders
    Check {
        /// Template JSON file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Assemble one document per data directory
    Batch {
        /// Template JSON file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Data directories, one document each
        #[arg(value_name = "DATA_DIR", required = true)]
        data_dirs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output: PathBuf,

        /// Abort a document on its first unresolved placeholder
        #[arg(long)]
        strict: bool,

        /// Assemble one document at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct DataArgs {
    /// Directory holding the default data files
    #[arg(short, long, value_name = "DIR", env = "DOCWEAVE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Extra data source as NAME=PATH (repeatable)
    #[arg(short, long = "source", value_name = "NAME=PATH", value_parser = parse_source)]
    sources: Vec<(String, PathBuf)>,
}

impl DataArgs {
    fn registry(&self) -> Result<SourceRegistry, Box<dyn std::error::Error>> {
        let mut registry = match self.data_dir {
            Some(ref dir) => SourceRegistry::load_dir(dir)?,
            None => SourceRegistry::new(),
        };
        for (name, path) in &self.sources {
            log::debug!("Registering source '{}' from {}", name, path.display());
            registry.register(name.clone(), load_source(path)?);
        }
        Ok(registry)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Resolved document tree as JSON
    Json,
    /// Plain text preview
    Text,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Text => "txt",
        }
    }
}

fn parse_source(arg: &str) -> Result<(String, PathBuf), String> {
    match arg.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got '{}'", arg)),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Assemble {
            template,
            data,
            strict,
            format,
            compact,
            output,
            output_dir,
        }) => cmd_assemble(
            &template,
            &data,
            strict,
            format,
            compact,
            output.as_deref(),
            output_dir.as_deref(),
        ),
        Some(Commands::Check { template, data }) => cmd_check(&template, &data),
        Some(Commands::Batch {
            template,
            data_dirs,
            output,
            strict,
            sequential,
        }) => cmd_batch(&template, &data_dirs, &output, strict, sequential),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: docweave assemble <TEMPLATE> --data-dir <DIR>".yellow());
            println!("       docweave --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn options(strict: bool) -> AssembleOptions {
    let policy = if strict {
        UnresolvedPolicy::Abort
    } else {
        UnresolvedPolicy::Inline
    };
    AssembleOptions::new().with_unresolved(policy)
}

fn render_doc(
    doc: &AssembledDocument,
    format: Format,
    compact: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        Format::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(doc, json_format)?
        }
        Format::Text => render::to_text(doc, &TextOptions::default())?,
    })
}

/// `<stem>_YYYYMMDD_HHMMSS.<ext>` in local time.
fn timestamped_name(stem: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        stem,
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn print_summary(doc: &AssembledDocument) {
    let unresolved = doc.stats.unresolved_count;
    let fallbacks = doc.diagnostics_of(DiagnosticKind::StyleFallback).count();

    if unresolved > 0 {
        eprintln!(
            "{} {} unresolved placeholder(s)",
            "Warning:".yellow().bold(),
            unresolved
        );
    }
    if fallbacks > 0 {
        eprintln!(
            "{} {} unknown style name(s), base style used",
            "Warning:".yellow().bold(),
            fallbacks
        );
    }
}

fn cmd_assemble(
    template_path: &Path,
    data: &DataArgs,
    strict: bool,
    format: Format,
    compact: bool,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = load_template(template_path)?;
    let registry = data.registry()?;

    let doc = assemble(&template, &registry, &options(strict))?.with_generated_at(Utc::now());
    let content = render_doc(&doc, format, compact)?;

    let target = match (output, output_dir) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(dir)) => {
            fs::create_dir_all(dir)?;
            let name = timestamped_name(&file_stem(template_path), format.extension());
            Some(dir.join(name))
        }
        (None, None) => None,
    };

    if let Some(path) = target {
        fs::write(&path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    print_summary(&doc);
    Ok(())
}

fn cmd_check(template_path: &Path, data: &DataArgs) -> Result<(), Box<dyn std::error::Error>> {
    let template = load_template(template_path)?;
    template.validate()?;
    let registry = data.registry()?;

    println!("{}", "Template".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), template_path.display());
    if let Some(ref title) = template.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    println!("{}: {}", "Sections".bold(), template.sections.len());

    let placeholders = template.placeholders()?;
    let mut by_source: BTreeMap<&str, usize> = BTreeMap::new();
    for found in &placeholders {
        *by_source.entry(found.source.as_str()).or_default() += 1;
    }

    println!();
    println!("{}", "Placeholders".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Total".bold(), placeholders.len());
    for (source, count) in &by_source {
        let status = if registry.contains(source) {
            "registered".green()
        } else {
            "not registered".yellow()
        };
        println!("  {} {}: {} ({})", "•".dimmed(), source, count, status);
    }

    // Aliases are only bound during assembly.
    let doc = assemble(&template, &registry, &AssembleOptions::default())?;

    println!();
    println!("{}", "Diagnostics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if doc.diagnostics.is_empty() {
        println!("{}", "No problems found".green());
        return Ok(());
    }
    for diagnostic in &doc.diagnostics {
        let kind = match diagnostic.kind {
            DiagnosticKind::StyleFallback => diagnostic.kind.to_string().yellow(),
            _ => diagnostic.kind.to_string().red(),
        };
        println!("  {} {}: {}", kind, diagnostic.location.dimmed(), diagnostic.message);
    }

    if doc.has_errors() {
        return Err(format!("{} unresolved placeholder(s)", doc.error_count()).into());
    }
    Ok(())
}

fn cmd_batch(
    template_path: &Path,
    data_dirs: &[PathBuf],
    output_dir: &Path,
    strict: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let template: Template = load_template(template_path)?;
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(data_dirs.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Loading data...");
    let mut registries = Vec::with_capacity(data_dirs.len());
    for dir in data_dirs {
        registries.push(SourceRegistry::load_dir(dir)?);
        pb.inc(1);
    }

    pb.set_message("Assembling...");
    let options = options(strict).with_parallel(!sequential);
    log::info!(
        "Assembling {} documents{}",
        registries.len(),
        if sequential { " sequentially" } else { "" }
    );
    let results = assemble_batch(&template, &registries, &options);

    let mut written = Vec::new();
    let mut failed = Vec::new();
    for (dir, result) in data_dirs.iter().zip(results) {
        match result {
            Ok(doc) => {
                let doc = doc.with_generated_at(Utc::now());
                let name = timestamped_name(&file_stem(dir), "json");
                let path = output_dir.join(&name);
                fs::write(&path, render::to_json(&doc, JsonFormat::Pretty)?)?;
                written.push((name, doc.stats.unresolved_count));
            }
            Err(e) => {
                log::warn!("Assembly failed for {}: {}", dir.display(), e);
                failed.push((dir.display().to_string(), e.to_string()));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, (name, unresolved)) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        if *unresolved > 0 {
            let note = format!("({} unresolved)", unresolved);
            println!("  {} {} {}", branch.dimmed(), name, note.yellow());
        } else {
            println!("  {} {}", branch.dimmed(), name);
        }
    }

    if !failed.is_empty() {
        for (dir, error) in &failed {
            eprintln!("{} {}: {}", "Failed".red().bold(), dir, error);
        }
        return Err(format!("{} of {} documents failed", failed.len(), data_dirs.len()).into());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docweave".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Template-driven document assembly tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            parse_source("cfr=data/cfr_data.json").unwrap(),
            ("cfr".to_string(), PathBuf::from("data/cfr_data.json"))
        );
        assert!(parse_source("cfr").is_err());
        assert!(parse_source("=x.json").is_err());
    }

    #[test]
    fn test_timestamped_name() {
        let name = timestamped_name("letter", "json");
        assert!(name.starts_with("letter_"));
        assert!(name.ends_with(".json"));
        // letter_YYYYMMDD_HHMMSS.json
        assert_eq!(name.len(), "letter_".len() + 15 + ".json".len());
    }

    #[test]
    fn test_data_args_registry() {
        let dir = tempfile::TempDir::new().unwrap();
        let extra = dir.path().join("extra.json");
        fs::write(&extra, r#"{"a": {"b": 1}}"#).unwrap();

        let data = DataArgs {
            data_dir: Some(dir.path().to_path_buf()),
            sources: vec![("extra".to_string(), extra)],
        };
        let registry = data.registry().unwrap();
        assert!(registry.contains("cfr"));
        assert!(registry.contains("extra"));
    }

    #[test]
    fn test_cli_parses_assemble() {
        let cli = Cli::try_parse_from([
            "docweave",
            "assemble",
            "template.json",
            "--data-dir",
            "data",
            "--source",
            "extra=extra.json",
            "--strict",
            "--format",
            "text",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Assemble {
                strict, format, data, ..
            }) => {
                assert!(strict);
                assert!(format == Format::Text);
                assert_eq!(data.sources.len(), 1);
            }
            _ => panic!("expected assemble"),
        }
    }
}
