//! mdtree CLI - section tree editor for markdown documents.
//!
//! Provides commands for:
//! - `tree`: Print the section outline
//! - `add`: Add or update a section
//! - `delete`: Remove a section with its subsections
//! - `toc`: Regenerate the table of contents
//! - `template`: Apply a predefined section layout
//! - `ingest`: Build a document from a directory tree
//! - `export`: Render a document to HTML and PDF

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, DeleteArgs, ExportArgs, IngestArgs, TemplateArgs, TocArgs, TreeArgs};
use output::Output;

/// mdtree - section tree editor for markdown documents.
#[derive(Parser)]
#[command(name = "mdtree", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover mdtree.toml).
    #[arg(short, long, global = true, env = "MDTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the section outline of a document.
    Tree(TreeArgs),
    /// Add a section, or update or replace an existing one.
    Add(AddArgs),
    /// Delete a section and its subsections.
    Delete(DeleteArgs),
    /// Regenerate the table of contents section.
    Toc(TocArgs),
    /// Apply a predefined section layout.
    Template(TemplateArgs),
    /// Build a document from a directory tree.
    Ingest(IngestArgs),
    /// Export a document to HTML and PDF.
    Export(ExportArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Tree(args) => args.execute(config_path),
        Commands::Add(args) => args.execute(config_path),
        Commands::Delete(args) => args.execute(config_path),
        Commands::Toc(args) => args.execute(config_path),
        Commands::Template(args) => args.execute(config_path),
        Commands::Ingest(args) => args.execute(config_path),
        Commands::Export(args) => args.execute(config_path),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
