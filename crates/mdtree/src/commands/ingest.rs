//! `mdtree ingest` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdtree_config::Config;
use mdtree_ingest::{IngestOptions, read_directory};

use super::DocumentFile;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the ingest command.
#[derive(Args)]
pub(crate) struct IngestArgs {
    /// Directory to read.
    dir: PathBuf,

    /// Output file (default: `<dir name>_structure.md` in the current directory).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Glob pattern for entries to skip (added to config).
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Glob pattern or path restricting which entries are read (added to config).
    #[arg(short, long)]
    include: Vec<String>,
}

impl IngestArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(config_path, None)?;

        let options = IngestOptions::new()
            .with_exclude(config.ingest.exclude.iter().chain(&self.exclude))?
            .with_include(config.ingest.include.iter().chain(&self.include))?;

        output.info(&format!("Reading {}...", self.dir.display()));
        let mut doc = read_directory(&self.dir, &options)?;

        let target = self
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{}.md", doc.name())));
        let file = DocumentFile::new(&target)?;
        file.save(&mut doc)?;

        output.success(&format!(
            "Wrote {} sections to {}",
            doc.len(),
            file.path().display()
        ));
        Ok(())
    }
}
