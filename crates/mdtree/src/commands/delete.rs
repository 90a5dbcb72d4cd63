//! `mdtree delete` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdtree_config::Config;

use super::DocumentFile;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the delete command.
#[derive(Args)]
pub(crate) struct DeleteArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Name of the section to delete.
    name: String,
}

impl DeleteArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(config_path, None)?;

        let file = DocumentFile::new(&self.file)?;
        let mut doc = file.load(&config)?;
        if !doc.delete(&self.name)? {
            output.warning(&format!("Section not found: {}", self.name));
            return Ok(());
        }
        file.save(&mut doc)?;

        output.success(&format!("Deleted '{}'", self.name));
        Ok(())
    }
}
