//! `mdtree toc` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdtree_config::{CliSettings, Config};
use mdtree_sections::{default_anchor, meta_path_anchor};

use super::DocumentFile;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the toc command.
#[derive(Args)]
pub(crate) struct TocArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Name of the table-of-contents section (overrides config).
    #[arg(long)]
    name: Option<String>,

    /// Link to section source paths instead of heading anchors.
    #[arg(long)]
    path_anchors: bool,
}

impl TocArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            toc_name: self.name,
            ..CliSettings::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        let file = DocumentFile::new(&self.file)?;
        let mut doc = file.load(&config)?;
        if self.path_anchors {
            doc.render_table_of_contents(meta_path_anchor)?;
        } else {
            doc.render_table_of_contents(default_anchor)?;
        }
        file.save(&mut doc)?;

        output.success(&format!(
            "Updated '{}' in {}",
            doc.toc_name(),
            file.path().display()
        ));
        Ok(())
    }
}
