//! `mdtree template` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdtree_config::Config;
use mdtree_sections::{Template, TemplateOptions};

use super::{DocumentFile, OnConflict};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the template command.
#[derive(Args)]
pub(crate) struct TemplateArgs {
    /// Path to the markdown file (created if missing).
    file: PathBuf,

    /// Remove all sections below the root first.
    #[arg(long)]
    clear: bool,

    /// What to do when a template section name is already used (default:
    /// skip it and keep its content).
    #[arg(long, value_enum, default_value_t = OnConflict::Error)]
    on_conflict: OnConflict,
}

impl TemplateArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(config_path, None)?;

        let file = DocumentFile::new(&self.file)?;
        let mut doc = file.open_or_create(&config)?;
        doc.apply_template(
            Template::Prompt,
            TemplateOptions {
                clear: self.clear,
                on_conflict: self.on_conflict.into(),
            },
        )?;
        file.save(&mut doc)?;

        output.success(&format!("Applied template to {}", file.path().display()));
        Ok(())
    }
}
