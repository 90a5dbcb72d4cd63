//! `mdtree add` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdtree_config::{CliSettings, Config};
use mdtree_sections::{AddSection, default_anchor};

use super::{DocumentFile, OnConflict, find_section};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the add command.
#[derive(Args)]
pub(crate) struct AddArgs {
    /// Path to the markdown file (created if missing).
    file: PathBuf,

    /// Section name.
    name: String,

    /// Parent section (default: the root).
    #[arg(short, long)]
    parent: Option<String>,

    /// Section content.
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read section content from a file.
    #[arg(long)]
    content_file: Option<PathBuf>,

    /// What to do when the name is already used.
    #[arg(long, value_enum, default_value_t)]
    on_conflict: OnConflict,

    /// Keep headings inside the content as subsections.
    #[arg(long)]
    keep_nested_headings: bool,

    /// Regenerate the table of contents afterwards.
    #[arg(long)]
    toc: bool,
}

impl AddArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            keep_nested_headings: self.keep_nested_headings.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        let content = match (&self.content, &self.content_file) {
            (Some(content), _) => content.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => String::new(),
        };

        let file = DocumentFile::new(&self.file)?;
        let mut doc = file.open_or_create(&config)?;
        let parent = match &self.parent {
            Some(name) => find_section(&doc, name)?.id(),
            None => doc.root().id(),
        };

        let mut request = AddSection::new(&self.name)
            .with_content(content)
            .on_conflict(self.on_conflict.into());
        if config.document.keep_nested_headings {
            request = request.keep_nested_headings();
        }
        let id = doc.add_or_replace_child(parent, request)?;
        if self.toc {
            doc.render_table_of_contents(default_anchor)?;
        }
        file.save(&mut doc)?;

        let name = doc.section(id).map_or(self.name.as_str(), |s| s.name());
        output.success(&format!("Saved '{name}' to {}", file.path().display()));
        Ok(())
    }
}
